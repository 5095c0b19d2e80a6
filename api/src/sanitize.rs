//! Best-effort cleanup of raw payloads before mapping.
//!
//! Both passes walk the whole tree and never fail: anything they don't
//! recognise is left as it was.

use serde_json::Value;

/// Replace every empty-object node with `null`, recursively.
///
/// The API sends `{}` where it means "nothing here" (e.g. a character with no
/// light cone). Running this twice is the same as running it once: `null` is
/// a scalar and is never rewritten again.
pub fn strip_empty_objects(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                if is_empty_object(child) {
                    *child = Value::Null;
                } else {
                    strip_empty_objects(child);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                if is_empty_object(item) {
                    *item = Value::Null;
                } else {
                    strip_empty_objects(item);
                }
            }
        }
        _ => {}
    }
}

fn is_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}

/// Rewrite every string containing `.png` into `{base_url}/{string}`.
///
/// e.g. `icon/avatar/1201.png` →
/// `https://raw.githubusercontent.com/Mar-7th/StarRailRes/master/icon/avatar/1201.png`
pub fn resolve_asset_urls(value: &mut Value, base_url: &str) {
    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                resolve_asset_urls(child, base_url);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                resolve_asset_urls(item, base_url);
            }
        }
        Value::String(s) if s.contains(".png") => {
            *s = asset_url(base_url, s);
        }
        _ => {}
    }
}

pub fn asset_url(base_url: &str, icon: &str) -> String {
    format!("{base_url}/{icon}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://raw.githubusercontent.com/Mar-7th/StarRailRes/master";

    fn stripped(mut v: Value) -> Value {
        strip_empty_objects(&mut v);
        v
    }

    #[test]
    fn empty_objects_become_null_at_any_depth() {
        let v = stripped(json!({
            "light_cone": {},
            "relics": [{}, {"id": 1, "extra": {}}],
            "nested": {"deeper": {"deepest": {}}}
        }));
        assert_eq!(
            v,
            json!({
                "light_cone": null,
                "relics": [null, {"id": 1, "extra": null}],
                "nested": {"deeper": {"deepest": null}}
            })
        );
    }

    #[test]
    fn strip_is_idempotent() {
        let samples = [
            json!({}),
            json!([]),
            json!([{}, [{}], {"a": {"b": {}}}]),
            json!({"a": 1, "b": "x", "c": null, "d": [1, {"e": {}}]}),
            json!("scalar"),
        ];
        for sample in samples {
            let once = stripped(sample);
            let twice = stripped(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn root_empty_object_is_left_alone() {
        // Only child nodes are replaced; the caller owns the root.
        assert_eq!(stripped(json!({})), json!({}));
    }

    #[test]
    fn nested_object_emptied_only_of_nulls_is_kept() {
        // {"a": {"b": {}}} → {"a": {"b": null}}; "a" is no longer empty.
        assert_eq!(stripped(json!({"a": {"b": {}}})), json!({"a": {"b": null}}));
    }

    #[test]
    fn only_png_strings_are_rewritten() {
        let mut v = json!({
            "icon": "icon/avatar/1201.png",
            "name": "Qingque",
            "list": ["icon/path/Knight.png", "Preservation", 3],
            "weird": "prefix.pngsuffix"
        });
        resolve_asset_urls(&mut v, BASE);
        assert_eq!(v["icon"], json!(format!("{BASE}/icon/avatar/1201.png")));
        assert_eq!(v["name"], json!("Qingque"));
        assert_eq!(v["list"], json!([format!("{BASE}/icon/path/Knight.png"), "Preservation", 3]));
        assert_eq!(v["weird"], json!(format!("{BASE}/prefix.pngsuffix")));
    }

    #[test]
    fn rewritten_strings_start_with_base_and_slash() {
        let mut v = json!(["a.png", "deep/b.png"]);
        resolve_asset_urls(&mut v, "http://x");
        for s in v.as_array().unwrap() {
            assert!(s.as_str().unwrap().starts_with("http://x/"));
        }
    }
}
