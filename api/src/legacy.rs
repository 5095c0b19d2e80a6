//! Structural repairs that bring an older or differently-shaped payload into
//! the shape the alias tables expect.
//!
//! Like the sanitizer, these never fail: a node that doesn't have the
//! expected shape is left for the mapper to report on.

use crate::schema::{Fixups, LegacyFallback, NestRule, Schema, Table};
use log::debug;
use serde_json::{Map, Value};

/// Apply the schema's fixups to the player and every character in `raw`.
pub fn reconcile(raw: &mut Value, schema: &Schema) {
    let fixups = &schema.fixups;

    if let Some(player) = field_mut(raw, schema.root, "player").and_then(Value::as_object_mut) {
        reconcile_player(player, fixups);
    }

    if let Some(characters) = field_mut(raw, schema.root, "characters").and_then(Value::as_array_mut)
    {
        for character in characters.iter_mut().filter_map(Value::as_object_mut) {
            reconcile_character(character, fixups);
        }
    }
}

pub fn reconcile_player(player: &mut Map<String, Value>, fixups: &Fixups) {
    if let Some(key) = fixups.flatten_player {
        flatten(player, key);
    }
    for fallback in fixups.player_fallbacks {
        apply_fallback(player, fallback);
    }
    for rule in fixups.player_nests {
        nest(player, rule);
    }
}

pub fn reconcile_character(character: &mut Map<String, Value>, fixups: &Fixups) {
    for key in fixups.keyed_lists {
        if let Some(slot) = character.get_mut(*key) {
            keyed_object_to_list(slot);
        }
    }

    if let Some(template) = fixups.character_icon_template
        && is_absent(character.get("icon"))
        && let Some(id) = character.get("id").and_then(scalar_text)
    {
        character.insert("icon".into(), Value::String(template.replace("{id}", &id)));
    }

    for rule in fixups.character_nests {
        nest(character, rule);
    }
}

/// Hoist the keys of the `key` sub-object onto `obj`. Hoisted keys win.
fn flatten(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::Object(inner)) = obj.remove(key) {
        debug!("flattening `{key}` ({} keys)", inner.len());
        for (k, v) in inner {
            obj.insert(k, v);
        }
    }
}

/// Fill `canonical` from `deprecated`, but only when `canonical` is absent.
/// The two are never merged.
fn apply_fallback(obj: &mut Map<String, Value>, fallback: &LegacyFallback) {
    if !is_absent(obj.get(fallback.canonical)) {
        return;
    }
    let Some(old) = obj.get(fallback.deprecated).filter(|v| !v.is_null()) else {
        return;
    };

    debug!("using deprecated `{}` for `{}`", fallback.deprecated, fallback.canonical);
    let value = match old {
        Value::Object(block) if !fallback.renames.is_empty() => {
            let renamed: Map<String, Value> = fallback
                .renames
                .iter()
                .filter_map(|(from, to)| block.get(*from).map(|v| ((*to).to_owned(), v.clone())))
                .collect();
            Value::Object(renamed)
        }
        other => other.clone(),
    };
    obj.insert(fallback.canonical.to_owned(), value);
}

/// Fold flat keys into a nested object, unless the target already is one.
fn nest(obj: &mut Map<String, Value>, rule: &NestRule) {
    if matches!(obj.get(rule.target), Some(Value::Object(_))) {
        return;
    }
    if !rule.members.iter().any(|(from, _)| !is_absent(obj.get(*from))) {
        return;
    }

    let mut nested = Map::new();
    for (from, to) in rule.members {
        if let Some(v) = obj.remove(*from).filter(|v| !v.is_null()) {
            nested.insert((*to).to_owned(), v);
        }
    }
    obj.insert(rule.target.to_owned(), Value::Object(nested));
}

/// `{"1": a, "2": b}` → `[a, b]`, in the order the object was decoded.
fn keyed_object_to_list(slot: &mut Value) {
    if let Value::Object(map) = slot {
        let values: Vec<Value> = std::mem::take(map).into_iter().map(|(_, v)| v).collect();
        *slot = Value::Array(values);
    }
}

fn field_mut<'a>(raw: &'a mut Value, table: Table, name: &str) -> Option<&'a mut Value> {
    let spec = table.iter().find(|f| f.name == name)?;
    let obj = raw.as_object_mut()?;
    let key = spec.aliases.iter().find(|a| !is_absent(obj.get(**a)))?;
    obj.get_mut(*key)
}

fn is_absent(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
