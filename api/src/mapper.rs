//! Projection of a sanitized raw payload onto the canonical model.
//!
//! Which keys are read, and whether they are required, comes entirely from
//! the version's [`Schema`]; the functions below only know canonical names.
//! Mapping is all-or-nothing: the first failing field aborts the whole
//! payload with its canonical path.

use crate::error::MappingError;
use crate::legacy;
use crate::schema::{FieldSpec, Schema, SchemaVersion, Table};
use crate::{
    Attribute, Avatar, Character, EidolonIcon, Element, ForgottenHall, LightCone, Path, Player,
    Property, Relic, RelicSet, Stat, StarRailInfo, SubAffix, Trace, TraceTreeNode,
};
use log::debug;
use serde_json::{Map, Value};

type MapResult<T> = Result<T, MappingError>;

/// Map a raw payload of the given schema version.
pub fn map_profile(mut raw: Value, version: SchemaVersion) -> MapResult<StarRailInfo> {
    let schema = version.schema();
    legacy::reconcile(&mut raw, schema);

    let root = Fields::root(&raw, schema.root)?;
    let player = root
        .object("player", schema.player, |f| map_player(f, schema))?
        .unwrap_or_default();
    let characters = root.list("characters", schema.character, |f| map_character(f, schema))?;

    debug!("mapped {version} profile for uid {} with {} characters", player.uid, characters.len());
    Ok(StarRailInfo { player, characters })
}

fn map_player(f: Fields<'_>, s: &Schema) -> MapResult<Player> {
    Ok(Player {
        uid: f.u64("uid")?,
        name: f.string("name")?,
        level: f.u32("level")?,
        world_level: f.u32("world_level")?,
        friend_count: f.u32("friend_count")?,
        avatar: f.object("avatar", s.avatar, map_avatar)?.unwrap_or_default(),
        signature: f.string("signature")?,
        is_display: f.bool("is_display")?,
        forgotten_hall: f.object("forgotten_hall", s.forgotten_hall, map_forgotten_hall)?,
        simulated_universes: f.u32("simulated_universes")?,
        light_cones: f.u32("light_cones")?,
        characters: f.u32("characters")?,
        achievements: f.u32("achievements")?,
    })
}

fn map_avatar(f: Fields<'_>) -> MapResult<Avatar> {
    Ok(Avatar { id: f.u32("id")?, name: f.string("name")?, icon: f.string("icon")? })
}

fn map_forgotten_hall(f: Fields<'_>) -> MapResult<ForgottenHall> {
    Ok(ForgottenHall {
        memory: f.u32("memory")?,
        memory_of_chaos_id: f.u32("memory_of_chaos_id")?,
        memory_of_chaos: f.u32("memory_of_chaos")?,
    })
}

fn map_character(f: Fields<'_>, s: &Schema) -> MapResult<Character> {
    Ok(Character {
        id: f.string("id")?,
        name: f.string("name")?,
        rarity: f.u32("rarity")?,
        level: f.u32("level")?,
        ascension: f.u32("ascension")?,
        eidolon: f.u32("eidolon")?,
        eidolon_icons: f.list("eidolon_icons", s.eidolon_icon, map_eidolon_icon)?,
        icon: f.string("icon")?,
        preview: f.string("preview")?,
        portrait: f.string("portrait")?,
        path: f.object("path", s.path, map_path)?.unwrap_or_default(),
        element: f.object("element", s.element, map_element)?.unwrap_or_default(),
        traces: f.list("traces", s.trace, |t| map_trace(t, s))?,
        trace_tree: f.list("trace_tree", s.trace_tree_node, map_trace_tree_node)?,
        light_cone: f.object("light_cone", s.light_cone, |l| map_light_cone(l, s))?,
        relics: f.list("relics", s.relic, |r| map_relic(r, s))?,
        relic_sets: f.list("relic_sets", s.relic_set, |r| map_relic_set(r, s))?,
        attributes: f.list("attributes", s.attribute, map_attribute)?,
        additions: f.list("additions", s.attribute, map_attribute)?,
        properties: f.list("properties", s.property, map_property)?,
        stats: f.list("stats", s.stat, map_stat)?,
    })
}

fn map_eidolon_icon(f: Fields<'_>) -> MapResult<EidolonIcon> {
    Ok(EidolonIcon { icon: f.string("icon")?, unlock: f.bool("unlock")? })
}

fn map_path(f: Fields<'_>) -> MapResult<Path> {
    Ok(Path { id: f.string("id")?, name: f.string("name")?, icon: f.string("icon")? })
}

fn map_element(f: Fields<'_>) -> MapResult<Element> {
    Ok(Element {
        id: f.string("id")?,
        name: f.string("name")?,
        color: f.string("color")?,
        icon: f.string("icon")?,
    })
}

fn map_trace(f: Fields<'_>, s: &Schema) -> MapResult<Trace> {
    Ok(Trace {
        id: f.u32("id")?,
        name: f.string("name")?,
        level: f.u32("level")?,
        max_level: f.u32("max_level")?,
        element: f.object("element", s.element, map_element)?,
        kind: f.string("kind")?,
        type_text: f.string("type_text")?,
        effect: f.string("effect")?,
        effect_text: f.string("effect_text")?,
        simple_desc: f.string("simple_desc")?,
        desc: f.string("desc")?,
        icon: f.string("icon")?,
    })
}

fn map_trace_tree_node(f: Fields<'_>) -> MapResult<TraceTreeNode> {
    Ok(TraceTreeNode {
        id: f.u32("id")?,
        level: f.u32("level")?,
        max_level: f.u32("max_level")?,
        icon: f.string("icon")?,
        anchor: f.string("anchor")?,
        parent: f.opt_u32("parent")?,
    })
}

fn map_light_cone(f: Fields<'_>, s: &Schema) -> MapResult<LightCone> {
    Ok(LightCone {
        id: f.u32("id")?,
        name: f.string("name")?,
        rarity: f.u32("rarity")?,
        superimpose: f.u32("superimpose")?,
        level: f.u32("level")?,
        ascension: f.u32("ascension")?,
        icon: f.string("icon")?,
        preview: f.string("preview")?,
        portrait: f.string("portrait")?,
        path: f.object("path", s.path, map_path)?,
        attributes: f.list("attributes", s.attribute, map_attribute)?,
        properties: f.list("properties", s.property, map_property)?,
    })
}

fn map_relic(f: Fields<'_>, s: &Schema) -> MapResult<Relic> {
    Ok(Relic {
        id: f.u32("id")?,
        name: f.string("name")?,
        set_id: f.u32("set_id")?,
        set_name: f.string("set_name")?,
        rarity: f.u32("rarity")?,
        level: f.u32("level")?,
        icon: f.string("icon")?,
        main_affix: f.object("main_affix", s.property, map_property)?.unwrap_or_default(),
        sub_affixes: f.list("sub_affixes", s.property, |a| map_sub_affix(a, s))?,
    })
}

fn map_sub_affix(f: Fields<'_>, s: &Schema) -> MapResult<SubAffix> {
    let counts = f.with_table(s.sub_affix);
    Ok(SubAffix {
        property: map_property(f)?,
        count: counts.u32("count")?,
        step: counts.u32("step")?,
    })
}

fn map_relic_set(f: Fields<'_>, s: &Schema) -> MapResult<RelicSet> {
    Ok(RelicSet {
        id: f.u32("id")?,
        name: f.string("name")?,
        icon: f.string("icon")?,
        num: f.u32("num")?,
        desc: f.string("desc")?,
        properties: f.list("properties", s.property, map_property)?,
    })
}

fn map_attribute(f: Fields<'_>) -> MapResult<Attribute> {
    Ok(Attribute {
        field: f.string("field")?,
        name: f.string("name")?,
        icon: f.string("icon")?,
        value: f.f64("value")?,
        displayed_value: f.string("displayed_value")?,
        is_percent: f.bool("is_percent")?,
    })
}

fn map_property(f: Fields<'_>) -> MapResult<Property> {
    Ok(Property {
        kind: f.string("kind")?,
        field: f.string("field")?,
        name: f.string("name")?,
        icon: f.string("icon")?,
        value: f.f64("value")?,
        displayed_value: f.string("displayed_value")?,
        is_percent: f.bool("is_percent")?,
    })
}

fn map_stat(f: Fields<'_>) -> MapResult<Stat> {
    Ok(Stat {
        name: f.string("name")?,
        base: f.string("base")?,
        addition: f.opt_string("addition")?,
        icon: f.string("icon")?,
    })
}

// ---------------------------------------------------------------------------
// Alias-driven field access
// ---------------------------------------------------------------------------

/// One source object viewed through an alias table.
///
/// Lookups take the canonical field name. A name the table doesn't list
/// reads as absent; an absent optional field reads as its default; an absent
/// required field is [`MappingError::Missing`]. `null` counts as absent.
#[derive(Clone)]
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    table: Table,
    path: String,
}

impl<'a> Fields<'a> {
    fn root(value: &'a Value, table: Table) -> MapResult<Self> {
        Self::at(value, table, String::new())
    }

    fn at(value: &'a Value, table: Table, path: String) -> MapResult<Self> {
        match value {
            Value::Object(obj) => Ok(Self { obj, table, path }),
            other => Err(invalid(&path_or_root(&path), "an object", other)),
        }
    }

    /// The same object, read through another table.
    fn with_table(&self, table: Table) -> Fields<'a> {
        Fields { obj: self.obj, table, path: self.path.clone() }
    }

    fn child_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{name}", self.path)
        }
    }

    fn lookup(&self, name: &str) -> MapResult<Option<(&'a Value, &'static FieldSpec)>> {
        let Some(spec) = self.table.iter().find(|f| f.name == name) else {
            return Ok(None);
        };
        let found = spec
            .aliases
            .iter()
            .find_map(|alias| self.obj.get(*alias).filter(|v| !v.is_null()));
        match found {
            Some(value) => Ok(Some((value, spec))),
            None if spec.required => Err(MappingError::Missing { path: self.child_path(name) }),
            None => Ok(None),
        }
    }

    fn opt_u64(&self, name: &str) -> MapResult<Option<u64>> {
        let Some((value, spec)) = self.lookup(name)? else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) if spec.lenient => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| invalid(&self.child_path(name), "a non-negative integer", value))
    }

    fn u64(&self, name: &str) -> MapResult<u64> {
        Ok(self.opt_u64(name)?.unwrap_or_default())
    }

    fn opt_u32(&self, name: &str) -> MapResult<Option<u32>> {
        match self.opt_u64(name)? {
            None => Ok(None),
            Some(n) => u32::try_from(n).map(Some).map_err(|_| MappingError::InvalidType {
                path: self.child_path(name),
                expected: "a 32-bit integer",
                found: "a larger number",
            }),
        }
    }

    fn u32(&self, name: &str) -> MapResult<u32> {
        Ok(self.opt_u32(name)?.unwrap_or_default())
    }

    fn f64(&self, name: &str) -> MapResult<f64> {
        let Some((value, spec)) = self.lookup(name)? else {
            return Ok(0.0);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if spec.lenient => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| invalid(&self.child_path(name), "a number", value))
    }

    fn opt_string(&self, name: &str) -> MapResult<Option<String>> {
        let Some((value, spec)) = self.lookup(name)? else {
            return Ok(None);
        };
        match value {
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) if spec.lenient => Ok(Some(n.to_string())),
            other => Err(invalid(&self.child_path(name), "a string", other)),
        }
    }

    fn string(&self, name: &str) -> MapResult<String> {
        Ok(self.opt_string(name)?.unwrap_or_default())
    }

    fn bool(&self, name: &str) -> MapResult<bool> {
        match self.lookup(name)? {
            None => Ok(false),
            Some((Value::Bool(b), _)) => Ok(*b),
            Some((other, _)) => Err(invalid(&self.child_path(name), "a boolean", other)),
        }
    }

    /// Nested object read through `table`. An empty object counts as absent,
    /// so an optional block that was `{}` never becomes a zero-valued struct.
    fn object<T>(
        &self,
        name: &str,
        table: Table,
        map: impl FnOnce(Fields<'a>) -> MapResult<T>,
    ) -> MapResult<Option<T>> {
        let Some((value, spec)) = self.lookup(name)? else {
            return Ok(None);
        };
        if matches!(value, Value::Object(o) if o.is_empty()) {
            return if spec.required {
                Err(MappingError::Missing { path: self.child_path(name) })
            } else {
                Ok(None)
            };
        }
        map(Fields::at(value, table, self.child_path(name))?).map(Some)
    }

    fn list<T>(
        &self,
        name: &str,
        table: Table,
        mut map: impl FnMut(Fields<'a>) -> MapResult<T>,
    ) -> MapResult<Vec<T>> {
        let Some((value, _)) = self.lookup(name)? else {
            return Ok(Vec::new());
        };
        let Value::Array(items) = value else {
            return Err(invalid(&self.child_path(name), "a list", value));
        };
        let base = self.child_path(name);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| map(Fields::at(item, table, format!("{base}[{i}]"))?))
            .collect()
    }
}

fn path_or_root(path: &str) -> String {
    if path.is_empty() { "<root>".to_owned() } else { path.to_owned() }
}

fn invalid(path: &str, expected: &'static str, found: &Value) -> MappingError {
    MappingError::InvalidType { path: path.to_owned(), expected, found: kind_of(found) }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
