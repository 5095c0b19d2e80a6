//! Alias tables for each API schema version.
//!
//! Every canonical field lists the source keys it may be read from, first
//! match wins. A canonical field that a table doesn't list at all is simply
//! not supplied by that version and falls back to its default. Adding a
//! version means adding a [`Schema`] value here, not touching the mapper.

use crate::error::NormalizeError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
    /// Accept numbers sent as strings and strings sent as numbers.
    pub lenient: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, required: true, lenient: false }
    }

    pub const fn optional(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, required: false, lenient: false }
    }

    pub const fn lenient(self) -> Self {
        Self { lenient: true, ..self }
    }
}

pub type Table = &'static [FieldSpec];

/// A deprecated key that stands in for `canonical` when `canonical` is absent.
#[derive(Debug, Clone, Copy)]
pub struct LegacyFallback {
    pub canonical: &'static str,
    pub deprecated: &'static str,
    /// Key renames applied when the deprecated value is an object.
    /// Empty means the value is copied as is.
    pub renames: &'static [(&'static str, &'static str)],
}

/// Folds flat sibling keys into one nested object at `target`.
/// `members` pairs a source key with its key inside the new object.
#[derive(Debug, Clone, Copy)]
pub struct NestRule {
    pub target: &'static str,
    pub members: &'static [(&'static str, &'static str)],
}

/// Structural repairs applied to the raw tree before field mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fixups {
    /// Player sub-object whose keys are hoisted onto the player itself.
    pub flatten_player: Option<&'static str>,
    pub player_fallbacks: &'static [LegacyFallback],
    pub player_nests: &'static [NestRule],
    /// Character keys that may hold a slot-keyed object instead of a list.
    pub keyed_lists: &'static [&'static str],
    /// `{id}` is replaced with the character id when no icon is supplied.
    pub character_icon_template: Option<&'static str>,
    pub character_nests: &'static [NestRule],
}

#[derive(Debug)]
pub struct Schema {
    pub root: Table,
    pub player: Table,
    pub avatar: Table,
    pub forgotten_hall: Table,
    pub character: Table,
    pub eidolon_icon: Table,
    pub path: Table,
    pub element: Table,
    pub trace: Table,
    pub trace_tree_node: Table,
    pub light_cone: Table,
    pub relic: Table,
    pub relic_set: Table,
    pub attribute: Table,
    pub property: Table,
    pub sub_affix: Table,
    pub stat: Table,
    pub fixups: Fixups,
}

/// Which response shape was requested. The payload is never sniffed; the
/// caller knows which query it sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    #[default]
    Current,
    V1,
}

impl SchemaVersion {
    pub fn schema(self) -> &'static Schema {
        match self {
            SchemaVersion::Current => &CURRENT,
            SchemaVersion::V1 => &V1,
        }
    }

    /// Value of the `version` query parameter, if any.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            SchemaVersion::Current => None,
            SchemaVersion::V1 => Some("v1"),
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            SchemaVersion::Current => "current",
            SchemaVersion::V1 => "v1",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SchemaVersion {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(SchemaVersion::Current),
            "v1" => Ok(SchemaVersion::V1),
            other => Err(NormalizeError::UnsupportedVersion(other.to_owned())),
        }
    }
}

use FieldSpec as F;

// ---------------------------------------------------------------------------
// Current schema
// ---------------------------------------------------------------------------

static CURRENT: Schema = Schema {
    root: &[
        F::required("player", &["player"]),
        F::optional("characters", &["characters"]),
    ],
    player: &[
        F::required("uid", &["uid"]),
        F::required("name", &["nickname", "name"]),
        F::required("level", &["level"]),
        F::required("world_level", &["world_level"]),
        F::required("friend_count", &["friend_count"]),
        F::required("avatar", &["avatar"]),
        F::required("signature", &["signature"]),
        F::required("is_display", &["is_display"]),
        F::optional("forgotten_hall", &["memory_data"]),
        F::optional("simulated_universes", &["universe_level"]),
        F::optional("light_cones", &["light_cone_count"]),
        F::optional("characters", &["avatar_count"]),
        F::optional("achievements", &["achievement_count"]),
    ],
    avatar: &[
        F::required("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
    ],
    forgotten_hall: &[
        F::required("memory", &["level"]),
        F::required("memory_of_chaos_id", &["chaos_id"]),
        F::required("memory_of_chaos", &["chaos_level"]),
    ],
    character: &[
        F::required("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::required("rarity", &["rarity"]),
        F::required("level", &["level"]),
        F::required("ascension", &["promotion"]),
        F::required("eidolon", &["rank"]),
        F::required("icon", &["icon"]),
        F::required("preview", &["preview"]),
        F::required("portrait", &["portrait"]),
        F::required("path", &["path"]),
        F::required("element", &["element"]),
        F::required("traces", &["skills"]),
        F::optional("trace_tree", &["skill_trees"]),
        F::optional("light_cone", &["light_cone"]),
        F::optional("relics", &["relics"]),
        F::optional("relic_sets", &["relic_sets"]),
        F::required("attributes", &["attributes"]),
        F::required("additions", &["additions"]),
        F::required("properties", &["properties"]),
    ],
    eidolon_icon: &[],
    path: &[
        F::required("id", &["id"]),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
    ],
    element: &[
        F::required("id", &["id"]),
        F::required("name", &["name"]),
        F::required("color", &["color"]),
        F::required("icon", &["icon"]),
    ],
    trace: &[
        F::required("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::required("level", &["level"]),
        F::required("max_level", &["max_level"]),
        F::optional("element", &["element"]),
        F::required("kind", &["type"]),
        F::required("type_text", &["type_text"]),
        F::required("effect", &["effect"]),
        F::required("effect_text", &["effect_text"]),
        F::required("simple_desc", &["simple_desc"]),
        F::required("desc", &["desc"]),
        F::required("icon", &["icon"]),
    ],
    trace_tree_node: &[
        F::required("id", &["id"]).lenient(),
        F::required("level", &["level"]),
        F::required("max_level", &["max_level"]),
        F::required("icon", &["icon"]),
        F::required("anchor", &["anchor"]),
        F::optional("parent", &["parent"]).lenient(),
    ],
    light_cone: &[
        F::required("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::required("rarity", &["rarity"]),
        F::required("superimpose", &["rank"]),
        F::required("level", &["level"]),
        F::required("ascension", &["promotion"]),
        F::required("icon", &["icon"]),
        F::optional("preview", &["preview"]),
        F::optional("portrait", &["portrait"]),
        F::optional("path", &["path"]),
        F::optional("attributes", &["attributes"]),
        F::optional("properties", &["properties"]),
    ],
    relic: &[
        F::required("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::optional("set_id", &["set_id"]).lenient(),
        F::optional("set_name", &["set_name"]),
        F::required("rarity", &["rarity"]),
        F::required("level", &["level"]),
        F::required("icon", &["icon"]),
        F::required("main_affix", &["main_affix"]),
        F::optional("sub_affixes", &["sub_affix"]),
    ],
    relic_set: &[
        F::required("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
        F::required("num", &["num"]),
        F::required("desc", &["desc"]),
        F::optional("properties", &["properties"]),
    ],
    attribute: &[
        F::required("field", &["field"]),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
        F::required("value", &["value"]),
        F::required("displayed_value", &["display"]),
        F::required("is_percent", &["percent"]),
    ],
    property: &[
        F::required("kind", &["type"]),
        F::required("field", &["field"]),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
        F::required("value", &["value"]),
        F::required("displayed_value", &["display"]),
        F::required("is_percent", &["percent"]),
    ],
    sub_affix: &[
        F::optional("count", &["count"]),
        F::optional("step", &["step"]),
    ],
    stat: &[],
    fixups: Fixups {
        flatten_player: Some("space_info"),
        player_fallbacks: &[
            LegacyFallback {
                canonical: "universe_level",
                deprecated: "pass_area_progress",
                renames: &[],
            },
            LegacyFallback {
                canonical: "memory_data",
                deprecated: "challenge_data",
                renames: &[
                    ("pre_maze_group_index", "level"),
                    ("maze_group_id", "chaos_id"),
                    ("maze_group_index", "chaos_level"),
                ],
            },
        ],
        player_nests: &[],
        keyed_lists: &[],
        character_icon_template: None,
        character_nests: &[],
    },
};

// ---------------------------------------------------------------------------
// v1 schema (`?version=v1`)
// ---------------------------------------------------------------------------

static V1: Schema = Schema {
    root: &[
        F::required("player", &["player"]),
        F::optional("characters", &["characters"]),
    ],
    player: &[
        F::required("uid", &["uid"]).lenient(),
        F::required("name", &["name", "nickname"]),
        F::required("level", &["level"]),
        F::required("avatar", &["avatar"]),
        F::required("signature", &["signature"]),
        F::optional("forgotten_hall", &["ChallengeData"]),
        F::optional("simulated_universes", &["PassAreaProgress"]),
        F::optional("light_cones", &["LightConeCount"]),
        F::optional("characters", &["AvatarCount"]),
        F::optional("achievements", &["AchievementCount"]),
    ],
    avatar: &[
        F::optional("id", &["id"]).lenient(),
        F::optional("name", &["name"]),
        F::required("icon", &["icon"]),
    ],
    forgotten_hall: &[
        F::optional("memory", &["PreMazeGroupIndex"]),
        F::optional("memory_of_chaos_id", &["MazeGroupIndex"]),
        F::optional("memory_of_chaos", &["MazeGroupID"]),
    ],
    character: &[
        F::required("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::required("rarity", &["rarity"]),
        F::required("level", &["level"]),
        F::optional("ascension", &["promotion"]),
        F::required("eidolon", &["rank"]),
        F::required("eidolon_icons", &["rank_icons"]),
        F::required("icon", &["icon"]),
        F::required("preview", &["preview"]),
        F::required("portrait", &["portrait"]),
        F::required("path", &["path"]),
        F::required("element", &["element"]),
        F::required("traces", &["skill"]),
        F::optional("light_cone", &["light_cone"]),
        F::optional("relics", &["relic"]),
        F::optional("relic_sets", &["relic_set"]),
        F::required("stats", &["property"]),
    ],
    eidolon_icon: &[
        F::required("icon", &["icon"]),
        F::required("unlock", &["unlock"]),
    ],
    path: &[
        F::optional("id", &["id"]),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
    ],
    element: &[
        F::optional("id", &["id"]),
        F::required("name", &["name"]),
        F::optional("color", &["color"]),
        F::required("icon", &["icon"]),
    ],
    trace: &[
        F::required("name", &["name"]),
        F::required("level", &["level"]),
        F::required("kind", &["type"]),
        F::required("icon", &["icon"]),
    ],
    trace_tree_node: &[],
    light_cone: &[
        F::required("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::required("rarity", &["rarity"]),
        F::required("superimpose", &["rank"]),
        F::required("level", &["level"]),
        F::optional("ascension", &["promotion"]),
        F::required("icon", &["icon"]),
        F::optional("preview", &["preview"]),
        F::optional("portrait", &["portrait"]),
    ],
    relic: &[
        F::optional("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::optional("set_id", &["set_id"]).lenient(),
        F::optional("set_name", &["set_name"]),
        F::required("rarity", &["rarity"]),
        F::required("level", &["level"]),
        F::required("icon", &["icon"]),
        F::required("main_affix", &["main_affix"]),
        F::optional("sub_affixes", &["sub_affix"]),
    ],
    relic_set: &[
        F::optional("id", &["id"]).lenient(),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
        F::optional("num", &["num"]),
        F::required("desc", &["desc"]),
        F::optional("properties", &["properties"]),
    ],
    attribute: &[
        F::optional("field", &["field"]),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
        F::required("value", &["value"]).lenient(),
        F::optional("displayed_value", &["display"]),
        F::optional("is_percent", &["percent"]),
    ],
    property: &[
        F::optional("kind", &["type"]),
        F::optional("field", &["field"]),
        F::required("name", &["name"]),
        F::required("icon", &["icon"]),
        F::required("value", &["value"]).lenient(),
        F::optional("displayed_value", &["display"]),
        F::optional("is_percent", &["percent"]),
    ],
    sub_affix: &[
        F::optional("count", &["count"]),
        F::optional("step", &["step"]),
    ],
    stat: &[
        F::required("name", &["name"]),
        F::required("base", &["base"]).lenient(),
        F::optional("addition", &["addition"]).lenient(),
        F::required("icon", &["icon"]),
    ],
    fixups: Fixups {
        flatten_player: Some("space_info"),
        player_fallbacks: &[],
        player_nests: &[NestRule { target: "avatar", members: &[("icon", "icon")] }],
        keyed_lists: &["relic"],
        character_icon_template: Some("icon/character/{id}.png"),
        character_nests: &[
            NestRule {
                target: "path",
                members: &[("path", "name"), ("path_icon", "icon")],
            },
            NestRule {
                target: "element",
                members: &[("element", "name"), ("element_icon", "icon"), ("color", "color")],
            },
        ],
    },
};
