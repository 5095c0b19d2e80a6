pub mod client;
pub mod error;
pub mod identity;
pub mod legacy;
pub mod mapper;
pub mod merge;
pub mod sanitize;
pub mod schema;

pub use error::{ApiError, MappingError, NormalizeError};
pub use schema::SchemaVersion;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Canonical model, shared by every schema version
// ---------------------------------------------------------------------------

/// A parsed profile: the player card plus the characters on display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarRailInfo {
    pub player: Player,
    pub characters: Vec<Character>,
}

impl StarRailInfo {
    /// Find a character by ID.
    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub uid: u64,
    pub name: String,
    /// Trailblaze level
    pub level: u32,
    /// Equilibrium level
    pub world_level: u32,
    pub friend_count: u32,
    pub avatar: Avatar,
    /// Bio
    pub signature: String,
    pub is_display: bool,

    /// Unset when the source block was missing or empty, never zero-filled.
    pub forgotten_hall: Option<ForgottenHall>,
    pub simulated_universes: u32,
    pub light_cones: u32,
    pub characters: u32,
    pub achievements: u32,
}

/// Profile picture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub id: u32,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgottenHall {
    pub memory: u32,
    pub memory_of_chaos_id: u32,
    pub memory_of_chaos: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub rarity: u32,
    pub level: u32,
    pub ascension: u32,
    pub eidolon: u32,
    pub eidolon_icons: Vec<EidolonIcon>,

    pub icon: String,
    pub preview: String,
    pub portrait: String,

    pub path: Path,
    pub element: Element,

    pub traces: Vec<Trace>,
    pub trace_tree: Vec<TraceTreeNode>,
    pub light_cone: Option<LightCone>,
    pub relics: Vec<Relic>,
    pub relic_sets: Vec<RelicSet>,

    pub attributes: Vec<Attribute>,
    pub additions: Vec<Attribute>,
    pub properties: Vec<Property>,
    /// Pre-formatted stat lines, only supplied by the v1 schema.
    pub stats: Vec<Stat>,
}

impl Character {
    /// The level cap for the current ascension phase.
    pub fn max_level(&self) -> u32 {
        max_level_for(self.ascension)
    }

    pub fn is_trailblazer_placeholder(&self) -> bool {
        self.name == identity::NICKNAME_TOKEN
    }
}

/// Every ascension phase raises the cap by 10, starting from 20.
pub fn max_level_for(ascension: u32) -> u32 {
    20 + 10 * ascension
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EidolonIcon {
    pub icon: String,
    pub unlock: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// A skill trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub id: u32,
    pub name: String,
    pub level: u32,
    pub max_level: u32,
    pub element: Option<Element>,
    pub kind: String,
    pub type_text: String,
    pub effect: String,
    pub effect_text: String,
    pub simple_desc: String,
    pub desc: String,
    pub icon: String,
}

/// A node in a character's trace tree. `parent` is the preceding node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceTreeNode {
    pub id: u32,
    pub level: u32,
    pub max_level: u32,
    pub icon: String,
    pub anchor: String,
    pub parent: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightCone {
    pub id: u32,
    pub name: String,
    pub rarity: u32,
    /// 1..=5
    pub superimpose: u32,
    pub level: u32,
    pub ascension: u32,
    pub icon: String,
    pub preview: String,
    pub portrait: String,
    pub path: Option<Path>,
    pub attributes: Vec<Attribute>,
    pub properties: Vec<Property>,
}

impl LightCone {
    pub fn max_level(&self) -> u32 {
        max_level_for(self.ascension)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relic {
    pub id: u32,
    pub name: String,
    pub set_id: u32,
    pub set_name: String,
    pub rarity: u32,
    pub level: u32,
    pub icon: String,
    pub main_affix: Property,
    /// At most four.
    pub sub_affixes: Vec<SubAffix>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelicSet {
    pub id: u32,
    pub name: String,
    pub icon: String,
    /// Pieces equipped from this set.
    pub num: u32,
    pub desc: String,
    pub properties: Vec<Property>,
}

/// A base stat (`attributes`) or a bonus on top of it (`additions`).
/// `value` and `displayed_value` are both kept exactly as the source sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub field: String,
    pub name: String,
    pub icon: String,
    pub value: f64,
    pub displayed_value: String,
    pub is_percent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub kind: String,
    pub field: String,
    pub name: String,
    pub icon: String,
    pub value: f64,
    pub displayed_value: String,
    pub is_percent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubAffix {
    #[serde(flatten)]
    pub property: Property,
    /// Times this affix was rolled into.
    pub count: u32,
    pub step: u32,
}

/// A v1 stat line; values are display strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub base: String,
    pub addition: Option<String>,
    pub icon: String,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// When set, icon paths are rewritten into absolute asset URLs.
    pub asset_base_url: Option<String>,
}

/// Run a raw payload through sanitizing, mapping and trailblazer name resolution.
pub fn normalize(
    mut raw: Value,
    version: SchemaVersion,
    options: &NormalizeOptions,
) -> Result<StarRailInfo, MappingError> {
    sanitize::strip_empty_objects(&mut raw);
    if let Some(base) = options.asset_base_url.as_deref() {
        sanitize::resolve_asset_urls(&mut raw, base);
    }
    let mut info = mapper::map_profile(raw, version)?;
    info.resolve_trailblazer_name();
    Ok(info)
}

/// Like [`normalize`], with the schema version given as its query tag.
pub fn normalize_tagged(
    raw: Value,
    version: &str,
    options: &NormalizeOptions,
) -> Result<StarRailInfo, NormalizeError> {
    let version: SchemaVersion = version.parse()?;
    Ok(normalize(raw, version, options)?)
}
