use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use srinfo_api::{SchemaVersion, StarRailInfo};
use std::path::Path;

/// A normalized profile saved to disk, in canonical field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: SchemaVersion,
    pub fetched_at: DateTime<Utc>,
    pub info: StarRailInfo,
}

impl Snapshot {
    pub fn new(version: SchemaVersion, info: StarRailInfo) -> Self {
        Self { version, fetched_at: Utc::now(), info }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read snapshot {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid snapshot json at {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("could not write snapshot {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use srinfo_api::{Character, Player};

    fn sample() -> Snapshot {
        Snapshot {
            version: SchemaVersion::V1,
            fetched_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            info: StarRailInfo {
                player: Player { uid: 7, name: "Caelus".into(), ..Default::default() },
                characters: vec![Character {
                    id: "1001".into(),
                    name: "March 7th".into(),
                    ascension: 3,
                    ..Default::default()
                }],
            },
        }
    }

    #[test]
    fn snapshot_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        let snap = sample();
        snap.save(&path).unwrap();
        assert_eq!(Snapshot::load(&path).unwrap(), snap);
    }

    #[test]
    fn snapshot_json_uses_canonical_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["version"], "v1");
        assert_eq!(json["info"]["characters"][0]["ascension"], 3);
    }

    #[test]
    fn missing_file_mentions_the_path() {
        let err = Snapshot::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
