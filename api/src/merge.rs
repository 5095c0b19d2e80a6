use crate::StarRailInfo;
use log::{debug, warn};
use std::collections::HashSet;

impl StarRailInfo {
    /// Combine a fresh profile with an older one of the same player.
    ///
    /// The result keeps `self`'s player card and character data; characters
    /// that only appear in `older` (lent out, or taken off the showcase since)
    /// are appended after them. `older`'s player card is dropped. Both profiles
    /// should come from the same player and schema version; a uid mismatch is
    /// logged, not rejected.
    pub fn merge(mut self, older: StarRailInfo) -> StarRailInfo {
        if older.player.uid != self.player.uid {
            warn!(
                "merging profiles of different players ({} and {})",
                self.player.uid, older.player.uid
            );
        }
        let before = self.characters.len();
        self.characters.extend(older.characters);
        self.remove_duplicate_characters();
        debug!(
            "merge appended {} older characters",
            self.characters.len().saturating_sub(before)
        );
        self
    }

    /// Drop every character whose id already appeared earlier in the list.
    pub fn remove_duplicate_characters(&mut self) {
        let mut seen: HashSet<String> = HashSet::with_capacity(self.characters.len());
        self.characters.retain(|c| seen.insert(c.id.clone()));
    }
}

/// Free-function form of [`StarRailInfo::merge`].
pub fn merge(newer: StarRailInfo, older: StarRailInfo) -> StarRailInfo {
    newer.merge(older)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Character, Player};

    fn character(id: &str, level: u32) -> Character {
        Character { id: id.into(), name: format!("c{id}"), level, ..Default::default() }
    }

    fn roster(uid: u64, characters: Vec<Character>) -> StarRailInfo {
        StarRailInfo { player: Player { uid, ..Default::default() }, characters }
    }

    fn ids(info: &StarRailInfo) -> Vec<&str> {
        info.characters.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn newer_data_wins_and_both_sides_are_kept() {
        let newer = roster(1, vec![character("A", 80), character("B", 50)]);
        let older = roster(1, vec![character("A", 70), character("C", 60)]);
        let merged = newer.merge(older);
        assert_eq!(ids(&merged), ["A", "B", "C"]);
        assert_eq!(merged.character("A").unwrap().level, 80);
    }

    #[test]
    fn player_card_comes_from_newer_only() {
        let newer = roster(1, vec![]);
        let mut older = roster(1, vec![]);
        older.player.name = "old name".into();
        older.player.level = 99;
        let merged = merge(newer.clone(), older);
        assert_eq!(merged.player, newer.player);
    }

    #[test]
    fn merged_ids_are_unique() {
        let newer = roster(1, vec![character("A", 1), character("A", 2), character("B", 1)]);
        let older = roster(1, vec![character("B", 9), character("C", 1), character("C", 2)]);
        let merged = newer.merge(older);
        assert_eq!(ids(&merged), ["A", "B", "C"]);
        assert_eq!(merged.characters[0].level, 1);
        assert_eq!(merged.character("C").unwrap().level, 1);
    }

    #[test]
    fn character_missing_from_latest_snapshot_is_not_lost() {
        let newer = roster(1, vec![character("B", 1)]);
        let older = roster(1, vec![character("A", 1), character("B", 0)]);
        assert_eq!(ids(&newer.merge(older)), ["B", "A"]);
    }

    #[test]
    fn mismatched_players_are_still_merged() {
        let merged = roster(1, vec![character("A", 1)]).merge(roster(2, vec![character("B", 1)]));
        assert_eq!(merged.player.uid, 1);
        assert_eq!(ids(&merged), ["A", "B"]);
    }
}
