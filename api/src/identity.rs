use crate::StarRailInfo;
use log::debug;

/// Name the dataset gives the Trailblazer until it is personalised.
pub const NICKNAME_TOKEN: &str = "{NICKNAME}";

impl StarRailInfo {
    /// Replace the placeholder Trailblazer name with the player's nickname.
    ///
    /// Only exact matches are replaced, so running this again is a no-op.
    pub fn resolve_trailblazer_name(&mut self) {
        let name = &self.player.name;
        for character in self.characters.iter_mut().filter(|c| c.is_trailblazer_placeholder()) {
            debug!("naming trailblazer {} after player", character.id);
            character.name.clone_from(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Character, Player};

    fn info(names: &[&str]) -> StarRailInfo {
        StarRailInfo {
            player: Player { name: "Stelle".into(), ..Default::default() },
            characters: names
                .iter()
                .enumerate()
                .map(|(i, n)| Character { id: i.to_string(), name: (*n).into(), ..Default::default() })
                .collect(),
        }
    }

    #[test]
    fn placeholder_is_replaced_with_player_name() {
        let mut data = info(&["Seele", NICKNAME_TOKEN, "Bronya"]);
        data.resolve_trailblazer_name();
        let names: Vec<&str> = data.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Seele", "Stelle", "Bronya"]);
    }

    #[test]
    fn second_run_changes_nothing() {
        let mut data = info(&[NICKNAME_TOKEN]);
        data.resolve_trailblazer_name();
        let once = data.clone();
        data.resolve_trailblazer_name();
        assert_eq!(data, once);
    }

    #[test]
    fn near_matches_are_left_alone() {
        let mut data = info(&["{nickname}", "{NICKNAME} ", "NICKNAME"]);
        let before = data.clone();
        data.resolve_trailblazer_name();
        assert_eq!(data, before);
    }
}
