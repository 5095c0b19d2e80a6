use srinfo_api::{Character, StarRailInfo};
use std::fmt::Write;

/// Plain-text rendering of a profile for the terminal.
pub fn render(info: &StarRailInfo) -> String {
    let mut out = String::new();
    let p = &info.player;

    let _ = writeln!(out, "{} (uid {}) - TL {} / EQ {}", p.name, p.uid, p.level, p.world_level);
    if !p.signature.is_empty() {
        let _ = writeln!(out, "  \"{}\"", p.signature);
    }
    let _ = writeln!(
        out,
        "  characters {} | light cones {} | achievements {} | simulated universe {}",
        p.characters, p.light_cones, p.achievements, p.simulated_universes
    );
    if let Some(hall) = &p.forgotten_hall {
        let _ = writeln!(
            out,
            "  forgotten hall: memory {} | chaos {} (stage {})",
            hall.memory, hall.memory_of_chaos, hall.memory_of_chaos_id
        );
    }

    for character in &info.characters {
        out.push('\n');
        render_character(&mut out, character);
    }
    out
}

fn render_character(out: &mut String, c: &Character) {
    let _ = writeln!(
        out,
        "{} [{}] {}* Lv {}/{} E{} - {} / {}",
        c.name,
        c.id,
        c.rarity,
        c.level,
        c.max_level(),
        c.eidolon,
        c.path.name,
        c.element.name
    );
    if let Some(lc) = &c.light_cone {
        let _ = writeln!(
            out,
            "  light cone: {} S{} Lv {}/{}",
            lc.name,
            lc.superimpose,
            lc.level,
            lc.max_level()
        );
    }
    if !c.relics.is_empty() {
        let sets: Vec<String> =
            c.relic_sets.iter().map(|s| format!("{} x{}", s.name, s.num)).collect();
        let _ = writeln!(out, "  relics: {} ({})", c.relics.len(), sets.join(", "));
    }
    for prop in &c.properties {
        let _ = writeln!(out, "  {}: {}", prop.name, prop.displayed_value);
    }
    for stat in &c.stats {
        match &stat.addition {
            Some(add) => {
                let _ = writeln!(out, "  {}: {} + {}", stat.name, stat.base, add);
            }
            None => {
                let _ = writeln!(out, "  {}: {}", stat.name, stat.base);
            }
        }
    }
}
