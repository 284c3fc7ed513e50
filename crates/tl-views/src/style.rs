//! Card tinting and dimming

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::Serialize;

use tl_core::{Character, Event, LayoutConfig, Rgba};

const FILL_WHITE_MIX: f32 = 0.65;
const FILL_ALPHA: f32 = 220.0;
const BORDER_DARKEN: f32 = 1.35;
const BORDER_ALPHA: f32 = 200.0;

/// Resolved colors of a card
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualStyle {
    pub fill_color: Rgba,
    pub border_color: Rgba,
    /// Outside the active character selection
    pub dimmed: bool,
    /// Alpha multiplier the renderer applies to text and chips
    pub opacity: f32,
}

/// Base tint of an event: its first character's color, or the neutral tint
pub fn base_color(
    event: &Event,
    characters: &AHashMap<&str, &Character>,
    config: &LayoutConfig,
) -> Rgba {
    event
        .characters
        .first()
        .and_then(|name| characters.get(name.as_str()))
        .and_then(|c| c.color_tag())
        .unwrap_or(config.neutral_color)
}

pub fn is_dimmed(event: &Event, selected_characters: &BTreeSet<String>) -> bool {
    !selected_characters.is_empty()
        && !event.characters.iter().any(|c| selected_characters.contains(c))
}

pub fn card_style(
    event: &Event,
    characters: &AHashMap<&str, &Character>,
    selected_characters: &BTreeSet<String>,
    config: &LayoutConfig,
) -> VisualStyle {
    let base = base_color(event, characters, config);
    let dimmed = is_dimmed(event, selected_characters);
    let opacity = if dimmed { config.dim_opacity } else { 1.0 };

    VisualStyle {
        fill_color: base
            .mix(Rgba::WHITE, FILL_WHITE_MIX)
            .with_alpha((FILL_ALPHA * opacity) as u8),
        border_color: base
            .darker(BORDER_DARKEN)
            .with_alpha((BORDER_ALPHA * opacity) as u8),
        dimmed,
        opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(characters: &[Character]) -> AHashMap<&str, &Character> {
        characters.iter().map(|c| (c.name.as_str(), c)).collect()
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_character_tints_the_card() {
        let characters = vec![
            Character::new("Alice", "#EF4444"),
            Character::new("Bob", "#40E0D0"),
        ];
        let config = LayoutConfig::default();
        let ev = Event::new("Duel", "2024-01-01").with_characters(["Alice", "Bob"]);
        assert_eq!(base_color(&ev, &lookup(&characters), &config), Rgba::rgb(0xEF, 0x44, 0x44));
    }

    #[test]
    fn test_neutral_tint_fallbacks() {
        let characters = vec![Character::new("Ghost", "not a color")];
        let config = LayoutConfig::default();
        let map = lookup(&characters);

        let nobody = Event::new("Quiet", "2024-01-01");
        assert_eq!(base_color(&nobody, &map, &config), config.neutral_color);

        let unknown = Event::new("Rumor", "2024-01-01").with_characters(["Stranger"]);
        assert_eq!(base_color(&unknown, &map, &config), config.neutral_color);

        let bad_color = Event::new("Haunting", "2024-01-01").with_characters(["Ghost"]);
        assert_eq!(base_color(&bad_color, &map, &config), config.neutral_color);
    }

    #[test]
    fn test_dimming_only_with_active_selection() {
        let characters = vec![Character::new("Bob", "#A7C7E7")];
        let config = LayoutConfig::default();
        let map = lookup(&characters);
        let ev = Event::new("Market", "2024-01-01").with_characters(["Bob"]);

        let plain = card_style(&ev, &map, &BTreeSet::new(), &config);
        assert!(!plain.dimmed);
        assert_eq!(plain.fill_color.a, 220);
        assert_eq!(plain.border_color.a, 200);

        let dimmed = card_style(&ev, &map, &set(&["Alice"]), &config);
        assert!(dimmed.dimmed);
        assert!(dimmed.fill_color.a < plain.fill_color.a);
        assert!((76..=77).contains(&dimmed.fill_color.a));
        assert_eq!(dimmed.opacity, config.dim_opacity);

        let kept = card_style(&ev, &map, &set(&["Alice", "Bob"]), &config);
        assert!(!kept.dimmed);
    }
}
