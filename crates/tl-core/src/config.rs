//! Layout configuration
//!
//! All geometry constants of the engine live here so hosts can tune them from
//! a JSON file. Every field has a default; a partial file only overrides what
//! it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Rgba;
use crate::{LayoutError, LayoutResult};

/// What to do with events that name no place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UnplacedEventsPolicy {
    /// Leave them out of the layout
    Drop,
    /// Place them in an extra lane after all places
    ReservedLane { label: String },
}

impl Default for UnplacedEventsPolicy {
    fn default() -> Self {
        UnplacedEventsPolicy::Drop
    }
}

/// Zoom factors at which the detail tier changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodThresholds {
    /// Below this zoom the far tier is used
    pub normal_from: f64,
    /// At or above this zoom the near tier is used
    pub near_from: f64,
}

impl Default for LodThresholds {
    fn default() -> Self {
        Self {
            normal_from: 0.95,
            near_from: 1.25,
        }
    }
}

/// Geometry and styling constants for a layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Height of one lane; independent of zoom
    pub row_height: f64,

    /// X where lanes begin (room for place labels on the left)
    pub left_margin: f64,

    /// Y of the first lane (room for tick labels above)
    pub top_margin: f64,

    /// Width of one tick interval at zoom 1.0
    pub base_step_width: f64,

    /// Legibility floor for card width
    pub min_card_width: f64,

    /// Vertical distance between stacked cards
    pub stack_step: f64,

    /// Stack slots that get a full step before offsets saturate
    pub max_stack_offsets: usize,

    /// Extra offset per slot past `max_stack_offsets`
    pub stack_overflow_nudge: f64,

    /// Lane length past the last visible day
    pub trailing_padding: f64,

    /// Approximate glyph width used to truncate labels
    pub avg_char_width: f64,

    /// Horizontal padding inside a card before text starts
    pub card_text_padding: f64,

    pub chip_size: f64,
    pub chip_gap: f64,

    /// Tint of events without a (known) character
    pub neutral_color: Rgba,

    /// Alpha multiplier for cards outside the character selection
    pub dim_opacity: f32,

    /// Upper bound on tick marks per pass
    pub max_ticks: usize,

    pub lod: LodThresholds,

    pub unplaced_events: UnplacedEventsPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_height: 84.0,
            left_margin: 190.0,
            top_margin: 110.0,
            base_step_width: 220.0,
            min_card_width: 16.0,
            stack_step: 12.0,
            max_stack_offsets: 3,
            stack_overflow_nudge: 3.0,
            trailing_padding: 240.0,
            avg_char_width: 7.5,
            card_text_padding: 12.0,
            chip_size: 18.0,
            chip_gap: 6.0,
            neutral_color: Rgba::rgb(0x94, 0xA3, 0xB8),
            dim_opacity: 0.35,
            max_ticks: 2000,
            lod: LodThresholds::default(),
            unplaced_events: UnplacedEventsPolicy::Drop,
        }
    }
}

impl LayoutConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    pub fn from_json_str(json: &str) -> LayoutResult<Self> {
        let config: LayoutConfig = serde_json::from_str(json)
            .map_err(|e| LayoutError::InvalidLayoutParameter(format!("config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LayoutError::InvalidLayoutParameter(format!("config {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn with_unplaced_lane(mut self, label: impl Into<String>) -> Self {
        self.unplaced_events = UnplacedEventsPolicy::ReservedLane {
            label: label.into(),
        };
        self
    }

    /// Reject values that would produce degenerate geometry
    pub fn validate(&self) -> LayoutResult<()> {
        let positive = [
            ("row_height", self.row_height),
            ("base_step_width", self.base_step_width),
            ("stack_step", self.stack_step),
            ("stack_overflow_nudge", self.stack_overflow_nudge),
            ("avg_char_width", self.avg_char_width),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidLayoutParameter(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("left_margin", self.left_margin),
            ("top_margin", self.top_margin),
            ("min_card_width", self.min_card_width),
            ("trailing_padding", self.trailing_padding),
            ("card_text_padding", self.card_text_padding),
            ("chip_size", self.chip_size),
            ("chip_gap", self.chip_gap),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LayoutError::InvalidLayoutParameter(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.dim_opacity) {
            return Err(LayoutError::InvalidLayoutParameter(format!(
                "dim_opacity must be within 0..=1, got {}",
                self.dim_opacity
            )));
        }

        let lod = &self.lod;
        if !(lod.normal_from > 0.0 && lod.normal_from <= lod.near_from) {
            return Err(LayoutError::InvalidLayoutParameter(format!(
                "lod thresholds must satisfy 0 < normal_from <= near_from, got {} and {}",
                lod.normal_from, lod.near_from
            )));
        }

        if let UnplacedEventsPolicy::ReservedLane { label } = &self.unplaced_events {
            if label.trim().is_empty() {
                return Err(LayoutError::InvalidLayoutParameter(
                    "reserved lane label must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_only_named_fields() {
        let config = LayoutConfig::from_json_str(
            r#"{
                "row_height": 60.0,
                "unplaced_events": { "mode": "reserved_lane", "label": "Unplaced" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.row_height, 60.0);
        assert_eq!(config.left_margin, 190.0);
        assert_eq!(
            config.unplaced_events,
            UnplacedEventsPolicy::ReservedLane {
                label: "Unplaced".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_degenerate_values() {
        let err = LayoutConfig::from_json_str(r#"{"base_step_width": 0.0}"#).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidLayoutParameter(_)));

        let config = LayoutConfig {
            lod: LodThresholds {
                normal_from: 2.0,
                near_from: 1.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = LayoutConfig::default().with_unplaced_lane("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_reported() {
        assert!(LayoutConfig::from_json_str("{ not json").is_err());
    }
}
