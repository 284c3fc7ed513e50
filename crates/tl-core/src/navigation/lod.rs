//! Level of detail selection

use serde::{Deserialize, Serialize};

use crate::config::LodThresholds;

/// Discrete detail tiers, ordered from least to most detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LodTier {
    Far,
    Normal,
    Near,
}

/// Everything the placement engine needs to know about a tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LodConfig {
    pub tier: LodTier,
    /// Days per tick interval
    pub tick_days: u32,
    /// `chrono` format string for tick and card date labels
    pub date_format: &'static str,
    pub card_height: f64,
    /// Edge length of the event thumbnail when shown
    pub thumbnail_size: f64,
    pub show_thumbnail: bool,
    pub show_description: bool,
    /// Character budget for the description line
    pub description_chars: usize,
    pub max_chips: usize,
}

impl LodTier {
    pub fn config(self) -> LodConfig {
        match self {
            LodTier::Far => LodConfig {
                tier: self,
                tick_days: 28,
                date_format: "%Y-%m",
                card_height: 26.0,
                thumbnail_size: 0.0,
                show_thumbnail: false,
                show_description: false,
                description_chars: 0,
                max_chips: 0,
            },
            LodTier::Normal => LodConfig {
                tier: self,
                tick_days: 7,
                date_format: "%Y-%m-%d",
                card_height: 30.0,
                thumbnail_size: 0.0,
                show_thumbnail: false,
                show_description: true,
                description_chars: 40,
                max_chips: 2,
            },
            LodTier::Near => LodConfig {
                tier: self,
                tick_days: 3,
                date_format: "%Y-%m-%d",
                card_height: 34.0,
                thumbnail_size: 56.0,
                show_thumbnail: true,
                show_description: true,
                description_chars: 160,
                max_chips: 3,
            },
        }
    }
}

/// Pick the tier for a zoom factor
///
/// Non-positive or NaN zoom falls into the far tier; rejecting it is the
/// coordinate mapper's job.
pub fn select_lod(zoom_factor: f64, thresholds: &LodThresholds) -> LodConfig {
    let tier = if zoom_factor >= thresholds.near_from {
        LodTier::Near
    } else if zoom_factor >= thresholds.normal_from {
        LodTier::Normal
    } else {
        LodTier::Far
    };
    tier.config()
}
