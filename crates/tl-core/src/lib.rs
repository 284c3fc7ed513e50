//! Core functionality for the timeline engine
//!
//! This crate provides the entity model, view state and the pure mapping
//! primitives (dates to pixels, zoom to detail tier, places to lanes) that the
//! placement engine builds on.

pub mod config;
pub mod filter;
pub mod model;
pub mod navigation;
pub mod state;

use thiserror::Error;

// Re-export commonly used types
pub use config::{LayoutConfig, LodThresholds, UnplacedEventsPolicy};
pub use filter::{compute_auto_date_range, resolve_window, visible_events, DateWindow, VisibleEvent};
pub use model::{format_date, parse_date, Character, DateSpan, Event, EventId, Place, Rgba};
pub use navigation::{select_lod, CoordinateMapper, LaneId, LaneIndex, LodConfig, LodTier};
pub use state::ViewState;

/// Errors raised by the layout and interaction layers.
///
/// Malformed entity data is never reported here: events that cannot be placed
/// are dropped from the layout and noted in the log instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid layout parameter: {0}")]
    InvalidLayoutParameter(String),

    #[error("gesture state violation: {0}")]
    GestureStateViolation(String),
}

pub type LayoutResult<T> = Result<T, LayoutError>;
