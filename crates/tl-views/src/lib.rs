//! Placement and interaction for the timeline chart
//!
//! `compute_scene` turns entities and a view state into backend-neutral
//! geometry; `DragController` turns pointer gestures on that geometry back
//! into date changes.

mod interaction;
mod labels;
mod layout;
mod stacking;
mod style;

pub use interaction::{
    apply_commit, DeferredCommits, DragCommit, DragController, DragGesture, DragPreview, DragState,
};
pub use labels::{date_label, tooltip_text, truncate_to_width};
pub use layout::{
    compute_layout, compute_scene, CardId, CharacterChip, DisplayFields, LaneRow, Point,
    PositionedCard, Rect, TickMark, TimelineScene,
};
pub use stacking::StackAllocator;
pub use style::{card_style, VisualStyle};
