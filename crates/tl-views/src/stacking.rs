//! Vertical stacking of cards that start on the same day in the same lane

use ahash::AHashMap;
use chrono::NaiveDate;

use tl_core::{LaneId, LayoutConfig};

/// Hands out vertical offsets per `(lane, start day)` group
///
/// The first card of a group sits on the lane center. Later cards alternate
/// up and down with growing distance. Past `max_stack_offsets` slots the
/// distance only grows by the overflow nudge, so crowded groups overlap
/// more and more but never land on the same spot.
#[derive(Debug, Default)]
pub struct StackAllocator {
    groups: AHashMap<(LaneId, NaiveDate), usize>,
}

impl StackAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset for the next card in the group, counting it as placed
    pub fn next_offset(&mut self, lane: LaneId, day: NaiveDate, config: &LayoutConfig) -> f64 {
        let count = self.groups.entry((lane, day)).or_insert(0);
        let position = *count;
        *count += 1;
        offset_for_position(position, config)
    }

    /// Number of cards placed in a group so far
    pub fn group_len(&self, lane: LaneId, day: NaiveDate) -> usize {
        self.groups.get(&(lane, day)).copied().unwrap_or(0)
    }
}

/// Offset of the `position`-th card (0-based) in a group; negative is up
pub fn offset_for_position(position: usize, config: &LayoutConfig) -> f64 {
    if position == 0 {
        return 0.0;
    }
    let slot = (position + 1) / 2;
    let magnitude = if slot <= config.max_stack_offsets {
        slot as f64 * config.stack_step
    } else {
        let overflow = slot - config.max_stack_offsets;
        config.max_stack_offsets as f64 * config.stack_step
            + overflow as f64 * config.stack_overflow_nudge
    };
    if position % 2 == 1 {
        -magnitude
    } else {
        magnitude
    }
}
