//! View state management

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Zoom multiplier applied by one zoom step
pub const ZOOM_STEP: f64 = 1.25;

/// Everything about how the chart is currently looked at
///
/// A plain value: the host owns it and hands it to each layout pass. Filter
/// sets are ordered so two equal states always lay out identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Horizontal zoom; 1.0 is the default scale
    pub zoom_factor: f64,

    /// Date drawn at the left edge of the lanes
    pub pan_origin: NaiveDate,

    /// Explicit window bounds, used when `auto_date_range` is off
    pub visible_date_from: Option<NaiveDate>,
    pub visible_date_to: Option<NaiveDate>,

    /// Characters whose events stay at full opacity
    pub selected_characters: BTreeSet<String>,

    /// Places whose events are shown; empty shows all
    pub selected_places: BTreeSet<String>,

    /// Derive the window from the filtered events instead of the explicit bounds
    pub auto_date_range: bool,

    /// The host's current date, used when the auto window finds nothing
    pub today: NaiveDate,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            zoom_factor: 1.0,
            pan_origin: today,
            visible_date_from: None,
            visible_date_to: None,
            selected_characters: BTreeSet::new(),
            selected_places: BTreeSet::new(),
            auto_date_range: true,
            today,
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_factor *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.zoom_factor /= ZOOM_STEP;
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_factor = 1.0;
    }

    /// Move the left edge by whole days (negative pans into the past)
    pub fn pan_by_days(&mut self, days: i64) {
        let origin = Duration::try_days(days).and_then(|d| self.pan_origin.checked_add_signed(d));
        if let Some(origin) = origin {
            self.pan_origin = origin;
        }
    }

    /// Put the origin one day before `first_day`, leaving a margin before it
    pub fn pan_to(&mut self, first_day: NaiveDate) {
        self.pan_origin = first_day.pred_opt().unwrap_or(first_day);
    }

    pub fn set_explicit_window(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.visible_date_from = from;
        self.visible_date_to = to;
        self.auto_date_range = false;
    }

    pub fn toggle_character(&mut self, name: &str) {
        if !self.selected_characters.remove(name) {
            self.selected_characters.insert(name.to_string());
        }
    }

    pub fn toggle_place(&mut self, name: &str) {
        if !self.selected_places.remove(name) {
            self.selected_places.insert(name.to_string());
        }
    }

    pub fn clear_filters(&mut self) {
        self.selected_characters.clear();
        self.selected_places.clear();
    }

    /// Whether character dimming is in effect
    pub fn has_character_selection(&self) -> bool {
        !self.selected_characters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_zoom_steps_are_reversible() {
        let mut view = ViewState::new(date("2024-01-01"));
        view.zoom_in();
        assert_eq!(view.zoom_factor, 1.25);
        view.zoom_out();
        assert!((view.zoom_factor - 1.0).abs() < 1e-12);
        view.zoom_in();
        view.zoom_in();
        view.reset_zoom();
        assert_eq!(view.zoom_factor, 1.0);
    }

    #[test]
    fn test_panning() {
        let mut view = ViewState::new(date("2024-01-10"));
        view.pan_by_days(-9);
        assert_eq!(view.pan_origin, date("2024-01-01"));
        view.pan_to(date("2024-03-01"));
        assert_eq!(view.pan_origin, date("2024-02-29"));
    }

    #[test]
    fn test_pan_by_huge_offset_is_ignored() {
        let mut view = ViewState::new(date("2024-01-01"));
        view.pan_by_days(i64::MAX);
        assert_eq!(view.pan_origin, date("2024-01-01"));
        view.pan_by_days(i64::MIN);
        assert_eq!(view.pan_origin, date("2024-01-01"));
        view.pan_by_days(1_000_000_000);
        assert_eq!(view.pan_origin, date("2024-01-01"));
    }

    #[test]
    fn test_filter_toggles() {
        let mut view = ViewState::new(date("2024-01-01"));
        view.toggle_character("Alice");
        view.toggle_place("Castle");
        assert!(view.has_character_selection());
        assert!(view.selected_places.contains("Castle"));

        view.toggle_character("Alice");
        assert!(!view.has_character_selection());

        view.clear_filters();
        assert!(view.selected_places.is_empty());
    }

    #[test]
    fn test_explicit_window_disables_auto_range() {
        let mut view = ViewState::new(date("2024-01-01"));
        assert!(view.auto_date_range);
        view.set_explicit_window(Some(date("2024-01-01")), None);
        assert!(!view.auto_date_range);
        assert_eq!(view.visible_date_to, None);
    }
}
