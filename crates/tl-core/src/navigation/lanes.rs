//! Place to lane assignment

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, UnplacedEventsPolicy};
use crate::model::Place;

/// Row number of a lane, counted from the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId(pub usize);

/// Fixed vertical rows, one per place, in host order
///
/// Lookup is by place name. Duplicate names keep their first lane. The
/// reserved lane for unplaced events, when configured, comes after all
/// places and is not reachable by name, so a place called "Unplaced" cannot
/// collide with it.
#[derive(Debug, Clone)]
pub struct LaneIndex {
    labels: Vec<String>,
    by_name: AHashMap<String, LaneId>,
    unplaced: Option<LaneId>,
    top: f64,
    row_height: f64,
}

impl LaneIndex {
    pub fn build(places: &[Place], config: &LayoutConfig) -> Self {
        let mut labels = Vec::with_capacity(places.len() + 1);
        let mut by_name = AHashMap::with_capacity(places.len());

        for place in places {
            if by_name.contains_key(&place.name) {
                tracing::debug!(place = %place.name, "duplicate place name, keeping first lane");
                continue;
            }
            by_name.insert(place.name.clone(), LaneId(labels.len()));
            labels.push(place.name.clone());
        }

        let unplaced = match &config.unplaced_events {
            UnplacedEventsPolicy::Drop => None,
            UnplacedEventsPolicy::ReservedLane { label } => {
                labels.push(label.clone());
                Some(LaneId(labels.len() - 1))
            }
        };

        Self {
            labels,
            by_name,
            unplaced,
            top: config.top_margin,
            row_height: config.row_height,
        }
    }

    pub fn lane_of(&self, place_name: &str) -> Option<LaneId> {
        self.by_name.get(place_name).copied()
    }

    /// Lane for events without places, if the policy reserves one
    pub fn unplaced_lane(&self) -> Option<LaneId> {
        self.unplaced
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, lane: LaneId) -> Option<&str> {
        self.labels.get(lane.0).map(String::as_str)
    }

    pub fn is_reserved(&self, lane: LaneId) -> bool {
        self.unplaced == Some(lane)
    }

    /// Top edge of a lane
    pub fn row_y(&self, lane: LaneId) -> f64 {
        self.top + lane.0 as f64 * self.row_height
    }

    /// Vertical center of a lane, where unstacked cards sit
    pub fn center_y(&self, lane: LaneId) -> f64 {
        self.row_y(lane) + self.row_height / 2.0
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Y just below the last lane
    pub fn bottom(&self) -> f64 {
        self.top + self.labels.len() as f64 * self.row_height
    }

    pub fn iter(&self) -> impl Iterator<Item = (LaneId, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (LaneId(i), label.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places(names: &[&str]) -> Vec<Place> {
        names.iter().map(|n| Place::new(*n)).collect()
    }

    #[test]
    fn test_lanes_follow_host_order() {
        let index = LaneIndex::build(
            &places(&["Tower", "Castle", "Abbey"]),
            &LayoutConfig::default(),
        );
        assert_eq!(index.lane_of("Tower"), Some(LaneId(0)));
        assert_eq!(index.lane_of("Castle"), Some(LaneId(1)));
        assert_eq!(index.lane_of("Abbey"), Some(LaneId(2)));
        assert_eq!(index.lane_of("Harbor"), None);
        assert_eq!(index.unplaced_lane(), None);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_row_geometry_ignores_zoom() {
        let config = LayoutConfig::default();
        let index = LaneIndex::build(&places(&["A", "B"]), &config);
        assert_eq!(index.row_y(LaneId(0)), 110.0);
        assert_eq!(index.row_y(LaneId(1)), 194.0);
        assert_eq!(index.center_y(LaneId(1)), 236.0);
        assert_eq!(index.bottom(), 278.0);
    }

    #[test]
    fn test_duplicate_names_keep_first_lane() {
        let index = LaneIndex::build(&places(&["A", "B", "A"]), &LayoutConfig::default());
        assert_eq!(index.len(), 2);
        assert_eq!(index.lane_of("A"), Some(LaneId(0)));
    }

    #[test]
    fn test_reserved_lane_is_last_and_not_addressable_by_name() {
        let config = LayoutConfig::default().with_unplaced_lane("Unplaced");
        let index = LaneIndex::build(&places(&["Unplaced", "Castle"]), &config);

        assert_eq!(index.len(), 3);
        assert_eq!(index.unplaced_lane(), Some(LaneId(2)));
        assert_eq!(index.lane_of("Unplaced"), Some(LaneId(0)));
        assert!(index.is_reserved(LaneId(2)));
        assert_eq!(index.label(LaneId(2)), Some("Unplaced"));
    }
}
