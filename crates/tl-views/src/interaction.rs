//! Drag-to-reschedule gestures
//!
//! The controller never touches events. Updates only produce previews, and a
//! successful release hands back a [`DragCommit`] the host applies, typically
//! through [`DeferredCommits`] once the current frame has finished.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use tl_core::{format_date, CoordinateMapper, DateSpan, Event, EventId, LayoutError, LayoutResult};

use crate::layout::{CardId, Point, Rect, TimelineScene};

/// Everything captured when a card is grabbed
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    card: CardId,
    event: EventId,
    mapper: CoordinateMapper,
    /// Pointer x minus card x at grab time
    grab_offset: f64,
    origin_rect: Rect,
    span: DateSpan,
    has_end_date: bool,
    lane_left: f64,
    lane_right: f64,
}

impl DragGesture {
    pub fn card(&self) -> CardId {
        self.card
    }

    pub fn event(&self) -> EventId {
        self.event
    }

    fn upper_x(&self) -> f64 {
        (self.lane_right - self.origin_rect.width).max(self.lane_left)
    }

    /// Left edge for a pointer position, kept inside the lane
    fn clamped_x(&self, pointer: Point) -> f64 {
        let x = pointer.x - self.grab_offset;
        if !x.is_finite() {
            return self.origin_rect.x;
        }
        x.clamp(self.lane_left, self.upper_x())
    }

    /// Whole-day position for a pointer, with the card's left edge and new span
    ///
    /// Rounding never pushes the card past the right end of the lane.
    fn landing(&self, pointer: Point) -> (f64, DateSpan) {
        let mut start = self.mapper.x_to_date(self.clamped_x(pointer));
        if self.mapper.date_to_x(start) > self.upper_x() + 1e-9 {
            if let Some(prev) = start.pred_opt() {
                if self.mapper.date_to_x(prev) >= self.lane_left - 1e-9 {
                    start = prev;
                }
            }
        }
        (self.mapper.date_to_x(start), self.span.shifted_to(start))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragGesture),
}

/// Where the dragged card would land if released now
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragPreview {
    pub card: CardId,
    /// Card rectangle at the snapped start day, inside the lane
    pub rect: Rect,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Date change produced by a completed drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DragCommit {
    pub event: EventId,
    pub new_start: NaiveDate,
    /// `None` when the event had no end date of its own
    pub new_end: Option<NaiveDate>,
}

/// Drives one drag gesture at a time
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Grab `card` at `pointer`
    ///
    /// # Errors
    /// `GestureStateViolation` if a gesture is already active or the card is
    /// not part of `scene`.
    pub fn begin_drag(
        &mut self,
        scene: &TimelineScene,
        card: CardId,
        pointer: Point,
    ) -> LayoutResult<()> {
        if let DragState::Dragging(active) = &self.state {
            warn!(active = ?active.card, requested = ?card, "drag already in progress");
            return Err(LayoutError::GestureStateViolation(format!(
                "cannot start dragging {card:?} while {:?} is being dragged",
                active.card
            )));
        }
        let positioned = scene.card(card).ok_or_else(|| {
            LayoutError::GestureStateViolation(format!("{card:?} is not in the current layout"))
        })?;

        debug!(?card, start = %positioned.span.start, "drag started");
        self.state = DragState::Dragging(DragGesture {
            card,
            event: positioned.event,
            mapper: scene.mapper,
            grab_offset: pointer.x - positioned.rect.x,
            origin_rect: positioned.rect,
            span: positioned.span,
            has_end_date: positioned.has_end_date,
            lane_left: scene.lane_left,
            lane_right: scene.lane_right,
        });
        Ok(())
    }

    /// Preview for the current pointer position; nothing is modified
    pub fn update_drag(&self, pointer: Point) -> LayoutResult<DragPreview> {
        let gesture = self.active("update")?;
        let (x, span) = gesture.landing(pointer);
        Ok(DragPreview {
            card: gesture.card,
            rect: Rect {
                x,
                ..gesture.origin_rect
            },
            start: span.start,
            end: span.end,
        })
    }

    /// Release at `pointer`: snap to a whole day and end the gesture
    ///
    /// The event's duration is kept. An event without its own end date
    /// stays without one.
    pub fn commit_drag(&mut self, pointer: Point) -> LayoutResult<DragCommit> {
        let gesture = match std::mem::take(&mut self.state) {
            DragState::Dragging(gesture) => gesture,
            DragState::Idle => return Err(idle_violation("commit")),
        };
        let (_, span) = gesture.landing(pointer);
        let commit = DragCommit {
            event: gesture.event,
            new_start: span.start,
            new_end: gesture.has_end_date.then_some(span.end),
        };
        debug!(
            event = gesture.event.0,
            from = %gesture.span.start,
            to = %commit.new_start,
            "drag committed"
        );
        Ok(commit)
    }

    /// Abort the gesture; returns whether one was active
    pub fn cancel_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        if was_dragging {
            debug!("drag cancelled");
        }
        self.state = DragState::Idle;
        was_dragging
    }

    /// The host lost the pointer mid-gesture; same as a cancel
    pub fn pointer_capture_lost(&mut self) -> bool {
        self.cancel_drag()
    }

    fn active(&self, action: &str) -> LayoutResult<&DragGesture> {
        match &self.state {
            DragState::Dragging(gesture) => Ok(gesture),
            DragState::Idle => Err(idle_violation(action)),
        }
    }
}

fn idle_violation(action: &str) -> LayoutError {
    LayoutError::GestureStateViolation(format!("cannot {action} a drag: no gesture in progress"))
}

/// Write a commit into the event list; false if the event no longer exists
pub fn apply_commit(events: &mut [Event], commit: &DragCommit) -> bool {
    let Some(event) = events.get_mut(commit.event.0) else {
        warn!(event = commit.event.0, "dropping commit for a missing event");
        return false;
    };
    event.start_date = format_date(commit.new_start);
    event.end_date = commit.new_end.map(format_date).unwrap_or_default();
    true
}

/// Commits waiting for the current frame to finish
#[derive(Debug, Default)]
pub struct DeferredCommits {
    pending: Vec<DragCommit>,
}

impl DeferredCommits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, commit: DragCommit) {
        self.pending.push(commit);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply everything queued, in order, and return the events changed
    pub fn flush(&mut self, events: &mut [Event]) -> Vec<EventId> {
        self.pending
            .drain(..)
            .filter(|commit| apply_commit(events, commit))
            .map(|commit| commit.event)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_scene;
    use tl_core::{LayoutConfig, Place, ViewState};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn fixture() -> (Vec<Place>, Vec<Event>, ViewState) {
        let places = vec![Place::new("Castle")];
        let events = vec![
            Event::new("Siege", "2024-03-01").with_end("2024-03-03").with_places(["Castle"]),
            Event::new("Feast", "2024-03-05").with_places(["Castle"]),
            Event::new("Harvest", "2024-05-01").with_places(["Castle"]),
        ];
        let mut view = ViewState::new(date("2030-01-01"));
        view.pan_origin = date("2024-02-26");
        view.set_explicit_window(None, None);
        (places, events, view)
    }

    fn scene_for(places: &[Place], events: &[Event], view: &ViewState) -> TimelineScene {
        compute_scene(places, &[], events, view, &LayoutConfig::default()).unwrap()
    }

    fn card_of(scene: &TimelineScene, event: usize) -> (CardId, Rect) {
        let card = scene.cards_for_event(EventId(event)).next().unwrap();
        (card.id, card.rect)
    }

    fn grab(rect: Rect) -> Point {
        Point::new(rect.x + 4.0, rect.center_y())
    }

    #[test]
    fn test_drag_keeps_duration() {
        let (places, events, view) = fixture();
        let scene = scene_for(&places, &events, &view);
        let (card, rect) = card_of(&scene, 0);
        let ppd = scene.mapper.pixels_per_day();

        let mut drag = DragController::new();
        drag.begin_drag(&scene, card, grab(rect)).unwrap();
        let release = Point::new(grab(rect).x + 9.0 * ppd, rect.center_y());
        let commit = drag.commit_drag(release).unwrap();

        assert_eq!(commit.event, EventId(0));
        assert_eq!(commit.new_start, date("2024-03-10"));
        assert_eq!(commit.new_end, Some(date("2024-03-12")));
        assert!(!drag.is_dragging());

        let mut events = events;
        assert!(apply_commit(&mut events, &commit));
        assert_eq!(events[0].start_date, "2024-03-10");
        assert_eq!(events[0].end_date, "2024-03-12");
    }

    #[test]
    fn test_release_snaps_to_nearest_day() {
        let (places, events, view) = fixture();
        let scene = scene_for(&places, &events, &view);
        let (card, rect) = card_of(&scene, 0);
        let ppd = scene.mapper.pixels_per_day();

        for (days, expected) in [(2.4, "2024-03-03"), (2.6, "2024-03-04"), (-1.2, "2024-02-29")] {
            let mut drag = DragController::new();
            drag.begin_drag(&scene, card, grab(rect)).unwrap();
            let commit = drag
                .commit_drag(Point::new(grab(rect).x + days * ppd, rect.center_y()))
                .unwrap();
            assert_eq!(commit.new_start, date(expected));
            let end = commit.new_end.unwrap();
            assert_eq!((end - commit.new_start).num_days(), 2);
        }
    }

    #[test]
    fn test_single_day_event_stays_single_day() {
        let (places, events, view) = fixture();
        let scene = scene_for(&places, &events, &view);
        let (card, rect) = card_of(&scene, 1);
        let ppd = scene.mapper.pixels_per_day();

        let mut drag = DragController::new();
        drag.begin_drag(&scene, card, grab(rect)).unwrap();
        let commit = drag
            .commit_drag(Point::new(grab(rect).x + 3.0 * ppd, rect.center_y()))
            .unwrap();
        assert_eq!(commit.new_start, date("2024-03-08"));
        assert_eq!(commit.new_end, None);

        let mut events = events;
        apply_commit(&mut events, &commit);
        assert_eq!(events[1].start_date, "2024-03-08");
        assert!(events[1].end_date.is_empty());
    }

    #[test]
    fn test_explicit_same_day_end_moves_with_start() {
        let (places, mut events, view) = fixture();
        events[1].end_date = "2024-03-05".into();
        let scene = scene_for(&places, &events, &view);
        let (card, rect) = card_of(&scene, 1);
        let ppd = scene.mapper.pixels_per_day();

        let mut drag = DragController::new();
        drag.begin_drag(&scene, card, grab(rect)).unwrap();
        let commit = drag
            .commit_drag(Point::new(grab(rect).x + ppd, rect.center_y()))
            .unwrap();
        assert_eq!(commit.new_end, Some(commit.new_start));
    }

    #[test]
    fn test_preview_is_clamped_to_lane() {
        let (places, events, view) = fixture();
        let scene = scene_for(&places, &events, &view);
        let (card, rect) = card_of(&scene, 0);

        let mut drag = DragController::new();
        drag.begin_drag(&scene, card, grab(rect)).unwrap();

        let far_left = drag.update_drag(Point::new(-1.0e6, rect.center_y())).unwrap();
        assert_eq!(far_left.rect.x, scene.lane_left);
        assert_eq!(far_left.start, view.pan_origin);

        let far_right = drag.update_drag(Point::new(1.0e6, rect.center_y())).unwrap();
        let ppd = scene.mapper.pixels_per_day();
        assert!(far_right.rect.right() <= scene.lane_right + 1e-9);
        assert!(far_right.rect.right() > scene.lane_right - ppd);
        assert_eq!(far_right.rect.x, scene.mapper.date_to_x(far_right.start));
        assert_eq!(far_right.rect.width, rect.width);
        assert_eq!(far_right.rect.y, rect.y);

        let nowhere = drag.update_drag(Point::new(f64::NAN, 0.0)).unwrap();
        assert_eq!(nowhere.rect.x, rect.x);

        // Previews leave the gesture running
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_preview_snaps_to_whole_days() {
        let (places, events, view) = fixture();
        let scene = scene_for(&places, &events, &view);
        let (card, rect) = card_of(&scene, 0);
        let ppd = scene.mapper.pixels_per_day();

        let mut drag = DragController::new();
        drag.begin_drag(&scene, card, grab(rect)).unwrap();

        let preview = drag
            .update_drag(Point::new(grab(rect).x + 2.4 * ppd, rect.center_y()))
            .unwrap();
        assert_eq!(preview.start, date("2024-03-03"));
        assert_eq!(preview.end, date("2024-03-05"));
        assert_eq!(preview.rect.x, scene.mapper.date_to_x(date("2024-03-03")));
        assert!((preview.rect.x - (rect.x + 2.0 * ppd)).abs() < 1e-9);

        // Small pointer moves keep the card on its day
        let still = drag
            .update_drag(Point::new(grab(rect).x + 0.3 * ppd, rect.center_y()))
            .unwrap();
        assert_eq!(still.rect.x, rect.x);
        assert_eq!(still.start, date("2024-03-01"));

        let release = Point::new(grab(rect).x + 2.4 * ppd, rect.center_y());
        assert_eq!(drag.commit_drag(release).unwrap().new_start, preview.start);
    }

    #[test]
    fn test_second_begin_is_rejected() {
        let (places, events, view) = fixture();
        let scene = scene_for(&places, &events, &view);
        let (first, rect) = card_of(&scene, 0);
        let (second, _) = card_of(&scene, 1);

        let mut drag = DragController::new();
        drag.begin_drag(&scene, first, grab(rect)).unwrap();
        let err = drag.begin_drag(&scene, second, grab(rect)).unwrap_err();
        assert!(matches!(err, LayoutError::GestureStateViolation(_)));

        match drag.state() {
            DragState::Dragging(gesture) => assert_eq!(gesture.card(), first),
            DragState::Idle => panic!("first gesture should still be active"),
        }
    }

    #[test]
    fn test_idle_controller_rejects_update_and_commit() {
        let mut drag = DragController::new();
        let p = Point::new(0.0, 0.0);
        assert!(matches!(drag.update_drag(p), Err(LayoutError::GestureStateViolation(_))));
        assert!(matches!(drag.commit_drag(p), Err(LayoutError::GestureStateViolation(_))));
        assert!(!drag.cancel_drag());
    }

    #[test]
    fn test_unknown_card_is_rejected() {
        let (places, events, view) = fixture();
        let scene = scene_for(&places, &events, &view);
        let ghost = CardId {
            event: EventId(42),
            lane: tl_core::LaneId(0),
        };
        let mut drag = DragController::new();
        assert!(drag.begin_drag(&scene, ghost, Point::new(0.0, 0.0)).is_err());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_cancel_discards_the_gesture() {
        let (places, events, view) = fixture();
        let before = events.clone();
        let scene = scene_for(&places, &events, &view);
        let (card, rect) = card_of(&scene, 0);

        let mut drag = DragController::new();
        drag.begin_drag(&scene, card, grab(rect)).unwrap();
        drag.update_drag(Point::new(rect.x + 300.0, rect.center_y())).unwrap();
        assert!(drag.cancel_drag());
        assert_eq!(drag.state(), &DragState::Idle);
        assert_eq!(events, before);

        drag.begin_drag(&scene, card, grab(rect)).unwrap();
        assert!(drag.pointer_capture_lost());
        assert!(drag.commit_drag(grab(rect)).is_err());
    }

    #[test]
    fn test_deferred_commits_apply_in_order() {
        let (_, mut events, _) = fixture();
        let mut queue = DeferredCommits::new();
        queue.push(DragCommit {
            event: EventId(1),
            new_start: date("2024-03-06"),
            new_end: None,
        });
        queue.push(DragCommit {
            event: EventId(1),
            new_start: date("2024-03-07"),
            new_end: None,
        });
        queue.push(DragCommit {
            event: EventId(9),
            new_start: date("2024-03-07"),
            new_end: None,
        });
        assert_eq!(queue.len(), 3);

        let changed = queue.flush(&mut events);
        assert_eq!(changed, vec![EventId(1), EventId(1)]);
        assert_eq!(events[1].start_date, "2024-03-07");
        assert!(queue.is_empty());
    }
}
