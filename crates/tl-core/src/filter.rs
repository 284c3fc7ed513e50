//! Event filtering and date window evaluation

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{DateSpan, Event, EventId};
use crate::state::ViewState;

/// Inclusive range of start dates that are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    pub fn unbounded() -> Self {
        Self {
            from: NaiveDate::MIN,
            to: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Whether both ends are real calendar dates rather than open bounds
    pub fn is_bounded(&self) -> bool {
        self.from != NaiveDate::MIN && self.to != NaiveDate::MAX
    }
}

/// An event that passed the filter, with its parsed span
#[derive(Debug, Clone, Copy)]
pub struct VisibleEvent<'a> {
    pub id: EventId,
    pub event: &'a Event,
    pub span: DateSpan,
}

fn intersects(selection: &BTreeSet<String>, names: &[String]) -> bool {
    names.iter().any(|name| selection.contains(name))
}

/// Events to lay out, in input order
///
/// An event is kept when its start date parses, lies within `window`, and
/// (if a place selection exists) it names a selected place. Character
/// selection never removes events; it only dims them.
pub fn visible_events<'a>(
    events: &'a [Event],
    selected_places: &BTreeSet<String>,
    window: DateWindow,
) -> Vec<VisibleEvent<'a>> {
    let mut visible = Vec::with_capacity(events.len());
    let mut undated = 0usize;

    for (index, event) in events.iter().enumerate() {
        let Some(span) = event.span() else {
            undated += 1;
            debug!(
                title = %event.title,
                start = %event.start_date,
                "event has no usable start date, skipping"
            );
            continue;
        };
        if !window.contains(span.start) {
            continue;
        }
        if !selected_places.is_empty() && !intersects(selected_places, &event.places) {
            continue;
        }
        visible.push(VisibleEvent {
            id: EventId(index),
            event,
            span,
        });
    }

    if undated > 0 {
        debug!(undated, "excluded events without a start date");
    }
    visible
}

/// Window spanning the start dates of all events matching the filters
///
/// Date bounds are deliberately not consulted. When nothing matches, the
/// window collapses onto `today`.
pub fn compute_auto_date_range(
    events: &[Event],
    selected_characters: &BTreeSet<String>,
    selected_places: &BTreeSet<String>,
    today: NaiveDate,
) -> DateWindow {
    let starts = events
        .iter()
        .filter(|e| {
            selected_characters.is_empty() || intersects(selected_characters, &e.characters)
        })
        .filter(|e| selected_places.is_empty() || intersects(selected_places, &e.places))
        .filter_map(Event::start);

    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
    for start in starts {
        bounds = Some(match bounds {
            None => (start, start),
            Some((lo, hi)) => (lo.min(start), hi.max(start)),
        });
    }

    match bounds {
        Some((from, to)) => DateWindow::new(from, to),
        None => DateWindow::single_day(today),
    }
}

/// The window a layout pass should use for `view`
pub fn resolve_window(events: &[Event], view: &ViewState) -> DateWindow {
    if view.auto_date_range {
        return compute_auto_date_range(
            events,
            &view.selected_characters,
            &view.selected_places,
            view.today,
        );
    }
    DateWindow::new(
        view.visible_date_from.unwrap_or(NaiveDate::MIN),
        view.visible_date_to.unwrap_or(NaiveDate::MAX),
    )
}
