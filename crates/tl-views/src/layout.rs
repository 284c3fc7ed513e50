//! Event placement engine
//!
//! Every layout pass starts from scratch: entities and view state in, a fresh
//! `TimelineScene` out. Nothing is cached between passes, so the geometry can
//! never go stale relative to the data.

use ahash::AHashMap;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use tl_core::{
    resolve_window, select_lod, visible_events, Character, CoordinateMapper, DateSpan, DateWindow,
    Event, EventId, LaneId, LaneIndex, LayoutConfig, LayoutError, LayoutResult, LodConfig, Place,
    Rgba, ViewState, VisibleEvent,
};

use crate::labels::{date_label, tooltip_text, truncate_chars, truncate_to_width};
use crate::stacking::StackAllocator;
use crate::style::{card_style, VisualStyle};

const CHIP_FALLBACK_COLOR: Rgba = Rgba::rgb(0xA3, 0xA3, 0xA3);
/// Ticks this far left of the lane start are still drawn
const TICK_LEFT_SLACK: f64 = 5.0;
const CONTENT_RIGHT_PADDING: f64 = 40.0;
const CONTENT_BOTTOM_PADDING: f64 = 140.0;

/// A position in view space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in view space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// One card: an event placed in one of its lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CardId {
    pub event: EventId,
    pub lane: LaneId,
}

/// Small colored marker for a character on a card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterChip {
    pub name: String,
    pub color: Rgba,
    pub image_ref: Option<String>,
}

/// Strings and references a renderer shows on a card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFields {
    pub title: String,
    pub date_label: String,
    pub description: Option<String>,
    pub thumbnail_ref: Option<String>,
    pub character_chips: Vec<CharacterChip>,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedCard {
    pub id: CardId,
    pub event: EventId,
    /// Place of the lane; `None` in the reserved unplaced lane
    pub place: Option<String>,
    pub lane: LaneId,
    /// Normalized dates the card was placed from
    pub span: DateSpan,
    /// Whether the event stores its own end date
    pub has_end_date: bool,
    pub rect: Rect,
    pub style: VisualStyle,
    pub fields: DisplayFields,
}

/// A horizontal row of the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneRow {
    pub lane: LaneId,
    pub label: String,
    pub image_ref: Option<String>,
    pub reserved: bool,
    pub y: f64,
    pub height: f64,
}

impl LaneRow {
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// A vertical date marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickMark {
    pub date: NaiveDate,
    pub x: f64,
    pub label: String,
}

/// Complete output of a layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScene {
    /// Cards in placement order; later cards draw on top
    pub cards: Vec<PositionedCard>,
    pub lanes: Vec<LaneRow>,
    pub ticks: Vec<TickMark>,
    pub mapper: CoordinateMapper,
    pub lod: LodConfig,
    pub window: DateWindow,
    /// Horizontal extent a card may be dragged within
    pub lane_left: f64,
    pub lane_right: f64,
    pub content_width: f64,
    pub content_height: f64,
}

impl TimelineScene {
    pub fn card(&self, id: CardId) -> Option<&PositionedCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Topmost card under `point`
    pub fn hit_test(&self, point: Point) -> Option<&PositionedCard> {
        self.cards.iter().rev().find(|c| c.rect.contains(point))
    }

    pub fn cards_for_event(&self, event: EventId) -> impl Iterator<Item = &PositionedCard> {
        self.cards.iter().filter(move |c| c.event == event)
    }
}

/// Cards only; see `compute_scene` for lanes and ticks
pub fn compute_layout(
    places: &[Place],
    characters: &[Character],
    events: &[Event],
    view: &ViewState,
    config: &LayoutConfig,
) -> LayoutResult<Vec<PositionedCard>> {
    compute_scene(places, characters, events, view, config).map(|scene| scene.cards)
}

/// Lay out every visible event in every lane it belongs to
///
/// # Errors
/// - `InvalidLayoutParameter` for a non-positive zoom, an invalid `config`,
///   or visible events with no lane to go to.
pub fn compute_scene(
    places: &[Place],
    characters: &[Character],
    events: &[Event],
    view: &ViewState,
    config: &LayoutConfig,
) -> LayoutResult<TimelineScene> {
    config.validate()?;

    let lod = select_lod(view.zoom_factor, &config.lod);
    let mapper = CoordinateMapper::for_zoom(
        view.pan_origin,
        config.base_step_width,
        view.zoom_factor,
        &lod,
    )?
    .with_x_offset(config.left_margin);

    let lanes = LaneIndex::build(places, config);
    let window = resolve_window(events, view);
    let visible = visible_events(events, &view.selected_places, window);

    if lanes.is_empty() && !visible.is_empty() {
        return Err(LayoutError::InvalidLayoutParameter(format!(
            "no lanes to place {} visible events in",
            visible.len()
        )));
    }

    let mut by_name: AHashMap<&str, &Character> = AHashMap::with_capacity(characters.len());
    for character in characters {
        by_name.entry(character.name.as_str()).or_insert(character);
    }

    let placer = CardPlacer {
        config,
        lod: &lod,
        mapper: &mapper,
        lanes: &lanes,
        characters: &by_name,
        view,
    };

    let mut stack = StackAllocator::new();
    let mut cards = Vec::with_capacity(visible.len());
    let mut skipped = 0usize;

    for item in &visible {
        let targets = lane_targets(item, &lanes);
        if targets.is_empty() {
            skipped += 1;
            continue;
        }
        for (lane, place) in targets {
            let offset = stack.next_offset(lane, item.span.start, config);
            cards.push(placer.place(item, lane, place, offset));
        }
    }

    let rows = lane_rows(places, &lanes);
    let (ticks, last_day) = tick_marks(&visible, window, &mapper, &lod, config);

    let lane_left = config.left_margin;
    let lane_right = last_day
        .map(|day| mapper.date_to_x(day.succ_opt().unwrap_or(day)) + config.trailing_padding)
        .unwrap_or(lane_left)
        .max(lane_left);

    debug!(
        visible = visible.len(),
        cards = cards.len(),
        skipped,
        tier = ?lod.tier,
        "layout pass complete"
    );

    Ok(TimelineScene {
        cards,
        lanes: rows,
        ticks,
        mapper,
        lod,
        window,
        lane_left,
        lane_right,
        content_width: lane_right + CONTENT_RIGHT_PADDING,
        content_height: lanes.bottom() + CONTENT_BOTTOM_PADDING,
    })
}

/// Lanes an event occupies, paired with the place that put it there
fn lane_targets(item: &VisibleEvent<'_>, lanes: &LaneIndex) -> Vec<(LaneId, Option<String>)> {
    let places = item.event.distinct_places();
    if places.is_empty() {
        return match lanes.unplaced_lane() {
            Some(lane) => vec![(lane, None)],
            None => {
                debug!(title = %item.event.title, "event has no places, dropping");
                Vec::new()
            }
        };
    }

    places
        .into_iter()
        .filter_map(|name| match lanes.lane_of(name) {
            Some(lane) => Some((lane, Some(name.to_string()))),
            None => {
                debug!(title = %item.event.title, place = name, "unknown place reference");
                None
            }
        })
        .collect()
}

/// Per-pass context for building cards
struct CardPlacer<'a> {
    config: &'a LayoutConfig,
    lod: &'a LodConfig,
    mapper: &'a CoordinateMapper,
    lanes: &'a LaneIndex,
    characters: &'a AHashMap<&'a str, &'a Character>,
    view: &'a ViewState,
}

impl CardPlacer<'_> {
    fn place(
        &self,
        item: &VisibleEvent<'_>,
        lane: LaneId,
        place: Option<String>,
        stack_offset: f64,
    ) -> PositionedCard {
        let x_start = self.mapper.date_to_x(item.span.start);
        let x_end = self.mapper.date_to_x(item.span.end_exclusive());
        let width = (x_end - x_start).max(self.config.min_card_width);
        let height = self.lod.card_height;
        let y = self.lanes.center_y(lane) - height / 2.0 + stack_offset;

        let style = card_style(
            item.event,
            self.characters,
            &self.view.selected_characters,
            self.config,
        );

        PositionedCard {
            id: CardId {
                event: item.id,
                lane,
            },
            event: item.id,
            place,
            lane,
            span: item.span,
            has_end_date: item.event.has_end_date(),
            rect: Rect::new(x_start, y, width, height),
            style,
            fields: self.display_fields(item, width),
        }
    }

    fn display_fields(&self, item: &VisibleEvent<'_>, card_width: f64) -> DisplayFields {
        let event = item.event;
        let config = self.config;
        let lod = self.lod;

        let thumbnail_ref = if lod.show_thumbnail {
            event.thumbnail_ref().map(str::to_string)
        } else {
            None
        };

        let character_chips: Vec<CharacterChip> = event
            .characters
            .iter()
            .take(lod.max_chips)
            .map(|name| {
                let character = self.characters.get(name.as_str());
                CharacterChip {
                    name: name.clone(),
                    color: character
                        .and_then(|c| c.color_tag())
                        .unwrap_or(CHIP_FALLBACK_COLOR),
                    image_ref: character.and_then(|c| c.image_ref()).map(str::to_string),
                }
            })
            .collect();

        let mut text_width = card_width - 2.0 * config.card_text_padding;
        if thumbnail_ref.is_some() {
            text_width -= lod.thumbnail_size.min(lod.card_height - 8.0) + config.card_text_padding;
        }
        text_width -= character_chips.len() as f64 * (config.chip_size + config.chip_gap);

        let dates = date_label(&item.span, lod.date_format);
        let description = if lod.show_description {
            let fits = if text_width > 0.0 {
                (text_width / config.avg_char_width).floor() as usize
            } else {
                0
            };
            Some(truncate_chars(&event.description, lod.description_chars.min(fits)))
                .filter(|d| !d.is_empty())
        } else {
            None
        };

        DisplayFields {
            title: truncate_to_width(&event.title, text_width, config.avg_char_width),
            tooltip: tooltip_text(event, &dates),
            date_label: dates,
            description,
            thumbnail_ref,
            character_chips,
        }
    }
}

fn lane_rows(places: &[Place], lanes: &LaneIndex) -> Vec<LaneRow> {
    let mut images: AHashMap<&str, &str> = AHashMap::with_capacity(places.len());
    for place in places {
        if let Some(image) = place.image_ref() {
            images.entry(place.name.as_str()).or_insert(image);
        }
    }

    lanes
        .iter()
        .map(|(lane, label)| {
            let reserved = lanes.is_reserved(lane);
            LaneRow {
                lane,
                label: label.to_string(),
                image_ref: if reserved {
                    None
                } else {
                    images.get(label).map(|s| s.to_string())
                },
                reserved,
                y: lanes.row_y(lane),
                height: lanes.row_height(),
            }
        })
        .collect()
}

/// Ticks covering the shown dates, plus the last day the lanes must reach
///
/// A bounded window defines the range; an open one falls back to the
/// visible events' extent. Ticks start on the Monday on or before the day
/// preceding the range. An empty chart gets no ticks.
fn tick_marks(
    visible: &[VisibleEvent<'_>],
    window: DateWindow,
    mapper: &CoordinateMapper,
    lod: &LodConfig,
    config: &LayoutConfig,
) -> (Vec<TickMark>, Option<NaiveDate>) {
    if visible.is_empty() {
        return (Vec::new(), None);
    }
    let range = if window.is_bounded() {
        Some((window.from, window.to))
    } else {
        let first = visible.iter().map(|v| v.span.start).min();
        let last = visible.iter().map(|v| v.span.end).max();
        first.zip(last)
    };

    let Some((first, last)) = range else {
        return (Vec::new(), None);
    };
    let last = visible
        .iter()
        .map(|v| v.span.end)
        .fold(last, NaiveDate::max);

    let before = first.pred_opt().unwrap_or(first);
    let after = last.succ_opt().unwrap_or(last);
    let weekday_offset = before.weekday().num_days_from_monday() as i64;
    let mut tick = before
        .checked_sub_signed(Duration::days(weekday_offset))
        .unwrap_or(before);
    let step = Duration::days(lod.tick_days as i64);

    let mut ticks = Vec::new();
    while tick <= after && ticks.len() < config.max_ticks {
        let x = mapper.date_to_x(tick);
        if x >= config.left_margin - TICK_LEFT_SLACK {
            ticks.push(TickMark {
                date: tick,
                x,
                label: tick.format(lod.date_format).to_string(),
            });
        }
        match tick.checked_add_signed(step) {
            Some(next) => tick = next,
            None => break,
        }
    }

    (ticks, Some(last))
}
