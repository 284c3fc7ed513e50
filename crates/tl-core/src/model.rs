//! Entity model: places, characters and events
//!
//! Entities are plain data owned by the host. Dates stay in their stored
//! `YYYY-MM-DD` form and are parsed on demand, so a malformed date only hides
//! the event instead of failing the whole document.

use ahash::AHashSet;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Storage format of calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored date, treating blank or malformed input as absent
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

/// Format a date the way it is stored on events
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Index of an event in the host's event list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub usize);

/// A location; each place owns one lane on the chart
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    pub name: String,
    pub description: String,
    /// Free-form notes, kept for the host
    pub texts: Vec<String>,
    pub images: Vec<String>,
}

impl Place {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// First non-empty image reference
    pub fn image_ref(&self) -> Option<&str> {
        first_ref(&self.images)
    }
}

/// A character; only its color and image are used by the layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    pub description: String,
    /// Color tag as `#RRGGBB`
    pub color: String,
    pub texts: Vec<String>,
    pub images: Vec<String>,
}

impl Character {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            ..Default::default()
        }
    }

    pub fn image_ref(&self) -> Option<&str> {
        first_ref(&self.images)
    }

    /// Parsed color tag, if well formed
    pub fn color_tag(&self) -> Option<Rgba> {
        Rgba::from_hex(&self.color)
    }
}

/// Something that happened, somewhere, to someone
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub title: String,
    pub description: String,
    /// Older documents call this `date`
    #[serde(alias = "date")]
    pub start_date: String,
    /// Inclusive end date; empty means a single day
    pub end_date: String,
    /// Associated place names
    pub places: Vec<String>,
    /// Associated character names; the first one tints the event
    pub characters: Vec<String>,
    pub images: Vec<String>,
}

impl Event {
    pub fn new(title: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start_date: start_date.into(),
            ..Default::default()
        }
    }

    pub fn with_end(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = end_date.into();
        self
    }

    pub fn with_places<I, S>(mut self, places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.places = places.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_characters<I, S>(mut self, characters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.characters = characters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn start(&self) -> Option<NaiveDate> {
        parse_date(&self.start_date)
    }

    /// Normalized date span, or `None` when the start date is unusable
    pub fn span(&self) -> Option<DateSpan> {
        let start = self.start()?;
        Some(DateSpan::normalized(start, parse_date(&self.end_date)))
    }

    /// Whether the event stores an explicit, usable end date
    pub fn has_end_date(&self) -> bool {
        matches!((self.start(), parse_date(&self.end_date)), (Some(s), Some(e)) if e >= s)
    }

    /// Place names with duplicates removed, first occurrence kept
    pub fn distinct_places(&self) -> Vec<&str> {
        let mut seen = AHashSet::with_capacity(self.places.len());
        self.places
            .iter()
            .map(String::as_str)
            .filter(|place| seen.insert(*place))
            .collect()
    }

    pub fn thumbnail_ref(&self) -> Option<&str> {
        first_ref(&self.images)
    }
}

/// Inclusive day range of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Build a span, collapsing a missing or inverted end onto the start
    pub fn normalized(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        let end = match end {
            Some(end) if end >= start => end,
            _ => start,
        };
        Self { start, end }
    }

    /// Days between start and end; zero for single-day events
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// First day after the span
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(self.end)
    }

    /// Same duration, new start
    pub fn shifted_to(&self, start: NaiveDate) -> Self {
        let end = start
            .checked_add_signed(Duration::days(self.duration_days()))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }
}

/// Straight RGBA color, backend neutral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Blend toward `other` by `amount` (0 keeps self, 1 gives other)
    pub fn mix(self, other: Rgba, amount: f32) -> Self {
        let p = amount.clamp(0.0, 1.0);
        let blend = |a: u8, b: u8| (a as f32 * (1.0 - p) + b as f32 * p) as u8;
        Self::rgb(blend(self.r, other.r), blend(self.g, other.g), blend(self.b, other.b))
    }

    /// Divide each channel by `factor`
    pub fn darker(self, factor: f32) -> Self {
        let factor = factor.max(1.0);
        let scale = |c: u8| (c as f32 / factor).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    pub fn as_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn first_ref(refs: &[String]) -> Option<&str> {
    refs.iter().map(|r| r.trim()).find(|r| !r.is_empty())
}
