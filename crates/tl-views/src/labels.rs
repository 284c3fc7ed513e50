//! Display strings for cards
//!
//! Widths are estimated from an average glyph width, so truncation is
//! approximate; the renderer may still clip.

use tl_core::{DateSpan, Event};

const ELLIPSIS: char = '…';

/// "start" or "start – end", in the tier's date format
pub fn date_label(span: &DateSpan, format: &str) -> String {
    let start = span.start.format(format).to_string();
    if span.end == span.start {
        return start;
    }
    let end = span.end.format(format).to_string();
    if end == start {
        start
    } else {
        format!("{start} – {end}")
    }
}

/// Shorten `text` to roughly fit `max_width`, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, max_width: f64, avg_char_width: f64) -> String {
    let budget = if max_width > 0.0 && avg_char_width > 0.0 {
        (max_width / avg_char_width).floor() as usize
    } else {
        0
    };
    truncate_chars(text, budget)
}

pub(crate) fn truncate_chars(text: &str, budget: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(budget - 1).collect();
    out = out.trim_end().to_string();
    out.push(ELLIPSIS);
    out
}

/// Hover text: title, dates, description, characters, places
pub fn tooltip_text(event: &Event, date_label: &str) -> String {
    let mut lines = vec![event.title.clone(), date_label.to_string()];
    let description = event.description.trim();
    if !description.is_empty() {
        lines.push(description.to_string());
    }
    if !event.characters.is_empty() {
        lines.push(format!("Characters: {}", event.characters.join(", ")));
    }
    if !event.places.is_empty() {
        lines.push(format!("Places: {}", event.places.join(", ")));
    }
    lines.join("\n")
}
