//! Date to horizontal position mapping

use chrono::{Duration, NaiveDate};

use crate::navigation::LodConfig;
use crate::{LayoutError, LayoutResult};

/// Linear mapping between calendar days and x coordinates
///
/// `origin` sits at `x_offset`; each day further right adds `pixels_per_day`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    origin: NaiveDate,
    pixels_per_day: f64,
    x_offset: f64,
}

impl CoordinateMapper {
    /// Create a mapper; the scale must be strictly positive and finite
    pub fn new(origin: NaiveDate, pixels_per_day: f64) -> LayoutResult<Self> {
        if !(pixels_per_day.is_finite() && pixels_per_day > 0.0) {
            return Err(LayoutError::InvalidLayoutParameter(format!(
                "pixels per day must be positive, got {pixels_per_day}"
            )));
        }
        Ok(Self {
            origin,
            pixels_per_day,
            x_offset: 0.0,
        })
    }

    /// Mapper for a zoom level: one tick interval spans `base_step_width * zoom`
    pub fn for_zoom(
        origin: NaiveDate,
        base_step_width: f64,
        zoom_factor: f64,
        lod: &LodConfig,
    ) -> LayoutResult<Self> {
        if !(zoom_factor.is_finite() && zoom_factor > 0.0) {
            return Err(LayoutError::InvalidLayoutParameter(format!(
                "zoom factor must be positive, got {zoom_factor}"
            )));
        }
        Self::new(origin, base_step_width * zoom_factor / lod.tick_days as f64)
    }

    /// Shift every x by `x_offset` (left margin of the lanes)
    pub fn with_x_offset(mut self, x_offset: f64) -> Self {
        self.x_offset = x_offset;
        self
    }

    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    pub fn pixels_per_day(&self) -> f64 {
        self.pixels_per_day
    }

    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }

    pub fn date_to_x(&self, date: NaiveDate) -> f64 {
        let days = (date - self.origin).num_days() as f64;
        self.x_offset + days * self.pixels_per_day
    }

    /// Inverse of `date_to_x`, snapped to the nearest whole day
    pub fn x_to_date(&self, x: f64) -> NaiveDate {
        let days = ((x - self.x_offset) / self.pixels_per_day).round();
        if !days.is_finite() {
            return self.origin;
        }
        // Out-of-range offsets saturate at the calendar bounds
        let clamped = days.clamp(i32::MIN as f64, i32::MAX as f64) as i64;
        match self.origin.checked_add_signed(Duration::days(clamped)) {
            Some(date) => date,
            None if clamped < 0 => NaiveDate::MIN,
            None => NaiveDate::MAX,
        }
    }

    /// Width of `days` whole days
    pub fn days_to_width(&self, days: i64) -> f64 {
        days as f64 * self.pixels_per_day
    }
}
