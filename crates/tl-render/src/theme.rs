//! Colors and sizes of the chart

use tl_core::Rgba;

pub const LANE_LINE: Rgba = Rgba::rgb(130, 150, 210).with_alpha(200);
pub const LANE_LINE_WIDTH: f32 = 3.0;
pub const AXIS: Rgba = Rgba::rgb(196, 200, 214);
pub const TICK_TEXT: Rgba = Rgba::rgb(120, 120, 130);

pub const TEXT_PRIMARY: Rgba = Rgba::rgb(0x11, 0x18, 0x27);
pub const TEXT_SUBTLE: Rgba = Rgba::rgb(0x0F, 0x76, 0x6E);
pub const TEXT_DESC: Rgba = Rgba::rgb(0x37, 0x41, 0x51);

pub const PILL_BG: Rgba = Rgba::WHITE.with_alpha(235);
pub const PILL_STROKE: Rgba = Rgba::rgb(215, 218, 230);
pub const PILL_HEIGHT: f32 = 36.0;
pub const PILL_PAD_X: f32 = 10.0;
pub const PLACE_AVATAR: f32 = 26.0;
/// Reserved lane pill, to tell it apart from real places
pub const RESERVED_PILL_BG: Rgba = Rgba::rgb(241, 245, 249).with_alpha(235);

pub const BAND_RADIUS: f32 = 14.0;
pub const BAND_STROKE: f32 = 2.0;
pub const GLOW_ALPHA: f32 = 40.0;
pub const GLOW_DROP: f64 = 3.0;
pub const THUMB_RADIUS: f32 = 6.0;

pub const TITLE_SIZE: f32 = 14.0;
pub const DATE_SIZE: f32 = 12.0;
pub const DESC_SIZE: f32 = 11.0;
pub const TICK_LABEL_SIZE: f32 = 12.0;
pub const LANE_LABEL_SIZE: f32 = 11.0;
/// Line height as a multiple of the font size
pub const LINE_SPACING: f32 = 1.2;

pub const TOOLTIP_BG: Rgba = Rgba::WHITE.with_alpha(245);
pub const TOOLTIP_STROKE: Rgba = Rgba::rgb(200, 204, 216);
pub const TOOLTIP_TEXT_SIZE: f32 = 12.0;
pub const TOOLTIP_PAD: f32 = 6.0;
