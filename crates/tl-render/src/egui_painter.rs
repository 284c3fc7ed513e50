//! `egui::Painter` backend

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Stroke, Vec2};

use tl_core::Rgba;

use crate::{Renderer, RendererCapabilities};

const IMAGE_PLACEHOLDER: Rgba = Rgba::rgb(226, 232, 240);

pub fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Paints into an egui layer
///
/// Scene coordinates are shifted by `origin`, the screen position of the
/// scene's top-left corner (usually the scroll area's content origin).
/// Image references are not resolved here, so the renderer reports no image
/// support and thumbnails keep their empty frames. Direct `draw_image` calls
/// paint a placeholder.
pub struct EguiRenderer {
    painter: Painter,
    origin: Vec2,
}

impl EguiRenderer {
    pub fn new(painter: Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin: origin.to_vec2(),
        }
    }

    fn pos(&self, p: [f32; 2]) -> Pos2 {
        Pos2::new(p[0], p[1]) + self.origin
    }

    fn rect(&self, min: [f32; 2], max: [f32; 2]) -> Rect {
        Rect::from_min_max(self.pos(min), self.pos(max))
    }
}

impl Renderer for EguiRenderer {
    // egui paints immediately; frames are owned by the host context
    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {}

    fn draw_line(&mut self, start: [f32; 2], end: [f32; 2], color: Rgba, width: f32) {
        self.painter
            .line_segment([self.pos(start), self.pos(end)], Stroke::new(width, to_color32(color)));
    }

    fn draw_circle(&mut self, center: [f32; 2], radius: f32, color: Rgba) {
        self.painter.circle_filled(self.pos(center), radius, to_color32(color));
    }

    fn draw_rect(
        &mut self,
        min: [f32; 2],
        max: [f32; 2],
        fill: Rgba,
        stroke: Option<(Rgba, f32)>,
        rounding: f32,
    ) {
        let stroke = stroke.map_or(Stroke::NONE, |(color, width)| {
            Stroke::new(width, to_color32(color))
        });
        self.painter
            .rect(self.rect(min, max), Rounding::same(rounding), to_color32(fill), stroke);
    }

    fn draw_text(&mut self, text: &str, position: [f32; 2], color: Rgba, size: f32) {
        self.painter.text(
            self.pos(position),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(size),
            to_color32(color),
        );
    }

    fn draw_image(&mut self, _image_ref: &str, min: [f32; 2], max: [f32; 2], opacity: f32) {
        let alpha = (255.0 * opacity.clamp(0.0, 1.0)) as u8;
        self.painter.rect_filled(
            self.rect(min, max),
            Rounding::same(3.0),
            to_color32(IMAGE_PLACEHOLDER.with_alpha(alpha)),
        );
    }

    fn capabilities(&self) -> RendererCapabilities {
        RendererCapabilities {
            supports_images: false,
            supports_rounding: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_conversion_keeps_straight_alpha() {
        let c = to_color32(Rgba::rgb(0xEF, 0x44, 0x44));
        assert_eq!(c.to_srgba_unmultiplied(), [0xEF, 0x44, 0x44, 255]);
        let clear = to_color32(Rgba::WHITE.with_alpha(0));
        assert_eq!(clear.a(), 0);
    }

    #[test]
    fn test_scene_paints_into_egui_layer() {
        use chrono::NaiveDate;
        use tl_core::{Event, LayoutConfig, Place, ViewState};

        let day = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let places = vec![Place::new("Castle")];
        let events = vec![Event::new("Siege", "2024-03-01")
            .with_end("2024-03-04")
            .with_places(["Castle"])];
        let mut view = ViewState::new(day("2030-01-01"));
        view.pan_origin = day("2024-02-26");
        let config = LayoutConfig::default();
        let scene = tl_views::compute_scene(&places, &[], &events, &view, &config).unwrap();

        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let mut renderer = EguiRenderer::new(painter, Pos2::new(10.0, 20.0));
            crate::render_scene(&mut renderer, &scene, &config, None);
        });
        assert!(!output.shapes.is_empty());
    }
}
