//! Rendering abstraction layer
//!
//! The placement engine only produces geometry. This crate turns a
//! `TimelineScene` into draw calls against a small backend-neutral
//! [`Renderer`] trait, with an `egui::Painter` backend for interactive hosts
//! and a recording backend for headless use.

mod egui_painter;
mod recording;
mod scene;
pub mod theme;

use tl_core::Rgba;

pub use egui_painter::{to_color32, EguiRenderer};
pub use recording::{DrawCommand, RecordingRenderer};
pub use scene::{render_scene, render_tooltip};

/// Trait for renderers
pub trait Renderer {
    /// Begin a new frame
    fn begin_frame(&mut self);

    /// End the current frame
    fn end_frame(&mut self);

    /// Draw a line
    fn draw_line(&mut self, start: [f32; 2], end: [f32; 2], color: Rgba, width: f32);

    /// Draw a filled circle
    fn draw_circle(&mut self, center: [f32; 2], radius: f32, color: Rgba);

    /// Draw a rectangle with optional outline
    fn draw_rect(
        &mut self,
        min: [f32; 2],
        max: [f32; 2],
        fill: Rgba,
        stroke: Option<(Rgba, f32)>,
        rounding: f32,
    );

    /// Draw a single line of text anchored at its top-left corner
    fn draw_text(&mut self, text: &str, position: [f32; 2], color: Rgba, size: f32);

    /// Draw an image given by an opaque host reference
    fn draw_image(&mut self, image_ref: &str, min: [f32; 2], max: [f32; 2], opacity: f32);

    /// Get renderer capabilities
    fn capabilities(&self) -> RendererCapabilities;
}

/// Renderer capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererCapabilities {
    /// Image references can be resolved and drawn
    pub supports_images: bool,
    pub supports_rounding: bool,
}

impl Default for RendererCapabilities {
    fn default() -> Self {
        Self {
            supports_images: true,
            supports_rounding: true,
        }
    }
}
