//! Renderer that records draw calls instead of producing pixels

use tl_core::Rgba;

use crate::{Renderer, RendererCapabilities};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        start: [f32; 2],
        end: [f32; 2],
        color: Rgba,
        width: f32,
    },
    Circle {
        center: [f32; 2],
        radius: f32,
        color: Rgba,
    },
    Rect {
        min: [f32; 2],
        max: [f32; 2],
        fill: Rgba,
        stroke: Option<(Rgba, f32)>,
        rounding: f32,
    },
    Text {
        text: String,
        position: [f32; 2],
        color: Rgba,
        size: f32,
    },
    Image {
        image_ref: String,
        min: [f32; 2],
        max: [f32; 2],
        opacity: f32,
    },
}

/// Keeps the commands of the latest frame
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    capabilities: RendererCapabilities,
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capabilities(capabilities: RendererCapabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Completed frames so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Drawn text, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }

    fn draw_line(&mut self, start: [f32; 2], end: [f32; 2], color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            color,
            width,
        });
    }

    fn draw_circle(&mut self, center: [f32; 2], radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_rect(
        &mut self,
        min: [f32; 2],
        max: [f32; 2],
        fill: Rgba,
        stroke: Option<(Rgba, f32)>,
        rounding: f32,
    ) {
        self.commands.push(DrawCommand::Rect {
            min,
            max,
            fill,
            stroke,
            rounding,
        });
    }

    fn draw_text(&mut self, text: &str, position: [f32; 2], color: Rgba, size: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            color,
            size,
        });
    }

    fn draw_image(&mut self, image_ref: &str, min: [f32; 2], max: [f32; 2], opacity: f32) {
        self.commands.push(DrawCommand::Image {
            image_ref: image_ref.to_string(),
            min,
            max,
            opacity,
        });
    }

    fn capabilities(&self) -> RendererCapabilities {
        self.capabilities
    }
}
