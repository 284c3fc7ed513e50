//! Scene painting on top of any [`Renderer`]

use tracing::trace;

use tl_core::{LayoutConfig, LodConfig, Rgba};
use tl_views::{DragPreview, LaneRow, Point, PositionedCard, Rect, TickMark, TimelineScene};

use crate::theme;
use crate::Renderer;

/// Draw a complete frame: lanes, ticks, then cards in placement order
///
/// A card under an active drag is drawn last, at the preview position.
pub fn render_scene(
    renderer: &mut dyn Renderer,
    scene: &TimelineScene,
    config: &LayoutConfig,
    preview: Option<&DragPreview>,
) {
    renderer.begin_frame();

    for row in &scene.lanes {
        draw_lane(renderer, row, scene, config);
    }
    let axis_top = scene.lanes.first().map_or(config.top_margin, |row| row.y);
    for tick in &scene.ticks {
        draw_tick(renderer, tick, axis_top, scene.content_height);
    }

    let mut dragged = None;
    for card in &scene.cards {
        match preview {
            Some(p) if p.card == card.id => dragged = Some((card, p)),
            _ => draw_card(renderer, card, card.rect, &scene.lod, config),
        }
    }
    if let Some((card, p)) = dragged {
        draw_card(renderer, card, p.rect, &scene.lod, config);
        let label = p.start.format(scene.lod.date_format).to_string();
        renderer.draw_text(
            &label,
            pt(p.rect.x, p.rect.y - f64::from(theme::DATE_SIZE * theme::LINE_SPACING)),
            theme::TEXT_SUBTLE,
            theme::DATE_SIZE,
        );
    }

    trace!(cards = scene.cards.len(), ticks = scene.ticks.len(), "frame drawn");
    renderer.end_frame();
}

/// Tooltip box for the topmost card under `pointer`; returns whether one was shown
pub fn render_tooltip(renderer: &mut dyn Renderer, scene: &TimelineScene, pointer: Point) -> bool {
    let Some(card) = scene.hit_test(pointer) else {
        return false;
    };
    let lines: Vec<&str> = card.fields.tooltip.lines().collect();
    let line_h = theme::TOOLTIP_TEXT_SIZE * theme::LINE_SPACING;
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = longest as f32 * theme::TOOLTIP_TEXT_SIZE * 0.55 + 2.0 * theme::TOOLTIP_PAD;
    let height = lines.len() as f32 * line_h + 2.0 * theme::TOOLTIP_PAD;

    let min = [pointer.x as f32 + 12.0, pointer.y as f32 + 16.0];
    renderer.draw_rect(
        min,
        [min[0] + width, min[1] + height],
        theme::TOOLTIP_BG,
        Some((theme::TOOLTIP_STROKE, 1.0)),
        4.0,
    );
    for (i, line) in lines.iter().enumerate() {
        renderer.draw_text(
            line,
            [min[0] + theme::TOOLTIP_PAD, min[1] + theme::TOOLTIP_PAD + i as f32 * line_h],
            theme::TEXT_PRIMARY,
            theme::TOOLTIP_TEXT_SIZE,
        );
    }
    true
}

fn draw_lane(
    renderer: &mut dyn Renderer,
    row: &LaneRow,
    scene: &TimelineScene,
    config: &LayoutConfig,
) {
    let mid = row.center_y();
    renderer.draw_line(
        pt(scene.lane_left - 8.0, mid),
        pt(scene.content_width - 60.0, mid),
        theme::LANE_LINE,
        theme::LANE_LINE_WIDTH,
    );

    let pill = Rect::new(
        20.0,
        mid - f64::from(theme::PILL_HEIGHT) / 2.0,
        (config.left_margin - 40.0).max(0.0),
        f64::from(theme::PILL_HEIGHT),
    );
    let pill_bg = if row.reserved { theme::RESERVED_PILL_BG } else { theme::PILL_BG };
    rect(renderer, pill, pill_bg, Some((theme::PILL_STROKE, 1.0)), theme::PILL_HEIGHT / 2.0);

    let mut name_x = pill.x + f64::from(theme::PILL_PAD_X);
    if let Some(image_ref) = &row.image_ref {
        let size = f64::from(theme::PLACE_AVATAR.min(theme::PILL_HEIGHT - 8.0));
        let avatar = Rect::new(name_x, pill.y + (pill.height - size) / 2.0, size, size);
        rect(
            renderer,
            avatar,
            Rgba::WHITE,
            Some((Rgba::BLACK.with_alpha(20), 1.0)),
            size as f32 / 2.0,
        );
        image(renderer, image_ref, inset(avatar, 3.0), 1.0);
        name_x = avatar.right() + 8.0;
    }
    renderer.draw_text(
        &row.label,
        pt(name_x, mid - f64::from(theme::LANE_LABEL_SIZE * theme::LINE_SPACING) / 2.0),
        theme::TEXT_PRIMARY,
        theme::LANE_LABEL_SIZE,
    );
}

fn draw_tick(renderer: &mut dyn Renderer, tick: &TickMark, axis_top: f64, content_height: f64) {
    renderer.draw_line(
        pt(tick.x, axis_top - 32.0),
        pt(tick.x, content_height - 20.0),
        theme::AXIS,
        1.0,
    );
    renderer.draw_text(
        &tick.label,
        pt(tick.x - 40.0, axis_top - 56.0),
        theme::TICK_TEXT,
        theme::TICK_LABEL_SIZE,
    );
}

fn draw_card(
    renderer: &mut dyn Renderer,
    card: &PositionedCard,
    band: Rect,
    lod: &LodConfig,
    config: &LayoutConfig,
) {
    let opacity = card.style.opacity;
    let fields = &card.fields;

    let glow = band.translated(0.0, theme::GLOW_DROP);
    rect(
        renderer,
        glow,
        Rgba::BLACK.with_alpha(fade(theme::GLOW_ALPHA, opacity)),
        None,
        theme::BAND_RADIUS,
    );
    rect(
        renderer,
        band,
        card.style.fill_color,
        Some((card.style.border_color, theme::BAND_STROKE)),
        theme::BAND_RADIUS,
    );

    let mut left_pad = 10.0;
    if let Some(thumb) = &fields.thumbnail_ref {
        if band.height > 20.0 {
            let size = (band.height - 8.0).min(lod.thumbnail_size);
            let frame = Rect::new(band.x + 8.0, band.y + (band.height - size) / 2.0, size, size);
            rect(
                renderer,
                frame,
                Rgba::WHITE.with_alpha(fade(255.0, opacity)),
                Some((Rgba::BLACK.with_alpha(25), 1.0)),
                theme::THUMB_RADIUS,
            );
            image(renderer, thumb, inset(frame, 3.0), opacity);
            left_pad = size + 14.0;
        }
    }

    let mut lines = vec![
        (fields.title.as_str(), theme::TEXT_PRIMARY, 255.0, theme::TITLE_SIZE),
        (fields.date_label.as_str(), theme::TEXT_SUBTLE, 255.0, theme::DATE_SIZE),
    ];
    if let Some(description) = &fields.description {
        lines.push((description.as_str(), theme::TEXT_DESC, 240.0, theme::DESC_SIZE));
    }
    let block_h: f32 = lines.iter().map(|l| l.3 * theme::LINE_SPACING).sum();
    let text_x = band.x + left_pad + 4.0;
    let mut y = band.y + (band.height - f64::from(block_h)) / 2.0;
    for (text, color, alpha, size) in lines {
        if !text.is_empty() {
            renderer.draw_text(text, pt(text_x, y), color.with_alpha(fade(alpha, opacity)), size);
        }
        y += f64::from(size * theme::LINE_SPACING);
    }

    let chip = config.chip_size;
    let mut chip_x = band.right() - 8.0 - chip;
    let chip_y = band.y + (band.height - chip) / 2.0;
    for c in &fields.character_chips {
        let radius = chip / 2.0;
        renderer.draw_circle(
            pt(chip_x + radius, chip_y + radius),
            radius as f32,
            c.color.with_alpha(fade(255.0, opacity)),
        );
        if let Some(image_ref) = &c.image_ref {
            image(renderer, image_ref, inset(Rect::new(chip_x, chip_y, chip, chip), 2.0), opacity);
        }
        chip_x -= chip + config.chip_gap;
    }
}

fn rect(
    renderer: &mut dyn Renderer,
    r: Rect,
    fill: Rgba,
    stroke: Option<(Rgba, f32)>,
    rounding: f32,
) {
    let rounding = if renderer.capabilities().supports_rounding { rounding } else { 0.0 };
    renderer.draw_rect(pt(r.x, r.y), pt(r.right(), r.bottom()), fill, stroke, rounding);
}

fn image(renderer: &mut dyn Renderer, image_ref: &str, r: Rect, opacity: f32) {
    if renderer.capabilities().supports_images {
        renderer.draw_image(image_ref, pt(r.x, r.y), pt(r.right(), r.bottom()), opacity);
    }
}

fn inset(r: Rect, by: f64) -> Rect {
    Rect::new(r.x + by, r.y + by, (r.width - 2.0 * by).max(0.0), (r.height - 2.0 * by).max(0.0))
}

fn fade(alpha: f32, opacity: f32) -> u8 {
    (alpha * opacity.clamp(0.0, 1.0)) as u8
}

fn pt(x: f64, y: f64) -> [f32; 2] {
    [x as f32, y as f32]
}
