use crate::assets::color::Rgba8;
use crate::assets::fonts::FontBook;
use crate::foundation::core::{Affine, Canvas, Point};
use crate::foundation::error::ComposeResult;
use crate::render::compositor::SkipReason;
use crate::render::pixels::affine_to_cpu;
use crate::scene::model::TextLayer;

/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.3;
/// Outline width is the font size divided by this.
pub const STROKE_WIDTH_DIVISOR: f64 = 6.0;

/// Resolved geometry of one text layer, independent of any font.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlockLayout {
    /// Font size in canvas pixels.
    pub font_size: f64,
    /// Distance between consecutive line centers.
    pub line_height: f64,
    /// Block anchor: horizontal center of every line, vertical center of the block.
    pub anchor: Point,
    /// Center point of each line, top to bottom. Blank lines keep their slot.
    pub line_centers: Vec<Point>,
    /// Outline width, when the outline is enabled.
    pub stroke_width: Option<f64>,
}

impl TextBlockLayout {
    /// Lay out `layer` on `canvas`; `None` when the layer paints nothing.
    pub fn compute(layer: &TextLayer, canvas: Canvas) -> Option<Self> {
        if !layer.is_visible() {
            return None;
        }
        let font_size = canvas.width_percent(layer.size_percent);
        let line_height = font_size * LINE_HEIGHT_FACTOR;
        let anchor = canvas.point_at_percent(layer.anchor_x, layer.anchor_y);
        let n = layer.lines().count();
        let first_y = anchor.y - (n.saturating_sub(1) as f64) * line_height / 2.0;
        let line_centers = (0..n)
            .map(|i| Point::new(anchor.x, first_y + i as f64 * line_height))
            .collect();
        Some(Self {
            font_size,
            line_height,
            anchor,
            line_centers,
            stroke_width: layer
                .stroke_enabled
                .then_some(font_size / STROKE_WIDTH_DIVISOR),
        })
    }
}

pub(crate) fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Record the glyph runs of `layer` into `ctx`: per line, outline first and fill on top.
///
/// Returns the number of painted lines, or why nothing was recorded.
pub(crate) fn paint_text_layer(
    ctx: &mut vello_cpu::RenderContext,
    fonts: &mut FontBook,
    layer: &TextLayer,
    canvas: Canvas,
) -> ComposeResult<Result<usize, SkipReason>> {
    let Some(layout) = TextBlockLayout::compute(layer, canvas) else {
        return Ok(Err(if layer.enabled {
            SkipReason::EmptyText
        } else {
            SkipReason::Disabled
        }));
    };
    let Some(font) = fonts.resolve(&layer.font)? else {
        return Ok(Err(SkipReason::NoFont));
    };

    let size = layout.font_size as f32;
    let mut painted = 0usize;
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for (line, center) in layer.lines().zip(&layout.line_centers) {
        if line.trim().is_empty() {
            continue;
        }
        let shaped = fonts.shape_line(&font, line, size)?;
        if shaped.glyphs.is_empty() {
            continue;
        }
        let tx = center.x - f64::from(shaped.width) / 2.0;
        let ty = center.y - f64::from(shaped.middle_y());
        ctx.set_transform(affine_to_cpu(Affine::translate((tx, ty))));

        let glyphs = || {
            shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            })
        };
        if let Some(width) = layout.stroke_width {
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(width).with_join(vello_cpu::kurbo::Join::Round),
            );
            ctx.set_paint(cpu_color(layer.stroke));
            ctx.glyph_run(&font.data)
                .font_size(size)
                .stroke_glyphs(glyphs());
        }
        ctx.set_paint(cpu_color(layer.fill));
        ctx.glyph_run(&font.data)
            .font_size(size)
            .fill_glyphs(glyphs());
        painted += 1;
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(Ok(painted))
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
