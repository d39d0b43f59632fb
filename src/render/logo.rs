use vello_cpu::kurbo::Shape as _;

use crate::assets::color::Rgba8;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Size};
use crate::render::pixels::{affine_to_cpu, point_to_cpu, rect_to_cpu};
use crate::render::text::cpu_color;
use crate::scene::model::{LogoFit, LogoShape, LogoSpec};

/// Border width as a fraction of the logo area size.
pub const BORDER_FRACTION: f64 = 0.02;
/// Border color.
pub const BORDER_COLOR: Rgba8 = Rgba8::WHITE;

/// Resolved geometry of the logo layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogoPlacement {
    /// Clip shape.
    pub shape: LogoShape,
    /// Center of the clip region.
    pub center: Point,
    /// Circle diameter or square side in canvas pixels.
    pub area_size: f64,
    /// Bounding box of the clip region.
    pub clip_bounds: Rect,
    /// Size after the fit policy, before the inner scale.
    pub fitted: Size,
    /// Final drawn size.
    pub drawn: Size,
    /// Drawn rectangle, centered on `center`. May exceed the clip.
    pub draw_rect: Rect,
    /// Border stroke width.
    pub border_width: f64,
}

impl LogoPlacement {
    /// Place a logo of intrinsic size `logo` according to `spec`.
    pub fn compute(spec: &LogoSpec, logo: Size, canvas: Canvas) -> Self {
        let area_size = canvas.width_percent(spec.size_percent);
        let center = canvas.point_at_percent(spec.anchor_x, spec.anchor_y);
        let ratio = logo.width / logo.height;
        let wide = ratio > 1.0;
        let fitted = match (spec.fit, wide) {
            (LogoFit::Cover, true) | (LogoFit::Contain, false) => {
                Size::new(area_size * ratio, area_size)
            }
            (LogoFit::Cover, false) | (LogoFit::Contain, true) => {
                Size::new(area_size, area_size / ratio)
            }
        };
        let drawn = Size::new(
            fitted.width * spec.inner_scale,
            fitted.height * spec.inner_scale,
        );
        Self {
            shape: spec.shape,
            center,
            area_size,
            clip_bounds: Rect::from_center_size(center, Size::new(area_size, area_size)),
            fitted,
            drawn,
            draw_rect: Rect::from_center_size(center, drawn),
            border_width: area_size * BORDER_FRACTION,
        }
    }

    pub(crate) fn clip_path(&self) -> vello_cpu::kurbo::BezPath {
        match self.shape {
            LogoShape::Circle => {
                vello_cpu::kurbo::Circle::new(point_to_cpu(self.center), self.area_size / 2.0)
                    .to_path(0.1)
            }
            LogoShape::Square => rect_to_cpu(self.clip_bounds).to_path(0.1),
        }
    }
}

/// Record the clipped logo and its border into `ctx`.
pub(crate) fn paint_logo(
    ctx: &mut vello_cpu::RenderContext,
    paint: vello_cpu::Image,
    logo: Size,
    placement: &LogoPlacement,
) {
    let clip = placement.clip_path();
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.push_clip_layer(&clip);

    let to_canvas = Affine::translate(placement.draw_rect.origin().to_vec2())
        * Affine::scale_non_uniform(
            placement.drawn.width / logo.width,
            placement.drawn.height / logo.height,
        );
    ctx.set_transform(affine_to_cpu(to_canvas));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, logo.width, logo.height));

    // Border is centered on the clip edge, so only its inner half survives the clip.
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(placement.border_width));
    ctx.set_paint(cpu_color(BORDER_COLOR));
    ctx.stroke_path(&clip);

    ctx.pop_layer();
}

#[cfg(test)]
#[path = "../../tests/unit/render/logo.rs"]
mod tests;
