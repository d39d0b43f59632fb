use crate::foundation::error::{ComposeError, ComposeResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions that fit a raster surface.
    pub fn new(width: u32, height: u32) -> ComposeResult<Self> {
        let canvas = Self { width, height };
        canvas.surface_dims()?;
        Ok(canvas)
    }

    /// Canvas size as floating-point geometry.
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Full-canvas rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        self.size().to_rect()
    }

    /// Map canvas-relative percentages (0..=100 on each axis) to a pixel position.
    pub fn point_at_percent(self, x_percent: f64, y_percent: f64) -> Point {
        Point::new(
            f64::from(self.width) * x_percent / 100.0,
            f64::from(self.height) * y_percent / 100.0,
        )
    }

    /// Map a canvas-width-relative percentage to a pixel length.
    pub fn width_percent(self, percent: f64) -> f64 {
        f64::from(self.width) * percent / 100.0
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Dimensions as the 16-bit sizes raster surfaces are allocated with.
    pub(crate) fn surface_dims(self) -> ComposeResult<(u16, u16)> {
        if self.width == 0 || self.height == 0 {
            return Err(ComposeError::validation("canvas dimensions must be non-zero"));
        }
        let w: u16 = self
            .width
            .try_into()
            .map_err(|_| ComposeError::validation("canvas width exceeds u16"))?;
        let h: u16 = self
            .height
            .try_into()
            .map_err(|_| ComposeError::validation("canvas height exceeds u16"))?;
        Ok((w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
