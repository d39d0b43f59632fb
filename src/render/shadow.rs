use crate::assets::color::Rgba8;
use crate::foundation::error::ComposeResult;
use crate::foundation::math::mul_div255_u8;
use crate::render::pixels::{PixelRect, blur_plane_q16, gaussian_kernel_q16, premul_over_px};

/// Blurred, offset copy of a layer's alpha painted beneath it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DropShadow {
    /// Blur extent in pixels, as a canvas `shadowBlur` value. Gaussian sigma is half of it.
    pub blur: f32,
    /// Horizontal offset in pixels.
    pub offset_x: i32,
    /// Vertical offset in pixels.
    pub offset_y: i32,
    /// Shadow color; its alpha scales the layer alpha.
    pub color: Rgba8,
}

impl DropShadow {
    /// Text shadow: blur 4, offset (2,2), 50% black.
    pub const TEXT: Self = Self {
        blur: 4.0,
        offset_x: 2,
        offset_y: 2,
        color: Rgba8::rgba(0, 0, 0, 128),
    };

    /// Logo shadow: blur 8, offset (0,4), 30% black.
    pub const LOGO: Self = Self {
        blur: 8.0,
        offset_x: 0,
        offset_y: 4,
        color: Rgba8::rgba(0, 0, 0, 77),
    };

    /// No shadow.
    pub const NONE: Self = Self {
        blur: 0.0,
        offset_x: 0,
        offset_y: 0,
        color: Rgba8::TRANSPARENT,
    };

    /// Gaussian standard deviation.
    pub fn sigma(&self) -> f32 {
        if self.blur.is_finite() {
            (self.blur / 2.0).max(0.0)
        } else {
            0.0
        }
    }

    /// Kernel half-width in pixels (three sigma, rounded up).
    pub fn radius(&self) -> u32 {
        (self.sigma() * 3.0).ceil() as u32
    }

    /// Return `true` when painting this shadow changes anything.
    pub fn is_visible(&self) -> bool {
        self.color.a != 0
    }
}

/// Reusable buffers for shadow rendering.
#[derive(Debug, Default)]
pub(crate) struct ShadowScratch {
    alpha: Vec<u8>,
    tmp: Vec<u8>,
    kernel: Option<(u32, u32, Vec<u32>)>,
}

fn cached_kernel(
    slot: &mut Option<(u32, u32, Vec<u32>)>,
    radius: u32,
    sigma: f32,
) -> ComposeResult<&[u32]> {
    let key = (radius, sigma.to_bits());
    let hit = matches!(slot, Some((r, s, _)) if (*r, *s) == key);
    if !hit {
        *slot = Some((key.0, key.1, gaussian_kernel_q16(radius, sigma)?));
    }
    Ok(slot.as_ref().map_or(&[][..], |(_, _, k)| k.as_slice()))
}

/// Paint the shadow of `layer` onto `canvas`, source-over.
///
/// `bounds` must contain every non-transparent pixel of `layer`. Both buffers are premultiplied
/// RGBA8 of `width × height`.
pub(crate) fn paint_shadow(
    canvas: &mut [u8],
    layer: &[u8],
    width: u32,
    height: u32,
    bounds: PixelRect,
    shadow: &DropShadow,
    scratch: &mut ShadowScratch,
) -> ComposeResult<()> {
    if !shadow.is_visible() {
        return Ok(());
    }
    let radius = shadow.radius();
    let (dx, dy) = (shadow.offset_x, shadow.offset_y);
    let region = bounds.spread(radius, dx, dy, width, height);
    let (rw, rh) = (region.width() as usize, region.height() as usize);
    if rw == 0 || rh == 0 {
        return Ok(());
    }

    let w = width as usize;
    let ShadowScratch { alpha, tmp, kernel } = scratch;
    alpha.clear();
    alpha.resize(rw * rh, 0);
    tmp.clear();
    tmp.resize(rw * rh, 0);
    for ry in 0..rh {
        let sy = (region.y0 as usize + ry) as i64 - i64::from(dy);
        if sy < i64::from(bounds.y0) || sy >= i64::from(bounds.y1) {
            continue;
        }
        for rx in 0..rw {
            let sx = (region.x0 as usize + rx) as i64 - i64::from(dx);
            if sx < i64::from(bounds.x0) || sx >= i64::from(bounds.x1) {
                continue;
            }
            alpha[ry * rw + rx] = layer[(sy as usize * w + sx as usize) * 4 + 3];
        }
    }

    let sigma = shadow.sigma();
    if radius > 0 && sigma > 0.0 {
        let k = cached_kernel(kernel, radius, sigma)?;
        blur_plane_q16(alpha, tmp, rw, rh, k);
    }

    let color = shadow.color.premultiplied();
    for ry in 0..rh {
        let row = (region.y0 as usize + ry) * w + region.x0 as usize;
        for rx in 0..rw {
            let a = u16::from(alpha[ry * rw + rx]);
            if a == 0 {
                continue;
            }
            let src = [
                mul_div255_u8(u16::from(color[0]), a),
                mul_div255_u8(u16::from(color[1]), a),
                mul_div255_u8(u16::from(color[2]), a),
                mul_div255_u8(u16::from(color[3]), a),
            ];
            let i = (row + rx) * 4;
            let dst = [canvas[i], canvas[i + 1], canvas[i + 2], canvas[i + 3]];
            canvas[i..i + 4].copy_from_slice(&premul_over_px(dst, src));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/shadow.rs"]
mod tests;
