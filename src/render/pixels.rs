//! Premultiplied RGBA8 pixel kernels shared by the layer passes.

use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::decode::RasterImage;
use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

/// Integer pixel rectangle, half-open `[x0, x1) × [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub(crate) x0: u32,
    pub(crate) y0: u32,
    pub(crate) x1: u32,
    pub(crate) y1: u32,
}

impl PixelRect {
    pub(crate) fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub(crate) fn height(self) -> u32 {
        self.y1 - self.y0
    }

    /// Grow by `pad` on every side and shift by `(dx, dy)` while keeping the original area, then
    /// clamp to `width × height`.
    pub(crate) fn spread(self, pad: u32, dx: i32, dy: i32, width: u32, height: u32) -> Self {
        let pad = pad as i64;
        let x0 = (self.x0 as i64 - pad + (dx as i64).min(0)).clamp(0, width as i64);
        let y0 = (self.y0 as i64 - pad + (dy as i64).min(0)).clamp(0, height as i64);
        let x1 = (self.x1 as i64 + pad + (dx as i64).max(0)).clamp(0, width as i64);
        let y1 = (self.y1 as i64 + pad + (dy as i64).max(0)).clamp(0, height as i64);
        Self {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1.max(x0) as u32,
            y1: y1.max(y0) as u32,
        }
    }
}

/// Bounding box of all pixels with non-zero alpha.
pub(crate) fn alpha_bounds(rgba: &[u8], width: u32, height: u32) -> Option<PixelRect> {
    let w = width as usize;
    let mut out: Option<PixelRect> = None;
    for (y, row) in rgba.chunks_exact(w * 4).enumerate().take(height as usize) {
        let mut first = None;
        let mut last = 0usize;
        for (x, px) in row.chunks_exact(4).enumerate() {
            if px[3] != 0 {
                first.get_or_insert(x);
                last = x;
            }
        }
        let Some(first) = first else { continue };
        let (y, first, last) = (y as u32, first as u32, last as u32 + 1);
        out = Some(match out {
            None => PixelRect {
                x0: first,
                y0: y,
                x1: last,
                y1: y + 1,
            },
            Some(r) => PixelRect {
                x0: r.x0.min(first),
                y0: r.y0,
                x1: r.x1.max(last),
                y1: y + 1,
            },
        });
    }
    out
}

pub(crate) fn clear_to(rgba: &mut [u8], premul: [u8; 4]) {
    if premul == [0, 0, 0, 0] {
        rgba.fill(0);
        return;
    }
    for px in rgba.chunks_exact_mut(4) {
        px.copy_from_slice(&premul);
    }
}

/// Source-over of `src` onto `dst` restricted to `rect`. Both buffers are `width` pixels wide.
pub(crate) fn premul_over_in_rect(dst: &mut [u8], src: &[u8], width: u32, rect: PixelRect) {
    let w = width as usize;
    for y in rect.y0 as usize..rect.y1 as usize {
        let start = (y * w + rect.x0 as usize) * 4;
        let end = (y * w + rect.x1 as usize) * 4;
        for (d, s) in dst[start..end]
            .chunks_exact_mut(4)
            .zip(src[start..end].chunks_exact(4))
        {
            let px = premul_over_px([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&px);
        }
    }
}

pub(crate) fn premul_over_px(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255u16 - sa;
    [
        add_sat_u8(src[0], mul_div255_u8(u16::from(dst[0]), inv)),
        add_sat_u8(src[1], mul_div255_u8(u16::from(dst[1]), inv)),
        add_sat_u8(src[2], mul_div255_u8(u16::from(dst[2]), inv)),
        add_sat_u8(src[3], mul_div255_u8(u16::from(dst[3]), inv)),
    ]
}

/// Apply a chain of 4×5 color matrices to premultiplied pixels, clamping after every step.
///
/// Matrices operate on straight (unpremultiplied) normalized channels.
pub(crate) fn color_matrices_rgba8_premul(src: &[u8], dst: &mut [u8], matrices: &[[f32; 20]]) {
    debug_assert_eq!(src.len(), dst.len());
    const ROW: usize = 4 * 1024;
    dst.par_chunks_mut(ROW)
        .zip(src.par_chunks(ROW))
        .for_each(|(d, s)| {
            for (s, d) in s.chunks_exact(4).zip(d.chunks_exact_mut(4)) {
                color_matrices_px(s, d, matrices);
            }
        });
}

fn color_matrices_px(s: &[u8], d: &mut [u8], matrices: &[[f32; 20]]) {
    let pa = s[3] as f32 / 255.0;
    if pa <= 0.0 {
        d.copy_from_slice(&[0, 0, 0, 0]);
        return;
    }
    let inv_a = 1.0 / pa;
    let mut c = [
        (s[0] as f32 / 255.0) * inv_a,
        (s[1] as f32 / 255.0) * inv_a,
        (s[2] as f32 / 255.0) * inv_a,
        pa,
    ];
    for m in matrices {
        let [r, g, b, a] = c;
        c = [
            (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0),
            (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0),
            (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0),
            (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0),
        ];
    }
    let out_a = c[3];
    d[0] = (c[0] * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    d[1] = (c[1] * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    d[2] = (c[2] * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Normalized Gaussian weights in Q16 fixed point for `radius` taps each side.
pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ComposeResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ComposeError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

/// Separable blur of a single-channel `width × height` plane; samples outside are zero.
pub(crate) fn blur_plane_q16(
    plane: &mut [u8],
    tmp: &mut [u8],
    width: usize,
    height: usize,
    k: &[u32],
) {
    if k.len() == 1 {
        return;
    }
    let radius = (k.len() / 2) as isize;
    for y in 0..height {
        let row = &plane[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x as isize + ki as isize - radius;
                if sx < 0 || sx >= width as isize {
                    continue;
                }
                acc += u64::from(kw) * u64::from(row[sx as usize]);
            }
            tmp[y * width + x] = q16_to_u8(acc);
        }
    }
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y as isize + ki as isize - radius;
                if sy < 0 || sy >= height as isize {
                    continue;
                }
                acc += u64::from(kw) * u64::from(tmp[sy as usize * width + x]);
            }
            plane[y * width + x] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

pub(crate) fn pixmap_from_raster(img: &RasterImage) -> ComposeResult<vello_cpu::Pixmap> {
    pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ComposeResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ComposeError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ComposeError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ComposeError::validation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect();
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pixels.rs"]
mod tests;
