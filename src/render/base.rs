//! Base layer: cover fit with pan and zoom, plus the brightness/contrast/saturation filter chain.

use crate::assets::decode::RasterImage;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Size};
use crate::foundation::error::ComposeResult;
use crate::render::pixels::{color_matrices_rgba8_premul, image_paint, pixmap_from_premul_bytes};
use crate::scene::model::{BaseTransform, FilterSet};

/// Where the base image lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BasePlacement {
    /// Scale at which the image exactly covers the canvas.
    pub cover_scale: f64,
    /// Effective scale, `cover_scale * zoom`.
    pub scale: f64,
    /// Drawn size in canvas pixels.
    pub size: Size,
    /// Top-left corner of the drawn image.
    pub origin: Point,
}

impl BasePlacement {
    /// Cover-fit `image` into `canvas`, then apply zoom about the center and pan.
    pub fn compute(image: Size, canvas: Canvas, transform: &BaseTransform) -> Self {
        let c = canvas.size();
        let cover_scale = (c.width / image.width).max(c.height / image.height);
        let scale = cover_scale * transform.zoom;
        let size = Size::new(image.width * scale, image.height * scale);
        let origin = Point::new(
            (c.width - size.width) / 2.0 + transform.pan_x,
            (c.height - size.height) / 2.0 + transform.pan_y,
        );
        Self {
            cover_scale,
            scale,
            size,
            origin,
        }
    }

    /// Drawn rectangle in canvas pixels.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.origin, self.size)
    }

    /// Image-space to canvas-space transform.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.origin.to_vec2()) * Affine::scale(self.scale)
    }
}

impl FilterSet {
    /// CSS-equivalent 4×5 color matrices in application order (brightness, contrast, saturate).
    ///
    /// Steps at 100% are omitted, so the identity set yields no matrices.
    pub fn color_matrices(&self) -> Vec<[f32; 20]> {
        color_matrices_for(self)
    }
}

fn color_matrices_for(filters: &FilterSet) -> Vec<[f32; 20]> {
    let mut out = Vec::with_capacity(3);
    if filters.brightness != 100.0 {
        let b = (filters.brightness / 100.0) as f32;
        out.push([
            b, 0.0, 0.0, 0.0, 0.0, //
            0.0, b, 0.0, 0.0, 0.0, //
            0.0, 0.0, b, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ]);
    }
    if filters.contrast != 100.0 {
        let c = (filters.contrast / 100.0) as f32;
        let t = 0.5 - 0.5 * c;
        out.push([
            c, 0.0, 0.0, 0.0, t, //
            0.0, c, 0.0, 0.0, t, //
            0.0, 0.0, c, 0.0, t, //
            0.0, 0.0, 0.0, 1.0, 0.0,
        ]);
    }
    if filters.saturation != 100.0 {
        out.push(saturate_matrix((filters.saturation / 100.0) as f32));
    }
    out
}

fn saturate_matrix(s: f32) -> [f32; 20] {
    [
        0.213 + 0.787 * s,
        0.715 - 0.715 * s,
        0.072 - 0.072 * s,
        0.0,
        0.0,
        0.213 - 0.213 * s,
        0.715 + 0.285 * s,
        0.072 - 0.072 * s,
        0.0,
        0.0,
        0.213 - 0.213 * s,
        0.715 - 0.715 * s,
        0.072 + 0.928 * s,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
        0.0,
    ]
}

/// Filtered copy of `image`, premultiplied RGBA8. Identity filters return the pixels unchanged.
pub(crate) fn apply_filters(image: &RasterImage, filters: &FilterSet) -> Vec<u8> {
    let matrices = filters.color_matrices();
    if matrices.is_empty() {
        return image.rgba8_premul.as_ref().clone();
    }
    let mut out = vec![0u8; image.rgba8_premul.len()];
    color_matrices_rgba8_premul(&image.rgba8_premul, &mut out, &matrices);
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FilterKey {
    content_hash: u64,
    filters: [u64; 3],
}

impl FilterKey {
    fn new(image: &RasterImage, filters: &FilterSet) -> Self {
        Self {
            content_hash: image.content_hash,
            filters: [
                filters.brightness.to_bits(),
                filters.contrast.to_bits(),
                filters.saturation.to_bits(),
            ],
        }
    }
}

/// Single-entry cache of the filtered base paint.
///
/// Pan and zoom changes reuse the filtered pixels; only a new image or new filter values
/// re-run the color matrices.
#[derive(Default)]
pub(crate) struct FilteredBaseCache {
    entry: Option<(FilterKey, vello_cpu::Image)>,
}

impl FilteredBaseCache {
    pub(crate) fn paint_for(
        &mut self,
        image: &RasterImage,
        filters: &FilterSet,
    ) -> ComposeResult<vello_cpu::Image> {
        let key = FilterKey::new(image, filters);
        if let Some((k, paint)) = &self.entry
            && *k == key
        {
            return Ok(paint.clone());
        }
        tracing::debug!(
            width = image.width,
            height = image.height,
            brightness = filters.brightness,
            contrast = filters.contrast,
            saturation = filters.saturation,
            "filtering base image"
        );
        let bytes = apply_filters(image, filters);
        let paint = image_paint(pixmap_from_premul_bytes(&bytes, image.width, image.height)?);
        self.entry = Some((key, paint.clone()));
        Ok(paint)
    }

    pub(crate) fn is_cached(&self, image: &RasterImage, filters: &FilterSet) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|(k, _)| *k == FilterKey::new(image, filters))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/base.rs"]
mod tests;
