use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::core::Size;
use crate::foundation::error::{ComposeError, ComposeResult};
use crate::foundation::math::{hash64, premultiply_rgba8_in_place};

/// Largest raster edge accepted for decoded inputs; matches the 16-bit surface limit.
pub const MAX_IMAGE_DIM: u32 = u16::MAX as u32;

/// Decoded raster in premultiplied RGBA8 form.
///
/// Cheap to clone; pixels are shared.
#[derive(Clone, Debug)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Hash of the decoded pixels and size; identifies the raster in caches.
    pub content_hash: u64,
}

impl RasterImage {
    /// Wrap premultiplied RGBA8 pixels, validating size and buffer length.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> ComposeResult<Self> {
        check_dims(width, height)?;
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8_premul.len() != expected {
            return Err(ComposeError::validation(format!(
                "raster byte len mismatch: got {}, expected {expected}",
                rgba8_premul.len()
            )));
        }
        let mut key = Vec::with_capacity(8);
        key.extend_from_slice(&width.to_le_bytes());
        key.extend_from_slice(&height.to_le_bytes());
        let content_hash = hash64(&rgba8_premul) ^ hash64(&key).rotate_left(17);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            content_hash,
        })
    }

    /// Wrap straight-alpha RGBA8 pixels (as produced by the `image` crate).
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> ComposeResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul_rgba8(width, height, rgba8)
    }

    /// Intrinsic size as floating-point geometry.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

/// Where encoded image bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded bytes already in memory.
    Bytes(Vec<u8>),
    /// `data:<mime>;base64,<payload>` URL, as produced by generation services and exports.
    DataUrl(String),
    /// File on local disk.
    Path(PathBuf),
}

impl ImageSource {
    /// Fetch the encoded bytes behind this source.
    pub fn read_bytes(&self) -> ComposeResult<Vec<u8>> {
        match self {
            ImageSource::Bytes(b) => Ok(b.clone()),
            ImageSource::DataUrl(url) => decode_data_url(url),
            ImageSource::Path(p) => std::fs::read(p)
                .with_context(|| format!("read image '{}'", p.display()))
                .map_err(ComposeError::from),
        }
    }
}

/// Read and decode an image source.
///
/// Errors are reported as they occur; callers decide whether they concern the base image or the
/// logo.
pub fn load_source(source: &ImageSource) -> ComposeResult<RasterImage> {
    let bytes = source.read_bytes()?;
    decode_image(&bytes)
}

/// Decode encoded image bytes (any format supported by `image`, or SVG) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ComposeResult<RasterImage> {
    if bytes.is_empty() {
        return Err(ComposeError::validation("image bytes are empty"));
    }
    if looks_like_svg(bytes) {
        return decode_svg(bytes);
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Split a `data:` URL and decode its base64 payload.
pub fn decode_data_url(url: &str) -> ComposeResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ComposeError::validation("data URL must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ComposeError::validation("data URL is missing ','"))?;
    if !meta.ends_with(";base64") {
        return Err(ComposeError::validation(
            "only base64-encoded data URLs are supported",
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ComposeError::validation(format!("invalid base64 in data URL: {e}")))
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn decode_svg(bytes: &[u8]) -> ComposeResult<RasterImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    check_dims(width, height)?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ComposeError::validation("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    // tiny-skia pixmaps are already premultiplied.
    RasterImage::from_premul_rgba8(width, height, pixmap.take())
}

fn check_dims(width: u32, height: u32) -> ComposeResult<()> {
    if width == 0 || height == 0 {
        return Err(ComposeError::validation("image has zero width or height"));
    }
    if width > MAX_IMAGE_DIM || height > MAX_IMAGE_DIM {
        return Err(ComposeError::validation(format!(
            "image too large: {width}x{height} (max {MAX_IMAGE_DIM}x{MAX_IMAGE_DIM})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
