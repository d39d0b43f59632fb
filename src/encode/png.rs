use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;

use crate::foundation::error::{ComposeError, ComposeResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::compositor::Frame;

/// Encoded PNG of one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// PNG file bytes.
    pub png: Vec<u8>,
}

impl ExportedImage {
    /// MIME type of [`ExportedImage::png`].
    pub const MIME: &'static str = "image/png";

    /// Self-contained `data:image/png;base64,…` payload.
    pub fn to_data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(&self.png);
        format!("data:{};base64,{b64}", Self::MIME)
    }

    /// Write the PNG bytes to `path`.
    pub fn write_to(&self, path: &Path) -> ComposeResult<()> {
        std::fs::write(path, &self.png)
            .map_err(|e| ComposeError::export(format!("write '{}': {e}", path.display())))
    }
}

/// Encode `frame` as an 8-bit straight-alpha RGBA PNG.
///
/// Encoding is deterministic, so exporting the same frame twice yields identical bytes.
pub fn export_png(frame: &Frame) -> ComposeResult<ExportedImage> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(ComposeError::export(format!(
            "frame buffer does not match {}x{}",
            frame.width, frame.height
        )));
    }

    let mut rgba = frame.data.clone();
    unpremultiply_rgba8_in_place(&mut rgba);
    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| ComposeError::export("frame buffer size mismatch"))?;

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ComposeError::export(format!("png encode: {e}")))?;
    tracing::debug!(
        width = frame.width,
        height = frame.height,
        bytes = png.len(),
        "exported png"
    );
    Ok(ExportedImage {
        width: frame.width,
        height: frame.height,
        png,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
