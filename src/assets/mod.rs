/// Straight-alpha colors and hex parsing.
pub mod color;
/// Image decoding into premultiplied rasters.
pub mod decode;
pub mod fonts;
