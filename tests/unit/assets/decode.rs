use std::io::Cursor;

use base64::Engine as _;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

#[test]
fn decodes_png_into_premultiplied_pixels() {
    let bytes = png_bytes(3, 2, [255, 0, 0, 128]);
    let img = decode_image(&bytes).unwrap();
    assert_eq!((img.width, img.height), (3, 2));
    assert_eq!(img.rgba8_premul.len(), 3 * 2 * 4);
    assert_eq!(&img.rgba8_premul[..4], &[128, 0, 0, 128]);
}

#[test]
fn identical_pixels_share_content_hash() {
    let a = decode_image(&png_bytes(4, 4, [1, 2, 3, 255])).unwrap();
    let b = decode_image(&png_bytes(4, 4, [1, 2, 3, 255])).unwrap();
    let c = decode_image(&png_bytes(4, 4, [9, 2, 3, 255])).unwrap();
    let d = decode_image(&png_bytes(2, 8, [1, 2, 3, 255])).unwrap();
    assert_eq!(a.content_hash, b.content_hash);
    assert_ne!(a.content_hash, c.content_hash);
    assert_ne!(a.content_hash, d.content_hash);
}

#[test]
fn garbage_and_empty_bytes_fail() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(decode_image(&[]).is_err());
}

#[test]
fn svg_logo_is_rasterized_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect x="0" y="0" width="20" height="10" fill="#00ff00"/>
    </svg>"##;
    let img = decode_image(svg).unwrap();
    assert_eq!((img.width, img.height), (20, 10));
    let center = ((5 * 20 + 10) * 4) as usize;
    assert_eq!(&img.rgba8_premul[center..center + 4], &[0, 255, 0, 255]);
}

#[test]
fn data_url_round_trips_to_raster() {
    let bytes = png_bytes(2, 2, [0, 0, 255, 255]);
    let url = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    );
    let img = load_source(&ImageSource::DataUrl(url)).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
}

#[test]
fn malformed_data_urls_are_validation_errors() {
    for url in [
        "image/png;base64,AAAA",
        "data:image/png;base64",
        "data:text/plain,hello",
        "data:image/png;base64,@@@",
    ] {
        let err = decode_data_url(url).unwrap_err();
        assert!(matches!(err, ComposeError::Validation(_)), "{url}");
    }
}

#[test]
fn missing_path_reports_io_error() {
    let err = load_source(&ImageSource::Path("/no/such/logo.png".into())).unwrap_err();
    assert!(matches!(err, ComposeError::Other(_)));
}

#[test]
fn raw_buffer_length_is_checked() {
    assert!(RasterImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(RasterImage::from_premul_rgba8(0, 2, vec![]).is_err());
    assert!(RasterImage::from_premul_rgba8(1, 1, vec![0; 4]).is_ok());
}
