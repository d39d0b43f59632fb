use super::*;

fn frame(width: u32, height: u32, px: [u8; 4]) -> Frame {
    Frame {
        width,
        height,
        data: px.repeat((width * height) as usize),
        fingerprint: 7,
    }
}

#[test]
fn export_is_decodable_and_unpremultiplied() {
    let f = frame(3, 2, [64, 0, 0, 128]);
    let out = export_png(&f).unwrap();
    assert_eq!((out.width, out.height), (3, 2));
    assert_eq!(&out.png[..8], b"\x89PNG\r\n\x1a\n");

    let back = image::load_from_memory(&out.png).unwrap().to_rgba8();
    assert_eq!(back.dimensions(), (3, 2));
    let px = back.get_pixel(1, 1).0;
    assert_eq!(px[3], 128);
    assert!((i32::from(px[0]) - 128).abs() <= 1);
}

#[test]
fn repeated_exports_are_identical() {
    let f = frame(4, 4, [10, 20, 30, 255]);
    assert_eq!(export_png(&f).unwrap(), export_png(&f).unwrap());
}

#[test]
fn mismatched_buffer_is_an_export_error() {
    let mut f = frame(2, 2, [0, 0, 0, 255]);
    f.data.pop();
    assert!(matches!(export_png(&f), Err(ComposeError::Export(_))));
    let empty = Frame {
        width: 0,
        height: 0,
        data: Vec::new(),
        fingerprint: 0,
    };
    assert!(matches!(export_png(&empty), Err(ComposeError::Export(_))));
}

#[test]
fn data_url_round_trips_through_the_decoder() {
    let out = export_png(&frame(1, 1, [255, 255, 255, 255])).unwrap();
    let url = out.to_data_url();
    assert!(url.starts_with("data:image/png;base64,"));
    let bytes = crate::assets::decode::decode_data_url(&url).unwrap();
    assert_eq!(bytes, out.png);
}

#[test]
fn write_to_bad_path_is_an_export_error() {
    let out = export_png(&frame(1, 1, [0, 0, 0, 255])).unwrap();
    let err = out
        .write_to(Path::new("/nonexistent-dir/for/sure/out.png"))
        .unwrap_err();
    assert!(matches!(err, ComposeError::Export(_)));
}
