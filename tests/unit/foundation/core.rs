use super::*;

#[test]
fn canvas_rejects_zero_and_oversized_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert!(Canvas::new(1080, 1350).is_ok());
}

#[test]
fn percent_mapping_is_axis_relative() {
    let c = Canvas {
        width: 1080,
        height: 1080,
    };
    let p = c.point_at_percent(85.0, 15.0);
    assert!((p.x - 918.0).abs() < 1e-9);
    assert!((p.y - 162.0).abs() < 1e-9);
    assert!((c.width_percent(20.0) - 216.0).abs() < 1e-9);
}

#[test]
fn rgba8_len_matches_pixel_count() {
    let c = Canvas {
        width: 1280,
        height: 720,
    };
    assert_eq!(c.rgba8_len(), 1280 * 720 * 4);
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 1280.0, 720.0));
}
