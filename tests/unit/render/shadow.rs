use super::*;

fn square_layer(w: u32, h: u32, rect: PixelRect) -> Vec<u8> {
    let mut px = vec![0u8; (w * h * 4) as usize];
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            let i = ((y * w + x) * 4) as usize;
            px[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
        }
    }
    px
}

fn alpha_at(buf: &[u8], w: u32, x: u32, y: u32) -> u8 {
    buf[((y * w + x) * 4 + 3) as usize]
}

#[test]
fn presets_match_canvas_shadow_values() {
    assert_eq!(DropShadow::TEXT.sigma(), 2.0);
    assert_eq!(DropShadow::TEXT.radius(), 6);
    assert_eq!((DropShadow::TEXT.offset_x, DropShadow::TEXT.offset_y), (2, 2));
    assert_eq!(DropShadow::LOGO.sigma(), 4.0);
    assert_eq!((DropShadow::LOGO.offset_x, DropShadow::LOGO.offset_y), (0, 4));
    assert!(!DropShadow::NONE.is_visible());
}

#[test]
fn shadow_lands_offset_and_fades_out() {
    let (w, h) = (40u32, 40u32);
    let bounds = PixelRect {
        x0: 10,
        y0: 10,
        x1: 20,
        y1: 20,
    };
    let layer = square_layer(w, h, bounds);
    let mut canvas = vec![0u8; layer.len()];
    let mut scratch = ShadowScratch::default();
    let shadow = DropShadow {
        blur: 2.0,
        offset_x: 5,
        offset_y: 5,
        color: Rgba8::BLACK,
    };
    paint_shadow(&mut canvas, &layer, w, h, bounds, &shadow, &mut scratch).unwrap();

    // Deep inside the shifted square the shadow is fully opaque.
    assert_eq!(alpha_at(&canvas, w, 20, 20), 255);
    // Far from both squares nothing is painted.
    assert_eq!(alpha_at(&canvas, w, 2, 2), 0);
    assert_eq!(alpha_at(&canvas, w, 38, 38), 0);
    // Near the shifted edge alpha is partial.
    let edge = alpha_at(&canvas, w, 15, 20);
    assert!(edge > 0 && edge < 255, "edge alpha {edge}");
}

#[test]
fn shadow_alpha_scales_with_color_alpha() {
    let (w, h) = (30u32, 30u32);
    let bounds = PixelRect {
        x0: 5,
        y0: 5,
        x1: 25,
        y1: 25,
    };
    let layer = square_layer(w, h, bounds);
    let mut canvas = vec![0u8; layer.len()];
    let mut scratch = ShadowScratch::default();
    paint_shadow(
        &mut canvas,
        &layer,
        w,
        h,
        bounds,
        &DropShadow::TEXT,
        &mut scratch,
    )
    .unwrap();
    let a = alpha_at(&canvas, w, 15, 15);
    assert!((i32::from(a) - 128).abs() <= 1, "alpha {a}");
    assert_eq!(&canvas[((15 * w + 15) * 4) as usize..][..3], &[0, 0, 0]);
}

#[test]
fn invisible_shadow_is_a_no_op() {
    let (w, h) = (8u32, 8u32);
    let bounds = PixelRect {
        x0: 0,
        y0: 0,
        x1: 8,
        y1: 8,
    };
    let layer = square_layer(w, h, bounds);
    let mut canvas = vec![3u8; layer.len()];
    let mut scratch = ShadowScratch::default();
    paint_shadow(
        &mut canvas,
        &layer,
        w,
        h,
        bounds,
        &DropShadow::NONE,
        &mut scratch,
    )
    .unwrap();
    assert!(canvas.iter().all(|&b| b == 3));
}
