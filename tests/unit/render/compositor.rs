use crate::scene::model::{BaseTransform, CanvasPreset, FilterSet};

use super::*;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RasterImage {
    let px = rgba.repeat((width * height) as usize);
    RasterImage::from_straight_rgba8(width, height, px).unwrap()
}

fn no_fonts() -> Compositor {
    Compositor::new(CompositorOpts {
        system_fonts: false,
        ..CompositorOpts::default()
    })
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (i32::from(*x) - i32::from(*y)).abs() <= 2)
}

#[test]
fn base_only_render_covers_the_canvas() {
    let base = solid(200, 100, [255, 0, 0, 255]);
    let params = CompositionParams::default();
    let mut c = no_fonts();
    let frame = c
        .render(&Scene {
            base: &base,
            logo: None,
            params: &params,
        })
        .unwrap();
    assert_eq!((frame.width, frame.height), (1080, 1080));
    assert_eq!(frame.data.len(), 1080 * 1080 * 4);
    for (x, y) in [(0, 0), (1079, 0), (540, 540), (0, 1079), (1079, 1079)] {
        assert!(close(frame.pixel(x, y).unwrap(), [255, 0, 0, 255]), "({x},{y})");
    }
    assert_eq!(frame.pixel(1080, 0), None);

    let report = c.last_report();
    assert_eq!(report.drawn, vec![LayerKind::Base]);
    assert!(
        report
            .skipped
            .contains(&(LayerKind::Headline, SkipReason::Disabled))
    );
    assert!(report.skipped.contains(&(LayerKind::Logo, SkipReason::NoLogo)));
}

#[test]
fn shrunk_base_exposes_the_clear_color() {
    let base = solid(100, 100, [0, 255, 0, 255]);
    let params = CompositionParams {
        transform: BaseTransform {
            zoom: 0.5,
            ..BaseTransform::IDENTITY
        },
        ..CompositionParams::default()
    };
    let scene = Scene {
        base: &base,
        logo: None,
        params: &params,
    };

    let mut transparent = no_fonts();
    let f = transparent.render(&scene).unwrap();
    assert_eq!(f.pixel(5, 5), Some([0, 0, 0, 0]));
    assert!(close(f.pixel(540, 540).unwrap(), [0, 255, 0, 255]));

    let mut white = Compositor::new(CompositorOpts {
        system_fonts: false,
        clear_rgba: Some(Rgba8::WHITE),
        ..CompositorOpts::default()
    });
    let f = white.render(&scene).unwrap();
    assert!(close(f.pixel(5, 5).unwrap(), [255, 255, 255, 255]));
}

#[test]
fn filters_touch_only_the_base() {
    let base = solid(10, 10, [200, 200, 200, 255]);
    let params = CompositionParams {
        filters: FilterSet {
            brightness: 50.0,
            ..FilterSet::IDENTITY
        },
        ..CompositionParams::default()
    };
    let mut c = no_fonts();
    let f = c
        .render(&Scene {
            base: &base,
            logo: None,
            params: &params,
        })
        .unwrap();
    assert!(close(f.pixel(300, 300).unwrap(), [100, 100, 100, 255]));
}

#[test]
fn logo_is_clipped_bordered_and_shadowed() {
    let base = solid(50, 50, [255, 0, 0, 255]);
    let logo = solid(64, 64, [0, 0, 255, 255]);
    let params = CompositionParams::default();
    let mut c = no_fonts();
    let f = c
        .render(&Scene {
            base: &base,
            logo: Some(&logo),
            params: &params,
        })
        .unwrap()
        .clone();

    // Center of the 216px circle at (918, 162).
    assert!(close(f.pixel(918, 162).unwrap(), [0, 0, 255, 255]));
    // Square corner of the clip bounds lies outside the circle: base shows through.
    let corner = f.pixel(812, 56).unwrap();
    assert!(corner[0] > 200 && corner[2] < 40, "corner {corner:?}");
    // Just inside the circle edge the white border covers the logo.
    let rim = f.pixel(918, 162 - 107).unwrap();
    assert!(rim[0] > 200 && rim[1] > 200 && rim[2] > 200, "rim {rim:?}");
    // Below the circle the shadow darkens the base.
    let under = f.pixel(918, 162 + 110).unwrap();
    assert!(under[0] < 250 && under[0] > 100, "under {under:?}");
    // Far away the base is untouched.
    assert!(close(f.pixel(100, 1000).unwrap(), [255, 0, 0, 255]));
    assert!(c.last_report().was_drawn(LayerKind::Logo));
}

#[test]
fn tiny_logo_still_reaches_the_canvas() {
    let base = solid(50, 50, [255, 0, 0, 255]);
    let logo = solid(64, 64, [0, 0, 255, 255]);
    let mut params = CompositionParams::default();
    params.logo.size_percent = 1.0;
    params.logo.inner_scale = 0.1;
    let mut c = Compositor::new(CompositorOpts {
        system_fonts: false,
        logo_shadow: DropShadow::NONE,
        ..CompositorOpts::default()
    });
    c.render(&Scene {
        base: &base,
        logo: Some(&logo),
        params: &params,
    })
    .unwrap();
    assert!(c.last_report().was_drawn(LayerKind::Logo));
}

#[test]
fn surfaces_persist_until_the_preset_changes() {
    let base = solid(40, 30, [9, 9, 9, 255]);
    let mut params = CompositionParams::default();
    let mut c = no_fonts();
    for pan in 0..5 {
        params.transform.pan_x = f64::from(pan);
        c.render(&Scene {
            base: &base,
            logo: None,
            params: &params,
        })
        .unwrap();
    }
    assert_eq!(c.surface_stats().allocations, 1);
    assert_eq!(c.surface_stats().reuses, 4);

    params.preset = CanvasPreset::Landscape;
    let f = c
        .render(&Scene {
            base: &base,
            logo: None,
            params: &params,
        })
        .unwrap();
    assert_eq!((f.width, f.height), (1280, 720));
    assert_eq!(c.surface_stats().allocations, 2);
}

#[test]
fn fingerprint_tracks_inputs() {
    let base = solid(8, 8, [1, 2, 3, 255]);
    let other = solid(8, 8, [3, 2, 1, 255]);
    let params = CompositionParams::default();
    let mut c = no_fonts();
    let scene = |b| Scene {
        base: b,
        logo: None,
        params: &params,
    };
    let a = c.render(&scene(&base)).unwrap().fingerprint;
    let a2 = c.render(&scene(&base)).unwrap().fingerprint;
    let b = c.render(&scene(&other)).unwrap().fingerprint;
    assert_eq!(a, a2);
    assert_ne!(a, b);
}

#[test]
fn export_before_render_is_an_export_error() {
    let c = no_fonts();
    assert!(matches!(c.export_png(), Err(ComposeError::Export(_))));
}
