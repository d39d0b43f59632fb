use super::*;

#[test]
fn presets_map_to_fixed_raster_sizes() {
    let sizes: Vec<(u32, u32)> = CanvasPreset::ALL
        .iter()
        .map(|p| (p.canvas().width, p.canvas().height))
        .collect();
    assert_eq!(
        sizes,
        vec![(1080, 1080), (1080, 1350), (1080, 1500), (1280, 720)]
    );
    assert_eq!(CanvasPreset::PortraitLong.name(), "portrait_long");
}

#[test]
fn whitespace_only_text_is_not_visible() {
    let mut t = TextLayer::headline_default();
    t.enabled = true;
    t.content = "  \n\t ".to_owned();
    assert!(!t.is_visible());

    t.content = "Hi".to_owned();
    assert!(t.is_visible());

    t.enabled = false;
    assert!(!t.is_visible());
}

#[test]
fn lines_split_on_newline_and_strip_carriage_returns() {
    let mut t = TextLayer::subtitle_default();
    t.content = "one\r\ntwo\nthree".to_owned();
    assert_eq!(t.lines().collect::<Vec<_>>(), vec!["one", "two", "three"]);
}

#[test]
fn custom_font_with_empty_name_falls_back_to_generic() {
    assert_eq!(FontChoice::Custom("   ".to_owned()).family(), None);
    assert_eq!(
        FontChoice::Custom(" Kanit ".to_owned()).family(),
        Some("Kanit")
    );
    assert_eq!(
        FontChoice::Preset(FontPreset::Sarabun).family(),
        Some("Sarabun")
    );
}

#[test]
fn sanitized_clamps_every_bounded_field() {
    let mut p = CompositionParams::default();
    p.transform = BaseTransform {
        pan_x: 12_345.0,
        pan_y: f64::NAN,
        zoom: 0.01,
    };
    p.filters = FilterSet {
        brightness: 500.0,
        contrast: -3.0,
        saturation: f64::INFINITY,
    };
    p.headline.anchor_x = 140.0;
    p.headline.size_percent = f64::NAN;
    p.subtitle.size_percent = 400.0;
    p.logo.size_percent = 0.0;
    p.logo.inner_scale = 99.0;
    p.logo.anchor_y = -1.0;

    let s = p.sanitized();
    assert_eq!(s.transform.pan_x, 12_345.0);
    assert_eq!(s.transform.pan_y, 0.0);
    assert_eq!(s.transform.zoom, BaseTransform::ZOOM_MIN);
    assert_eq!(s.filters.brightness, 200.0);
    assert_eq!(s.filters.contrast, 0.0);
    assert_eq!(s.filters.saturation, 100.0);
    assert_eq!(s.headline.anchor_x, 100.0);
    assert_eq!(s.headline.size_percent, 8.0);
    assert_eq!(s.subtitle.size_percent, TextLayer::SIZE_MAX);
    assert_eq!(s.logo.size_percent, LogoSpec::SIZE_MIN);
    assert_eq!(s.logo.inner_scale, LogoSpec::INNER_SCALE_MAX);
    assert_eq!(s.logo.anchor_y, 0.0);
}

#[test]
fn sanitized_is_a_no_op_for_in_range_values() {
    let p = CompositionParams::default();
    assert_eq!(p.sanitized(), p);
}

#[test]
fn fingerprint_tracks_every_change() {
    let a = CompositionParams::default();
    let mut b = a.clone();
    assert_eq!(a.fingerprint(), b.fingerprint());

    b.transform.pan_x = 1.0;
    assert_ne!(a.fingerprint(), b.fingerprint());

    let mut c = a.clone();
    c.layer_order = LayerOrder::TextOverLogo;
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn defaults_match_editor_controls() {
    let p = CompositionParams::default();
    assert!(p.transform.is_identity());
    assert!(p.filters.is_identity());
    assert_eq!(p.logo.shape, LogoShape::Circle);
    assert_eq!(p.logo.fit, LogoFit::Contain);
    assert_eq!((p.logo.anchor_x, p.logo.anchor_y), (85.0, 15.0));
    assert_eq!(p.layer_order, LayerOrder::LogoOverText);
    assert!(p.headline.stroke_enabled);
    assert!(!p.subtitle.stroke_enabled);
}
