use crate::scene::model::{CanvasPreset, FontChoice, FontPreset, LayerOrder, LogoFit};

use super::*;

#[test]
fn empty_document_yields_defaults() {
    let p = CompositionParams::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(p, CompositionParams::default());
}

#[test]
fn partial_document_fills_and_clamps() {
    let json = r##"{
        "preset": "portrait_long",
        "transform": { "zoom": 9.0, "pan_x": -5000 },
        "headline": { "enabled": true, "content": "Hello\nWorld", "fill": "#ff0000" },
        "subtitle": { "font": { "custom": "Noto Sans Thai" } },
        "logo": { "fit": "cover", "inner_scale": 0.0 },
        "layer_order": "text_over_logo"
    }"##;
    let p = CompositionParams::from_reader(json.as_bytes()).unwrap();
    assert_eq!(p.preset, CanvasPreset::PortraitLong);
    assert_eq!(p.transform.zoom, 3.0);
    assert_eq!(p.transform.pan_x, -5000.0);
    assert!(p.headline.is_visible());
    assert_eq!(p.headline.font, FontChoice::Preset(FontPreset::Mitr));
    assert_eq!(
        p.subtitle.font,
        FontChoice::Custom("Noto Sans Thai".to_owned())
    );
    assert_eq!(p.logo.fit, LogoFit::Cover);
    assert_eq!(p.logo.inner_scale, 0.1);
    assert_eq!(p.layer_order, LayerOrder::TextOverLogo);
}

#[test]
fn malformed_document_is_a_validation_error() {
    let err = CompositionParams::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, ComposeError::Validation(_)));

    let err = CompositionParams::from_reader(r#"{"preset": "wide"}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, ComposeError::Validation(_)));
}

#[test]
fn pretty_json_parses_back_to_same_params() {
    let mut p = CompositionParams::default();
    p.headline.enabled = true;
    p.headline.content = "Sale".to_owned();
    let s = p.to_json_pretty().unwrap();
    let back = CompositionParams::from_reader(s.as_bytes()).unwrap();
    assert_eq!(back, p);
}

#[test]
fn missing_file_reports_path() {
    let err = CompositionParams::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"));
}
