use super::*;
use serde_json::json;

#[test]
fn parses_hex_forms() {
    let c: Rgba8 = serde_json::from_value(json!("#ffffff")).unwrap();
    assert_eq!(c, Rgba8::WHITE);

    let c: Rgba8 = serde_json::from_value(json!("#0000ff80")).unwrap();
    assert_eq!(c, Rgba8::rgba(0, 0, 255, 128));

    let c: Rgba8 = serde_json::from_value(json!("#F00")).unwrap();
    assert_eq!(c, Rgba8::rgb(255, 0, 0));
}

#[test]
fn parses_arrays_and_rejects_garbage() {
    let c: Rgba8 = serde_json::from_value(json!([10, 20, 30])).unwrap();
    assert_eq!(c, Rgba8::rgb(10, 20, 30));
    let c: Rgba8 = serde_json::from_value(json!([10, 20, 30, 40])).unwrap();
    assert_eq!(c, Rgba8::rgba(10, 20, 30, 40));

    assert!(serde_json::from_value::<Rgba8>(json!("#12345")).is_err());
    assert!(serde_json::from_value::<Rgba8>(json!("#gggggg")).is_err());
    assert!(serde_json::from_value::<Rgba8>(json!([1, 2])).is_err());
}

#[test]
fn serializes_as_lowercase_hex() {
    assert_eq!(
        serde_json::to_value(Rgba8::rgb(0xAB, 0xCD, 0xEF)).unwrap(),
        json!("#abcdef")
    );
    assert_eq!(Rgba8::rgba(0, 0, 0, 128).to_hex(), "#00000080");
}

#[test]
fn premultiplied_scales_color_by_alpha() {
    assert_eq!(Rgba8::BLACK.with_opacity(0.5).premultiplied(), [0, 0, 0, 128]);
    assert_eq!(Rgba8::rgba(255, 255, 255, 128).premultiplied(), [128, 128, 128, 128]);
    assert_eq!(Rgba8::TRANSPARENT.premultiplied(), [0, 0, 0, 0]);
}
