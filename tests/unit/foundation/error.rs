use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ComposeError::base_image("x")
            .to_string()
            .contains("base image error:")
    );
    assert!(ComposeError::logo("x").to_string().contains("logo error:"));
    assert!(
        ComposeError::export("x")
            .to_string()
            .contains("export error:")
    );
    assert!(
        ComposeError::not_ready("x")
            .to_string()
            .contains("cannot render:")
    );
    assert!(
        ComposeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ComposeError::font("x").to_string().contains("font error:"));
}

#[test]
fn recovery_paths_stay_distinct() {
    let base = ComposeError::base_image("truncated jpeg");
    let export = ComposeError::export("png encoder failed");
    let logo = ComposeError::logo("not an image");
    assert!(matches!(base, ComposeError::BaseImage(_)));
    assert!(matches!(export, ComposeError::Export(_)));
    assert!(matches!(logo, ComposeError::Logo(_)));
}

#[test]
fn other_preserves_source() {
    let io = std::io::Error::other("boom");
    let err = ComposeError::Other(anyhow::Error::new(io));
    assert_eq!(err.to_string(), "boom");
}
