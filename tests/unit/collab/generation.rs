use super::*;

#[test]
fn fenced_json_is_parsed() {
    let raw = "```json\n{\"caption\": \"Hello!\", \"imagePrompt\": \"a red kite\"}\n```\n";
    let s = parse_summary_response(raw);
    assert_eq!(s.caption, "Hello!");
    assert_eq!(s.image_prompt, "a red kite");
}

#[test]
fn plain_fences_and_snake_case_key_are_accepted() {
    let s = parse_summary_response("```\n{\"caption\": \"x\", \"image_prompt\": \"y\"}```");
    assert_eq!(s.image_prompt, "y");
}

#[test]
fn non_json_reply_becomes_caption() {
    let s = parse_summary_response("Just a caption, no JSON here.");
    assert_eq!(s.caption, "Just a caption, no JSON here.");
    assert_eq!(s.image_prompt, DEFAULT_IMAGE_PROMPT);
}

#[test]
fn missing_or_blank_prompt_falls_back() {
    let s = parse_summary_response("{\"caption\": \"c\"}");
    assert_eq!(s.image_prompt, DEFAULT_IMAGE_PROMPT);
    let s = parse_summary_response("{\"caption\": \"c\", \"imagePrompt\": \"  \"}");
    assert_eq!(s.image_prompt, DEFAULT_IMAGE_PROMPT);
    let s = parse_summary_response("{}");
    assert_eq!(s.caption, "");
}

#[test]
fn config_rejects_empty_key_and_redacts_debug() {
    assert!(matches!(
        GeneratorConfig::new("  "),
        Err(GenerationError::Config(_))
    ));
    let cfg = GeneratorConfig::new("secret-123").unwrap();
    let dbg = format!("{cfg:?}");
    assert!(!dbg.contains("secret-123"));
    assert!(dbg.contains(&cfg.text_model));
}

#[test]
fn prompts_carry_tone_and_style() {
    let p = caption_prompt("Our new cafe opens Monday", Tone::Fun);
    assert!(p.contains("Our new cafe opens Monday"));
    assert!(p.contains(Tone::Fun.describe()));
    let p = illustration_prompt("a cup of coffee", &ImageStyle::PopArt);
    assert!(p.starts_with("a cup of coffee, style: Vibrant Pop Art"));
    let p = restyle_prompt("", &ImageStyle::Custom("ink wash".into()));
    assert_eq!(p, "Redraw this image in ink wash style.");
}

#[test]
fn style_and_tone_serde_names() {
    assert_eq!(
        serde_json::to_string(&ImageStyle::SoftWatercolor).unwrap(),
        "\"soft_watercolor\""
    );
    assert_eq!(
        serde_json::from_str::<Tone>("\"educational\"").unwrap(),
        Tone::Educational
    );
    assert_eq!(Tone::ALL.len(), 4);
}

#[test]
fn canned_generator_through_the_trait() {
    let g = CannedGenerator {
        reply: "{\"caption\": \"Cap\", \"imagePrompt\": \"sun\"}".into(),
        image: None,
    };
    let dyn_g: &dyn ContentGenerator = &g;
    let s = dyn_g.summarize("text", Tone::Sales).unwrap();
    assert_eq!(s.caption, "Cap");
    assert!(matches!(
        dyn_g.summarize("   ", Tone::Sales),
        Err(GenerationError::Provider(_))
    ));
    assert!(matches!(
        dyn_g.illustrate("sun", &ImageStyle::CleanLine),
        Err(GenerationError::NoImage)
    ));
    assert_eq!(
        dyn_g.restyle(&[1, 2, 3], "p", &ImageStyle::PopArt).unwrap(),
        vec![1, 2, 3]
    );
}
