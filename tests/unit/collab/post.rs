use super::*;

fn exported() -> ExportedImage {
    ExportedImage {
        width: 1,
        height: 1,
        png: vec![0x89, b'P', b'N', b'G'],
    }
}

#[test]
fn draft_embeds_the_export_as_data_url() {
    let rec = PostRecord::draft("p1", "source text", "caption", None, &exported(), 1_700_000_000_000);
    assert_eq!(rec.status, PostStatus::Draft);
    assert_eq!(rec.final_image.as_deref(), Some("data:image/png;base64,iVBORw=="));
    assert!(rec.scheduled_date.is_empty());
}

#[test]
fn status_transitions() {
    let mut rec = PostRecord::draft("p2", "", "", None, &exported(), 0);
    rec.schedule("2026-11-01");
    assert_eq!(rec.status, PostStatus::Scheduled);
    assert_eq!(rec.scheduled_date, "2026-11-01");
    rec.mark_published();
    assert_eq!(rec.status, PostStatus::Published);
}

#[test]
fn json_uses_camel_case_keys() {
    let rec = PostRecord::draft("p3", "a", "b", Some("data:image/jpeg;base64,AA==".into()), &exported(), 7);
    let v = serde_json::to_value(&rec).unwrap();
    assert_eq!(v["originalContent"], "a");
    assert_eq!(v["generatedCaption"], "b");
    assert_eq!(v["status"], "draft");
    let back: PostRecord = serde_json::from_value(v).unwrap();
    assert_eq!(back, rec);
}

#[test]
fn minimal_record_deserializes_with_defaults() {
    let rec: PostRecord = serde_json::from_str(
        r#"{"id":"x","originalContent":"o","generatedCaption":"g","timestamp":5}"#,
    )
    .unwrap();
    assert_eq!(rec.status, PostStatus::Draft);
    assert_eq!(rec.final_image, None);
}
