use super::*;

#[test]
fn new_validates_duration_and_fps_but_not_prompt() {
    let r = GenerationRequest::new("", "cyberpunk", 5, 24).unwrap();
    assert!(r.is_blank());
    assert_eq!(r.style_id(), "cyberpunk");

    assert!(GenerationRequest::new("x", "shonen", 2, 24).is_err());
    assert!(GenerationRequest::new("x", "shonen", 31, 24).is_err());
    assert!(GenerationRequest::new("x", "shonen", 5, 25).is_err());
}

#[test]
fn whitespace_prompt_is_blank() {
    assert!(GenerationRequest::with_defaults(" \t\n").is_blank());
    assert!(!GenerationRequest::with_defaults(" a ").is_blank());
    assert_eq!(GenerationRequest::with_defaults(" a ").prompt(), " a ");
}

#[test]
fn defaults_match_the_form() {
    let r = GenerationRequest::with_defaults("Hero");
    assert_eq!(r.style_id(), "shonen");
    assert_eq!(r.duration().secs(), 5);
    assert_eq!(r.fps().get(), 24);
}

#[test]
fn metrics_multiply_duration_by_fps() {
    let m = GenerationRequest::new("x", "seinen", 5, 24).unwrap().metrics();
    assert_eq!(m.total_frames, 120);

    let m = GenerationRequest::new("x", "seinen", 30, 60).unwrap().metrics();
    assert_eq!((m.duration_secs, m.fps, m.total_frames), (30, 60, 1800));
}

#[test]
fn deserialize_rejects_out_of_range_values() {
    let ok: GenerationRequest = serde_json::from_str(
        r#"{"prompt":"p","style_id":"chibi","duration":3,"fps":12}"#,
    )
    .unwrap();
    assert_eq!(ok.metrics().total_frames, 36);

    assert!(
        serde_json::from_str::<GenerationRequest>(
            r#"{"prompt":"p","style_id":"chibi","duration":3,"fps":13}"#
        )
        .is_err()
    );
}
