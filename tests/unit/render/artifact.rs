use super::*;

fn sample() -> Artifact {
    Artifact::new(
        EncodedImage {
            mime_type: "image/png",
            width: 2,
            height: 1,
            bytes: vec![0x89, b'P', b'N', b'G'],
        },
        ArtifactMetrics::new(
            ClipDuration::from_secs(5).unwrap(),
            FrameRate::new(24).unwrap(),
        ),
        "cyberpunk",
        OverlayText {
            prompt: "Hero powering up".to_string(),
            style_line: "Style: Cyberpunk".to_string(),
            timing_line: "5s @ 24fps".to_string(),
        },
    )
}

#[test]
fn metrics_and_timing_label() {
    let m = sample().metrics();
    assert_eq!(m.total_frames, 120);
    assert_eq!(m.timing_label(), "5s @ 24fps");
}

#[test]
fn data_uri_is_base64_png() {
    let a = sample();
    assert_eq!(a.to_data_uri(), "data:image/png;base64,iVBORw==");
    assert_eq!(a.mime_type(), "image/png");
    assert_eq!(a.dimensions(), (2, 1));
}

#[test]
fn download_name_and_write() {
    let a = sample();
    assert_eq!(a.suggested_file_name(), "anime-video.png");

    let dir = std::env::temp_dir().join(format!("animegen_artifact_{}", std::process::id()));
    let path = dir.join("nested").join(a.suggested_file_name());
    a.write_to(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), a.bytes());
    let _ = std::fs::remove_dir_all(&dir);
}
