use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgba8::opaque(255, 0, 0));

    let c: Rgba8 = serde_json::from_value(json!("#000000CC")).unwrap();
    assert_eq!(c, Rgba8::new(0, 0, 0, 204));

    assert_eq!(parse_hex("4ecdc4").unwrap(), Rgba8::opaque(0x4E, 0xCD, 0xC4));
}

#[test]
fn parses_object_and_array() {
    let c: Rgba8 = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(c, Rgba8::opaque(1, 2, 3));

    let c: Rgba8 = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c, Rgba8::new(1, 2, 3, 4));

    assert!(serde_json::from_value::<Rgba8>(json!([1, 2])).is_err());
}

#[test]
fn rejects_malformed_hex() {
    assert!(parse_hex("#12345").is_err());
    assert!(parse_hex("#zzzzzz").is_err());
    assert!(parse_hex("#ééé").is_err());
}

#[test]
fn const_literal_matches_parser() {
    assert_eq!(hex_rgb(0xFF006E), parse_hex("#FF006E").unwrap());
}
