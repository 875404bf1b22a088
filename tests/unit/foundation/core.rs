use super::*;

#[test]
fn canvas_size_rejects_zero_and_oversized() {
    assert!(CanvasSize::new(0, 10).is_err());
    assert!(CanvasSize::new(10, 0).is_err());
    assert!(CanvasSize::new(70_000, 10).is_err());
    let size = CanvasSize::new(900, 1100).unwrap();
    assert_eq!(size.rect(), Rect::new(0.0, 0.0, 900.0, 1100.0));
}

#[test]
fn hex_colours_parse_with_and_without_alpha() {
    assert_eq!(
        Rgba8::parse_hex("#8c2f2f").unwrap(),
        Rgba8::rgb(0x8c, 0x2f, 0x2f)
    );
    assert_eq!(
        Rgba8::parse_hex("#00000033").unwrap(),
        Rgba8::rgba(0, 0, 0, 0x33)
    );
    assert!(Rgba8::parse_hex("8c2f2f").is_err());
    assert!(Rgba8::parse_hex("#8c2f2").is_err());
    assert!(Rgba8::parse_hex("#zz2f2f").is_err());
}

#[test]
fn colours_serialize_as_hex_strings() {
    let c = Rgba8::rgb(0xf5, 0xf1, 0xeb);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"#f5f1eb\"");
    let back: Rgba8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
    assert!(serde_json::from_str::<Rgba8>("\"red\"").is_err());
}

#[test]
fn fractional_alpha_matches_css_rgba() {
    assert_eq!(Rgba8::rgb(0, 0, 0).with_alpha_f(0.2).a, 51);
    assert_eq!(Rgba8::rgb(0, 0, 0).with_alpha_f(2.0).a, 255);
}

#[test]
fn premultiplied_scales_colour_by_alpha() {
    assert_eq!(Rgba8::rgb(10, 20, 30).premultiplied(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::rgba(255, 0, 0, 0).premultiplied(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::rgba(200, 100, 50, 128).premultiplied(), [100, 50, 25, 128]);
}
