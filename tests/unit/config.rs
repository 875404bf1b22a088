use rand::{SeedableRng, rngs::StdRng};

use super::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "mars_archive_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn default_style_matches_reference_postcard() {
    let style = Style::default();
    assert_eq!((style.width, style.height), (900, 1100));
    assert_eq!(style.photo_height, 720.0);
    assert_eq!(style.photo_rect(), Rect::new(40.0, 40.0, 860.0, 760.0));
    assert_eq!(style.caption_start_y(), 800.0);
    assert_eq!(style.colors.border.to_hex(), "#8c2f2f");
    assert_eq!(style.photo.shadow.color.a, 51);
    assert_eq!(style.decor.flowers.count_min, 4);
    assert_eq!(style.decor.flowers.count_max, 7);
    assert_eq!(style.stamp.lines.len(), 2);
    assert_eq!(style.grain.amount, 15.0);
    style.validate().unwrap();
}

#[test]
fn partial_json_overrides_only_given_keys() {
    let cfg = ArchiveConfig::from_json_str(
        r##"{"style": {"width": 300, "colors": {"bg": "#000000"}, "grain": {"amount": 0}}}"##,
    )
    .unwrap();
    assert_eq!(cfg.style.width, 300);
    assert_eq!(cfg.style.height, 1100);
    assert_eq!(cfg.style.colors.bg, Rgba8::rgb(0, 0, 0));
    assert_eq!(cfg.style.colors.border, Palette::default().border);
    assert_eq!(cfg.style.grain.amount, 0.0);
    assert_eq!(cfg.assets, AssetCatalog::default());
}

#[test]
fn invalid_configs_are_rejected() {
    assert!(ArchiveConfig::from_json_str("{").is_err());
    assert!(ArchiveConfig::from_json_str(r#"{"style": {"width": 0}}"#).is_err());
    assert!(ArchiveConfig::from_json_str(r#"{"style": {"photo_height": -1}}"#).is_err());
    assert!(
        ArchiveConfig::from_json_str(
            r#"{"style": {"decor": {"flowers": {"count_min": 8, "count_max": 2}}}}"#
        )
        .is_err()
    );
    assert!(ArchiveConfig::from_json_str(r#"{"style": {"colors": {"bg": "beige"}}}"#).is_err());
}

#[test]
fn config_round_trips_through_a_file() {
    let path = temp_path("config.json");
    let cfg = ArchiveConfig::default();
    std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
    let back = ArchiveConfig::from_path(&path).unwrap();
    assert_eq!(back, cfg);
    std::fs::remove_file(&path).ok();
}

#[test]
fn caption_json_accepts_both_layouts() {
    let plain = CaptionSet::from_json_str(r#"[["a", "b"], ["c"]]"#).unwrap();
    assert_eq!(plain.groups().len(), 2);
    let wrapped = CaptionSet::from_json_str(r#"{"lyrics": [["x", "y"]]}"#).unwrap();
    assert_eq!(wrapped.groups(), &[vec!["x".to_string(), "y".to_string()]]);
    assert!(CaptionSet::from_json_str("[]").is_err());
}

#[test]
fn caption_load_falls_back_on_missing_or_bad_files() {
    let missing = CaptionSet::load_or_default(&temp_path("missing.json"));
    assert_eq!(missing, CaptionSet::fallback());
    assert_eq!(missing.groups().len(), 8);

    let bad = temp_path("bad_captions.json");
    std::fs::write(&bad, "{\"lyrics\": 3}").unwrap();
    assert_eq!(CaptionSet::load_or_default(&bad), CaptionSet::fallback());
    std::fs::remove_file(&bad).ok();

    let good = temp_path("good_captions.json");
    std::fs::write(&good, r#"[["hello", "mars"]]"#).unwrap();
    let set = CaptionSet::load_or_default(&good);
    assert_eq!(set.groups()[0][1], "mars");
    std::fs::remove_file(&good).ok();
}

#[test]
fn pick_returns_one_of_the_groups() {
    let set = CaptionSet::fallback();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..20 {
        let g = set.pick(&mut rng).unwrap();
        assert!(set.groups().iter().any(|x| x.as_slice() == g));
    }
}

#[test]
fn bold_mono_font_can_be_turned_off() {
    let fonts = FontsConfig::default();
    assert_eq!(
        fonts.mono_bold.as_deref(),
        Some(Path::new("fonts/SpaceMono-Bold.ttf"))
    );

    let cfg = ArchiveConfig::from_json_str(r#"{"style": {"fonts": {"mono_bold": null}}}"#).unwrap();
    assert!(cfg.style.fonts.mono_bold.is_none());
    assert_eq!(cfg.style.fonts.mono, FontsConfig::default().mono);
}
