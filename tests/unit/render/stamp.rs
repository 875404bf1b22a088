use rand::{SeedableRng, rngs::StdRng};

use super::*;
use crate::config::StampLine;

fn mono_book(engine: &mut TextLayoutEngine) -> FontBook {
    let regular = std::fs::read("tests/data/fonts/DejaVuSansMono.ttf").unwrap();
    let bold = std::fs::read("tests/data/fonts/DejaVuSansMono-Bold.ttf").unwrap();
    FontBook {
        mono: Some(engine.register_font(regular).unwrap()),
        mono_bold: Some(engine.register_font(bold).unwrap()),
        ..FontBook::default()
    }
}

/// `(min_x, min_y, max_x, max_y)` of every pixel with any coverage.
fn ink_bounds(canvas: &Canvas) -> Option<(u32, u32, u32, u32)> {
    let w = canvas.size().width;
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (i, px) in canvas.data().chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let (x, y) = (i as u32 % w, i as u32 / w);
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

fn total_alpha(canvas: &Canvas) -> u64 {
    canvas.data().chunks_exact(4).map(|px| u64::from(px[3])).sum()
}

#[test]
fn archive_date_is_zero_padded_with_dots() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    assert_eq!(format_archive_date(d), "2024.03.05");
    let d = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    assert_eq!(format_archive_date(d), "1999.12.31");
}

#[test]
fn stamp_sits_near_lower_right_with_small_tilt() {
    let style = Style::default();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let p = stamp_placement(&style, &mut rng);
        assert_eq!(p.center, Point::new(780.0, 960.0));
        assert!((-0.2..0.2).contains(&p.rotation));
    }
}

#[test]
fn rings_are_drawn_without_a_font() {
    let style = Style::default();
    let mut canvas = Canvas::new(style.canvas_size().unwrap()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let mut rng = StdRng::seed_from_u64(2);
    let placement = draw_stamp(
        &mut canvas,
        &mut engine,
        &FontBook::default(),
        &style,
        &mut rng,
    ).unwrap();

    // Outer ring is 3px wide at radius 35; the stamp centre stays empty.
    let c = placement.center;
    assert_eq!(canvas.pixel(c.x as u32, c.y as u32).map(|p| p[3]), Some(0));
    let ring_x = (c.x + 35.0) as u32;
    assert!(canvas.pixel(ring_x, c.y as u32).unwrap()[3] > 0);
}

#[test]
fn date_is_skipped_without_a_font() {
    let style = Style::default();
    let mut canvas = Canvas::new(style.canvas_size().unwrap()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    draw_date(&mut canvas, &mut engine, &FontBook::default(), &style, d).unwrap();
    assert!(canvas.data().iter().all(|&b| b == 0));
}

#[test]
fn date_is_right_aligned_on_its_baseline() {
    let style = Style::default();
    let mut canvas = Canvas::new(style.canvas_size().unwrap()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let fonts = mono_book(&mut engine);
    let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    draw_date(&mut canvas, &mut engine, &fonts, &style, d).unwrap();

    let layout = engine
        .layout_line(
            &format_archive_date(d),
            fonts.mono.as_ref().unwrap(),
            TextStyle {
                size_px: style.fonts.mono.size_px,
                bold: false,
                brush: style.colors.date.into(),
            },
        )
        .unwrap();
    let advance = f64::from(layout.width());

    let (x0, y0, x1, y1) = ink_bounds(&canvas).unwrap();
    // Anchor is (900 - 80, 1100 - 60); digits stand on the baseline.
    assert!((805..=821).contains(&x1), "right {x1}");
    assert!((1036..=1041).contains(&y1), "bottom {y1}");
    assert!((1015..1030).contains(&y0), "top {y0}");
    // Ten glyphs spread over the whole advance, minus side bearings.
    let ink_width = f64::from(x1 - x0);
    assert!(ink_width > advance - 8.0 && ink_width <= advance + 1.0, "{ink_width} vs {advance}");
}

#[test]
fn stamp_text_is_centred_on_the_stamp() {
    let mut style = Style::default();
    style.stamp.max_rotation = 0.0;
    // Rings wide enough to fall outside the canvas leave only the text.
    style.stamp.outer_radius = 2000.0;
    style.stamp.inner_radius = 1990.0;
    let mut canvas = Canvas::new(style.canvas_size().unwrap()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let fonts = mono_book(&mut engine);
    let mut rng = StdRng::seed_from_u64(4);
    let placement = draw_stamp(&mut canvas, &mut engine, &fonts, &style, &mut rng).unwrap();

    let (x0, y0, x1, y1) = ink_bounds(&canvas).unwrap();
    let c = placement.center;
    let mid_x = f64::from(x0 + x1) / 2.0;
    assert!((mid_x - c.x).abs() <= 2.0, "ink centre {mid_x} vs {}", c.x);
    // MARS sits above the centre, ARCHIVE below it.
    assert!(f64::from(y0) < c.y - 5.0 && f64::from(y1) > c.y + 5.0);
    assert!(f64::from(y1 - y0) < 40.0);
}

#[test]
fn bold_stamp_line_uses_the_bold_face() {
    let render = |bold: bool| {
        let mut style = Style::default();
        style.stamp.lines = vec![StampLine {
            text: "MARS".to_string(),
            size_px: 16.0,
            bold,
            offset_y: -5.0,
        }];
        let mut canvas = Canvas::new(style.canvas_size().unwrap()).unwrap();
        let mut engine = TextLayoutEngine::new();
        let fonts = mono_book(&mut engine);
        draw_stamp(
            &mut canvas,
            &mut engine,
            &fonts,
            &style,
            &mut StdRng::seed_from_u64(12),
        )
        .unwrap();
        canvas
    };

    let regular = render(false);
    let bold = render(true);
    assert_ne!(regular.data(), bold.data());
    assert!(total_alpha(&bold) > total_alpha(&regular));
}

#[test]
fn bold_runs_resolve_to_the_registered_bold_face() {
    let mut engine = TextLayoutEngine::new();
    let fonts = mono_book(&mut engine);
    let layout = engine
        .layout_line(
            "MARS",
            fonts.mono_face(true).unwrap(),
            TextStyle {
                size_px: 16.0,
                bold: true,
                brush: Style::default().colors.date.into(),
            },
        )
        .unwrap();

    let bold = fonts.mono_bold.as_ref().unwrap();
    let mut runs = 0;
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let font = run.run().font();
            let face = fonts.resolve(font.data.id(), font.index).unwrap();
            assert!(std::ptr::eq(face, bold));
            runs += 1;
        }
    }
    assert!(runs > 0);
}
