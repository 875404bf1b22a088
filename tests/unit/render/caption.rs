use rand::{SeedableRng, rngs::StdRng};

use super::*;

fn group(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

fn hand_book(engine: &mut TextLayoutEngine) -> FontBook {
    let bytes = std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap();
    FontBook {
        hand: Some(engine.register_font(bytes).unwrap()),
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

#[test]
fn lines_step_down_by_line_height() {
    let style = CaptionStyle::default();
    let mut rng = StdRng::seed_from_u64(9);
    let layout = caption_layout(&group(&["a", "b", "c"]), 800.0, &style, &mut rng);

    let ys: Vec<f64> = layout.lines.iter().map(|l| l.origin.y).collect();
    assert_eq!(ys, vec![800.0, 860.0, 920.0]);
    assert_eq!(layout.end_y, 980.0);
    for line in &layout.lines {
        assert!((100.0..120.0).contains(&line.origin.x));
        assert!((-0.01..0.01).contains(&line.rotation));
    }
    assert_eq!(layout.lines[1].text, "b");
}

#[test]
fn empty_group_keeps_cursor() {
    let mut rng = StdRng::seed_from_u64(1);
    let layout = caption_layout(&[], 800.0, &CaptionStyle::default(), &mut rng);
    assert!(layout.lines.is_empty());
    assert_eq!(layout.end_y, 800.0);
}

#[test]
fn missing_font_still_advances_without_drawing() {
    let style = Style::default();
    let mut canvas = Canvas::new(style.canvas_size().unwrap()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let mut rng = StdRng::seed_from_u64(5);

    let layout = draw_caption(
        &mut canvas,
        &mut engine,
        &FontBook::default(),
        &style,
        &group(&["在孤独里", "我依然狂奔"]),
        &mut rng,
    )
    .unwrap();
    assert_eq!(layout.lines.len(), 2);
    assert_eq!(layout.end_y, style.caption_start_y() + 120.0);
    assert!(canvas.data().iter().all(|&b| b == 0));
}

#[test]
fn same_seed_same_layout() {
    let lines = group(&["x", "y"]);
    let style = CaptionStyle::default();
    let a = caption_layout(&lines, 0.0, &style, &mut StdRng::seed_from_u64(42));
    let b = caption_layout(&lines, 0.0, &style, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn caption_ink_sits_on_the_jittered_baseline() {
    let style = Style::default();
    let mut canvas = Canvas::new(style.canvas_size().unwrap()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let fonts = hand_book(&mut engine);
    let mut rng = StdRng::seed_from_u64(8);

    let layout = draw_caption(
        &mut canvas,
        &mut engine,
        &fonts,
        &style,
        &group(&["Hello"]),
        &mut rng,
    )
    .unwrap();
    let origin = layout.lines[0].origin;
    assert_eq!(origin.y, 800.0);

    let (x0, y0, x1, y1) = ink_bounds(&canvas).unwrap();
    // "Hello" has no descenders: ink ends on the baseline, cap height above it.
    assert!((100..126).contains(&x0), "left {x0}");
    assert!(f64::from(x0) >= origin.x - 1.0, "left {x0} origin {}", origin.x);
    assert!((796..=803).contains(&y1), "bottom {y1}");
    assert!((755..785).contains(&y0), "top {y0}");
    assert!(x1 - x0 > 90, "width {}", x1 - x0);
}

#[test]
fn caption_lines_are_drawn_one_below_the_other() {
    let style = Style::default();
    let mut canvas = Canvas::new(style.canvas_size().unwrap()).unwrap();
    let mut engine = TextLayoutEngine::new();
    let fonts = hand_book(&mut engine);
    let mut rng = StdRng::seed_from_u64(3);

    draw_caption(
        &mut canvas,
        &mut engine,
        &fonts,
        &style,
        &group(&["HHH", "HHH"]),
        &mut rng,
    )
    .unwrap();

    let row_has_ink = |y: u32| (0..900).any(|x| canvas.pixel(x, y).unwrap()[3] > 0);
    // Cap band of each line, and the gap between them.
    assert!(row_has_ink(785));
    assert!(!row_has_ink(810));
    assert!(row_has_ink(845));
    assert!(!row_has_ink(870));
}
