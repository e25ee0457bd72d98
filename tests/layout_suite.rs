use std::path::Path;

use runway::{
    Day, HeuristicTextMeasure, LayoutConfig, Theme, ViewMode, ViewState, Viewport, compute_layout,
    parse_schedule, render_svg,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

fn render_fixture(path: &Path, mode: ViewMode, viewport: Viewport) -> String {
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    let schedule = parse_schedule(&input).expect("parse failed");
    let state = ViewState::new(schedule, mode);
    let theme = Theme::modern();
    let config = LayoutConfig::default();
    let layout = compute_layout(
        &state,
        &viewport,
        &theme,
        &config,
        &HeuristicTextMeasure::default(),
    )
    .expect("layout failed");
    render_svg(&layout, &state, &theme, &config)
}

fn landscape() -> Viewport {
    Viewport {
        width: 1280.0,
        height: 800.0,
        today: Day::parse("2026-08-06").unwrap(),
    }
}

fn portrait() -> Viewport {
    Viewport {
        width: 420.0,
        height: 900.0,
        today: Day::parse("2026-08-06").unwrap(),
    }
}

#[test]
fn render_all_fixtures() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "basic.json",
        "crowded.json",
        "empty.json",
        "ranges.json",
        "same_day.json",
        "sparse.json",
    ];

    for rel in candidates {
        let path = root.join(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        for mode in [ViewMode::Fill, ViewMode::Calendar, ViewMode::Timeline] {
            let svg = render_fixture(&path, mode, landscape());
            assert_valid_svg(&svg, rel);
        }
        // Portrait flips the timeline orientation; it must still render.
        let svg = render_fixture(&path, ViewMode::Timeline, portrait());
        assert_valid_svg(&svg, rel);
    }
}

#[test]
fn crowded_fixture_collapses_at_least_one_chip() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let input = std::fs::read_to_string(root.join("crowded.json")).unwrap();
    let schedule = parse_schedule(&input).unwrap();
    let state = ViewState::new(schedule, ViewMode::Timeline);
    let layout = compute_layout(
        &state,
        &Viewport {
            width: 1280.0,
            height: 500.0,
            today: Day::parse("2026-08-06").unwrap(),
        },
        &Theme::modern(),
        &LayoutConfig::default(),
        &HeuristicTextMeasure::default(),
    )
    .unwrap();
    let runway::layout::ViewData::Timeline(data) = &layout.data else {
        panic!("expected timeline data");
    };
    assert!(data.point_lane_count > 1, "the cluster should need lanes");
    assert!(
        data.points.iter().any(|p| !p.expanded),
        "eight chips within a week cannot all stay expanded in 275px"
    );
}

#[test]
fn fixture_layouts_are_reproducible() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let path = root.join("basic.json");
    let first = render_fixture(&path, ViewMode::Timeline, landscape());
    let second = render_fixture(&path, ViewMode::Timeline, landscape());
    assert_eq!(first, second, "identical inputs must render identically");
}
