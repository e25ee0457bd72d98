use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use runway::{
    ColorToken, Day, HeuristicTextMeasure, LayoutConfig, Milestone, Schedule, Theme, ViewMode,
    ViewState, Viewport, compute_layout, render_svg,
};
use std::hint::black_box;

fn synthetic_schedule(milestones: usize, ranges: usize) -> Schedule {
    let start = Day::parse("2026-01-05").unwrap();
    let due = start.add_days(280);
    let mut items = Vec::with_capacity(milestones + ranges);
    for i in 0..milestones {
        // Cluster every third milestone to force lane stacking.
        let offset = ((i * 37) % 280) as i32 - (i % 3) as i32;
        items.push(Milestone {
            label: format!("Milestone {i} with a label"),
            emoji: "m".to_string(),
            date: start.add_days(offset.clamp(0, 279)),
            end_date: None,
            color: if i % 4 == 0 {
                ColorToken::Sky
            } else {
                ColorToken::Subtle
            },
            description: None,
        });
    }
    for i in 0..ranges {
        let offset = ((i * 53) % 220) as i32;
        items.push(Milestone {
            label: format!("Window {i}"),
            emoji: "w".to_string(),
            date: start.add_days(offset),
            end_date: Some(start.add_days(offset + 21)),
            color: ColorToken::Subtle,
            description: None,
        });
    }
    Schedule {
        start,
        due,
        milestones: items,
    }
}

fn viewport() -> Viewport {
    Viewport {
        width: 1280.0,
        height: 800.0,
        today: Day::parse("2026-08-06").unwrap(),
    }
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let theme = Theme::modern();
    let config = LayoutConfig::default();
    let measure = HeuristicTextMeasure::default();
    for (name, milestones, ranges) in [
        ("small", 8usize, 2usize),
        ("medium", 40, 8),
        ("large", 160, 24),
    ] {
        let schedule = synthetic_schedule(milestones, ranges);
        for mode in [ViewMode::Fill, ViewMode::Calendar, ViewMode::Timeline] {
            let state = ViewState::new(schedule.clone(), mode);
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}").to_lowercase(), name),
                &state,
                |b, state| {
                    b.iter(|| {
                        let layout = compute_layout(
                            black_box(state),
                            &viewport(),
                            &theme,
                            &config,
                            &measure,
                        )
                        .expect("layout");
                        black_box(layout.width);
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::modern();
    let config = LayoutConfig::default();
    let measure = HeuristicTextMeasure::default();
    for (name, milestones, ranges) in [("medium", 40usize, 8usize), ("large", 160, 24)] {
        let schedule = synthetic_schedule(milestones, ranges);
        let state = ViewState::new(schedule, ViewMode::Timeline);
        group.bench_with_input(BenchmarkId::from_parameter(name), &state, |b, state| {
            b.iter(|| {
                let layout =
                    compute_layout(black_box(state), &viewport(), &theme, &config, &measure)
                        .expect("layout");
                let svg = render_svg(&layout, state, &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_layout, bench_end_to_end
);
criterion_main!(benches);
