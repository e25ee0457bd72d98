mod axis;
mod gantt;
mod grid;
pub(crate) mod lanes;
pub(crate) mod packing;
pub(crate) mod types;

pub use axis::TimeAxis;
pub use lanes::{ConflictMatrix, LaneAssignment, SpanItem, assign_lanes, conflict_matrix};
pub use packing::{PackItem, Packing, pack};
pub use types::*;

use crate::config::LayoutConfig;
use crate::model::{Day, Milestone, Schedule};
use crate::text_metrics::TextMeasure;
use crate::theme::Theme;
use thiserror::Error;

/// Setup preconditions, surfaced before any layout math runs. Anything the
/// pipeline can recover from (an infeasible extent, an exhausted collapse
/// budget) is reported through the `fits` flags instead.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("time axis has zero duration: start {start} is not before due {due}")]
    ZeroDuration { start: Day, due: Day },
    #[error("collapsed chip {index} is {collapsed}px wide but only {extent}px are available")]
    CollapsedWiderThanExtent {
        index: usize,
        collapsed: f32,
        extent: f32,
    },
}

/// Viewport dimensions plus the countdown reference date. `today` is an
/// input rather than a clock read so layout stays a pure function.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub today: Day,
}

/// Top-level state owned by the embedding view. Selection is explicit state
/// passed down to rendering, never shared mutable globals; replacing the
/// schedule or mode simply means computing a fresh layout.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub schedule: Schedule,
    pub mode: ViewMode,
    pub highlight: Option<usize>,
}

impl ViewState {
    pub fn new(schedule: Schedule, mode: ViewMode) -> ViewState {
        ViewState {
            schedule,
            mode,
            highlight: None,
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn set_highlight(&mut self, highlight: Option<usize>) {
        self.highlight = highlight;
    }

    /// The editing backend replaces the whole list; there is no incremental
    /// update path.
    pub fn replace_schedule(&mut self, schedule: Schedule) {
        self.highlight = None;
        self.schedule = schedule;
    }
}

/// Runs the full pipeline for one viewport: axis mapping, point-milestone
/// lanes and packing, Gantt ranges, and view geometry. Synchronous and
/// re-entrant-free; every call recomputes from scratch.
pub fn compute_layout(
    state: &ViewState,
    viewport: &Viewport,
    theme: &Theme,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> Result<Layout, LayoutError> {
    let schedule = &state.schedule;
    let axis = TimeAxis::new(schedule.start, schedule.due)?;

    let countdown = CountdownSummary {
        days_total: axis.total_days(),
        days_elapsed: schedule
            .start
            .days_until(viewport.today)
            .clamp(0, axis.total_days()),
        days_remaining: axis.days_remaining(viewport.today).max(0),
        fraction_elapsed: axis.elapsed_fraction(viewport.today),
    };

    let inner_w = (viewport.width - config.padding * 2.0).max(1.0);
    let inner_h = (viewport.height - config.padding * 2.0).max(1.0);

    let data = match state.mode {
        ViewMode::Fill => ViewData::Fill(grid::compute_fill_layout(
            schedule,
            inner_w,
            inner_h,
            viewport.today,
            config,
        )),
        ViewMode::Calendar => ViewData::Calendar(grid::compute_calendar_layout(
            schedule,
            inner_w,
            inner_h,
            viewport.today,
            config,
        )),
        ViewMode::Timeline => ViewData::Timeline(compute_timeline_layout(
            schedule, &axis, viewport, theme, config, measure,
        )?),
    };

    Ok(Layout {
        countdown,
        data,
        width: viewport.width,
        height: viewport.height,
    })
}

fn compute_timeline_layout(
    schedule: &Schedule,
    axis: &TimeAxis,
    viewport: &Viewport,
    theme: &Theme,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> Result<TimelineLayout, LayoutError> {
    let orientation = if viewport.width >= viewport.height {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };
    let (main, cross) = match orientation {
        Orientation::Horizontal => (viewport.width, viewport.height),
        Orientation::Vertical => (viewport.height, viewport.width),
    };
    let axis_len = (main - config.padding * 2.0).max(1.0);
    let half_extent = config.chip_extent * 0.5;
    let to_px = |day: Day| axis.position(day) / 100.0 * axis_len;

    // Point milestones: lanes, then collapse/expand packing.
    let point_indices = schedule.point_indices();
    let spans: Vec<SpanItem> = point_indices
        .iter()
        .map(|&idx| SpanItem {
            center: to_px(schedule.milestones[idx].date),
            half_extent,
        })
        .collect();
    let assignment = assign_lanes(&spans, config.lane_conflict_gap);
    let chips: Vec<PackItem> = point_indices
        .iter()
        .map(|&idx| chip_item(&schedule.milestones[idx], theme, config, measure))
        .collect();
    let point_extent = (cross * config.point_extent_ratio).max(config.collapsed_width);
    let packing = pack(
        &chips,
        &assignment.lanes,
        &assignment.conflicts,
        point_extent,
        config.label_gap,
        config.collapse_prefers_low_priority,
    )?;
    let points: Vec<LayoutResult> = point_indices
        .iter()
        .enumerate()
        .map(|(i, &idx)| LayoutResult {
            source_idx: idx,
            position_px: spans[i].center,
            lane: assignment.lanes[i],
            offset_px: packing.offsets[i],
            expanded: packing.expanded[i],
            width_px: if packing.expanded[i] {
                chips[i].expanded_width
            } else {
                chips[i].collapsed_width
            },
        })
        .collect();

    // Range milestones run through their own, independently-bounded layout.
    let ranges: Vec<gantt::RangeInput> = schedule
        .range_indices()
        .iter()
        .map(|&idx| {
            let milestone = &schedule.milestones[idx];
            let end = milestone.end_date.unwrap_or(milestone.date);
            gantt::RangeInput {
                source_idx: idx,
                start_px: to_px(milestone.date),
                end_px: to_px(end).max(to_px(milestone.date) + config.bar_min_len),
                label: chip_item(milestone, theme, config, measure),
                label_half_extent: half_extent,
            }
        })
        .collect();
    let gantt_extent = (cross * config.gantt_extent_ratio).max(config.collapsed_width);
    let gantt_data = gantt::compute_gantt_layout(
        &ranges,
        gantt_extent,
        config.bar_gap,
        config.lane_conflict_gap,
        config.label_gap,
        config.collapse_prefers_low_priority,
    )?;

    let today_px = axis
        .contains(viewport.today)
        .then(|| to_px(viewport.today));

    Ok(TimelineLayout {
        orientation,
        axis_len,
        axis_offset: config.padding,
        points,
        points_fit: packing.fits,
        point_lane_count: assignment.lane_count,
        gantt: gantt_data.results,
        gantt_fit: gantt_data.fits,
        bar_lane_count: gantt_data.bar_lane_count,
        gantt_label_lane_count: gantt_data.label_lane_count,
        ticks: axis_ticks(axis, axis_len, config),
        today_px,
    })
}

/// Width budget of one milestone chip: emoji disc when collapsed, emoji disc
/// plus label text when expanded.
fn chip_item(
    milestone: &Milestone,
    theme: &Theme,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> PackItem {
    let text = measure.text_width(&milestone.label, theme.font_size);
    let expanded = config.collapsed_width + config.label_text_gap + text + config.chip_pad_x;
    PackItem {
        expanded_width: expanded.max(config.collapsed_width),
        collapsed_width: config.collapsed_width,
        high_priority: milestone.high_priority(),
    }
}

fn axis_ticks(axis: &TimeAxis, axis_len: f32, config: &LayoutConfig) -> Vec<AxisTick> {
    let count = config.tick_count.max(2) as i64;
    let total = axis.total_days();
    let mut ticks = Vec::new();
    let mut last_day: Option<Day> = None;
    for i in 0..=count {
        let day = axis.start().add_days((total as i64 * i / count) as i32);
        if last_day == Some(day) {
            continue;
        }
        last_day = Some(day);
        ticks.push(AxisTick {
            position_px: axis.position(day) / 100.0 * axis_len,
            label: day.format_short(),
            major: true,
        });
    }
    // Short windows get unlabeled week marks between the major ticks.
    if total <= config.week_marks_max_days {
        let mut day = axis.start().succ();
        while day < axis.due() {
            if day.weekday() == 0 {
                ticks.push(AxisTick {
                    position_px: axis.position(day) / 100.0 * axis_len,
                    label: String::new(),
                    major: false,
                });
            }
            day = day.succ();
        }
    }
    ticks
}
