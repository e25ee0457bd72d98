use serde::Serialize;

/// Which of the three page layouts to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Fill,
    Calendar,
    Timeline,
}

/// Direction of the time axis in the timeline view. Labels pack into the
/// perpendicular dimension either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Countdown header numbers derived from the axis and the reference date.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountdownSummary {
    pub days_total: i32,
    pub days_elapsed: i32,
    pub days_remaining: i32,
    pub fraction_elapsed: f32,
}

/// Per-point-milestone output: the sole contract handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutResult {
    pub source_idx: usize,
    /// Chip center along the axis, in pixels from the axis origin.
    pub position_px: f32,
    pub lane: usize,
    pub offset_px: f32,
    pub expanded: bool,
    /// Resolved chip width for the chosen state, so renderers never re-derive
    /// text measurements.
    pub width_px: f32,
}

/// Per-range-milestone output: bar geometry plus the label chip placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GanttLayoutResult {
    pub source_idx: usize,
    pub bar_lane: usize,
    pub bar_start_px: f32,
    pub bar_end_px: f32,
    pub label_center_px: f32,
    pub label_lane: usize,
    pub label_offset_px: f32,
    pub label_expanded: bool,
    pub label_width_px: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisTick {
    pub position_px: f32,
    pub label: String,
    /// False for unlabeled week marks.
    pub major: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineLayout {
    pub orientation: Orientation,
    pub axis_len: f32,
    pub axis_offset: f32,
    pub points: Vec<LayoutResult>,
    pub points_fit: bool,
    pub point_lane_count: usize,
    pub gantt: Vec<GanttLayoutResult>,
    pub gantt_fit: bool,
    pub bar_lane_count: usize,
    pub gantt_label_lane_count: usize,
    pub ticks: Vec<AxisTick>,
    pub today_px: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub col: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MilestoneCell {
    pub source_idx: usize,
    pub cell: GridCell,
    /// Present for range milestones: the cell of the end date.
    pub end_cell: Option<GridCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FillLayout {
    pub cols: usize,
    pub rows: usize,
    pub cell_size: f32,
    pub cell_gap: f32,
    pub total_cells: usize,
    pub filled_cells: usize,
    pub milestone_cells: Vec<MilestoneCell>,
    pub today_cell: Option<GridCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthMark {
    pub row: usize,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarLayout {
    pub weeks: usize,
    pub cell_size: f32,
    pub cell_gap: f32,
    pub lead_blanks: usize,
    pub total_days: usize,
    pub milestone_cells: Vec<MilestoneCell>,
    pub today_cell: Option<GridCell>,
    pub month_marks: Vec<MonthMark>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewData {
    Fill(FillLayout),
    Calendar(CalendarLayout),
    Timeline(TimelineLayout),
}

/// One computed layout pass: an immutable snapshot recomputed wholesale on
/// every viewport, orientation or data change.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub countdown: CountdownSummary,
    pub data: ViewData,
    pub width: f32,
    pub height: f32,
}
