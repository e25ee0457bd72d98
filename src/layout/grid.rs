use crate::config::LayoutConfig;
use crate::model::{Day, Schedule};

use super::types::{CalendarLayout, FillLayout, GridCell, MilestoneCell, MonthMark};

/// One cell per countdown day, start inclusive to due exclusive.
fn day_index(schedule: &Schedule, day: Day) -> usize {
    let total = schedule.total_days().max(1);
    schedule.start.days_until(day).clamp(0, total - 1) as usize
}

fn milestone_cells(
    schedule: &Schedule,
    cell_of: impl Fn(usize) -> GridCell,
) -> Vec<MilestoneCell> {
    schedule
        .milestones
        .iter()
        .enumerate()
        .map(|(source_idx, milestone)| MilestoneCell {
            source_idx,
            cell: cell_of(day_index(schedule, milestone.date)),
            end_cell: milestone
                .end_date
                .map(|end| cell_of(day_index(schedule, end))),
        })
        .collect()
}

/// Space-filling grid: pick a column count that keeps day cells near-square
/// in the available area, then fill row-major.
pub(super) fn compute_fill_layout(
    schedule: &Schedule,
    width: f32,
    height: f32,
    today: Day,
    config: &LayoutConfig,
) -> FillLayout {
    let total_cells = schedule.total_days().max(1) as usize;
    let width = width.max(1.0);
    let height = height.max(1.0);

    let cols = ((total_cells as f32 * width / height).sqrt().ceil() as usize)
        .clamp(1, total_cells);
    let rows = total_cells.div_ceil(cols);
    let cell_size = (width / cols as f32).min(height / rows as f32);

    let cell_of = |index: usize| GridCell {
        col: index % cols,
        row: index / cols,
    };

    let filled_cells = schedule
        .start
        .days_until(today)
        .clamp(0, schedule.total_days()) as usize;
    let today_cell = (today >= schedule.start && today < schedule.due)
        .then(|| cell_of(day_index(schedule, today)));

    FillLayout {
        cols,
        rows,
        cell_size,
        cell_gap: config.fill.cell_gap,
        total_cells,
        filled_cells,
        milestone_cells: milestone_cells(schedule, cell_of),
        today_cell,
    }
}

/// Calendar grid: seven weekday columns, one row per week, aligned so column
/// zero is Monday. Leading cells before the start date render blank.
pub(super) fn compute_calendar_layout(
    schedule: &Schedule,
    width: f32,
    height: f32,
    today: Day,
    config: &LayoutConfig,
) -> CalendarLayout {
    let total_days = schedule.total_days().max(1) as usize;
    let lead_blanks = schedule.start.weekday() as usize;
    let weeks = (lead_blanks + total_days).div_ceil(7);
    let cell_size = (width.max(1.0) / 7.0).min(height.max(1.0) / weeks as f32);

    let cell_of = |index: usize| {
        let slot = lead_blanks + index;
        GridCell {
            col: slot % 7,
            row: slot / 7,
        }
    };

    let mut month_marks: Vec<MonthMark> = Vec::new();
    let mut day = schedule.start;
    for index in 0..total_days {
        if index == 0 || day.is_month_start() {
            let row = cell_of(index).row;
            if month_marks.last().map(|mark| mark.row) != Some(row) {
                month_marks.push(MonthMark {
                    row,
                    label: day.month_name().to_string(),
                });
            }
        }
        day = day.succ();
    }

    let today_cell = (today >= schedule.start && today < schedule.due)
        .then(|| cell_of(day_index(schedule, today)));

    CalendarLayout {
        weeks,
        cell_size,
        cell_gap: config.calendar.cell_gap,
        lead_blanks,
        total_days,
        milestone_cells: milestone_cells(schedule, cell_of),
        today_cell,
        month_marks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_schedule;

    fn schedule() -> Schedule {
        parse_schedule(
            r#"{
                "start": "2026-01-05",
                "due": "2026-10-12",
                "milestones": [
                    { "date": "2026-02-14", "label": "Beta", "emoji": "B" },
                    { "date": "2026-03-01", "endDate": "2026-03-21", "label": "Bash", "emoji": "X" }
                ]
            }"#,
        )
        .expect("schedule")
    }

    #[test]
    fn fill_grid_covers_every_day_exactly_once() {
        let schedule = schedule();
        let layout = compute_fill_layout(
            &schedule,
            1200.0,
            800.0,
            Day::parse("2026-02-01").unwrap(),
            &LayoutConfig::default(),
        );
        assert_eq!(layout.total_cells, 280);
        assert!(layout.cols * layout.rows >= layout.total_cells);
        assert!(layout.cols * (layout.rows - 1) < layout.total_cells);
        assert_eq!(layout.filled_cells, 27);
        assert!(layout.cell_size > 0.0);
    }

    #[test]
    fn fill_cells_stay_near_square() {
        let schedule = schedule();
        let layout = compute_fill_layout(
            &schedule,
            1600.0,
            400.0,
            schedule.start,
            &LayoutConfig::default(),
        );
        // Wide viewport: substantially more columns than rows.
        assert!(layout.cols > layout.rows * 2);
    }

    #[test]
    fn calendar_rows_start_on_monday() {
        let schedule = schedule();
        // 2026-01-05 is a Monday, so no leading blanks and exactly 40 weeks.
        assert_eq!(schedule.start.weekday(), 0);
        let layout = compute_calendar_layout(
            &schedule,
            700.0,
            800.0,
            schedule.start,
            &LayoutConfig::default(),
        );
        assert_eq!(layout.lead_blanks, 0);
        assert_eq!(layout.weeks, 40);
        assert_eq!(layout.today_cell, Some(GridCell { col: 0, row: 0 }));
        assert_eq!(layout.month_marks.first().map(|m| m.label.as_str()), Some("Jan"));
    }

    #[test]
    fn range_milestone_maps_to_start_and_end_cells() {
        let schedule = schedule();
        let layout = compute_calendar_layout(
            &schedule,
            700.0,
            800.0,
            schedule.start,
            &LayoutConfig::default(),
        );
        let range = &layout.milestone_cells[1];
        assert_eq!(range.source_idx, 1);
        let end = range.end_cell.expect("range end cell");
        assert!(end.row > range.cell.row);
        // 2026-03-01 is a Sunday, 2026-03-21 a Saturday.
        assert_eq!(range.cell.col, 6);
        assert_eq!(end.col, 5);
    }

    #[test]
    fn today_outside_the_window_has_no_cell() {
        let schedule = schedule();
        let layout = compute_fill_layout(
            &schedule,
            1200.0,
            800.0,
            Day::parse("2027-01-01").unwrap(),
            &LayoutConfig::default(),
        );
        assert_eq!(layout.today_cell, None);
        assert_eq!(layout.filled_cells, 280);
    }
}
