use std::cmp::Ordering;

use super::LayoutError;
use super::lanes::{self, SpanItem};
use super::packing::{self, PackItem};
use super::types::GanttLayoutResult;

/// A range milestone projected onto the axis, plus its label chip budget.
#[derive(Debug, Clone, Copy)]
pub(super) struct RangeInput {
    pub source_idx: usize,
    pub start_px: f32,
    pub end_px: f32,
    pub label: PackItem,
    pub label_half_extent: f32,
}

#[derive(Debug, Clone)]
pub(super) struct GanttLayoutData {
    pub results: Vec<GanttLayoutResult>,
    pub bar_lane_count: usize,
    pub label_lane_count: usize,
    pub fits: bool,
}

/// Lays out range milestones: bars first, labels second.
///
/// Bars use plain first-fit interval scheduling into rows. Labels sit at bar
/// midpoints and go through the same lane + collapse/expand machinery as
/// point chips, bounded by `label_extent`; the label pass never moves or
/// resizes a bar.
pub(super) fn compute_gantt_layout(
    ranges: &[RangeInput],
    label_extent: f32,
    bar_gap: f32,
    lane_gap: f32,
    label_gap: f32,
    prefer_low_priority: bool,
) -> Result<GanttLayoutData, LayoutError> {
    let n = ranges.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        ranges[a]
            .start_px
            .partial_cmp(&ranges[b].start_px)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    let mut bar_lanes = vec![0usize; n];
    let mut row_end: Vec<f32> = Vec::new();
    for &idx in &order {
        let row = row_end
            .iter()
            .position(|&end| ranges[idx].start_px >= end + bar_gap);
        match row {
            Some(row) => {
                bar_lanes[idx] = row;
                row_end[row] = ranges[idx].end_px;
            }
            None => {
                bar_lanes[idx] = row_end.len();
                row_end.push(ranges[idx].end_px);
            }
        }
    }

    let spans: Vec<SpanItem> = ranges
        .iter()
        .map(|range| SpanItem {
            center: (range.start_px + range.end_px) * 0.5,
            half_extent: range.label_half_extent,
        })
        .collect();
    let assignment = lanes::assign_lanes(&spans, lane_gap);
    let items: Vec<PackItem> = ranges.iter().map(|range| range.label).collect();
    let packing = packing::pack(
        &items,
        &assignment.lanes,
        &assignment.conflicts,
        label_extent,
        label_gap,
        prefer_low_priority,
    )?;

    let results = ranges
        .iter()
        .enumerate()
        .map(|(idx, range)| GanttLayoutResult {
            source_idx: range.source_idx,
            bar_lane: bar_lanes[idx],
            bar_start_px: range.start_px,
            bar_end_px: range.end_px,
            label_center_px: spans[idx].center,
            label_lane: assignment.lanes[idx],
            label_offset_px: packing.offsets[idx],
            label_expanded: packing.expanded[idx],
            label_width_px: if packing.expanded[idx] {
                range.label.expanded_width
            } else {
                range.label.collapsed_width
            },
        })
        .collect();

    Ok(GanttLayoutData {
        results,
        bar_lane_count: row_end.len(),
        label_lane_count: assignment.lane_count,
        fits: packing.fits,
    })
}
