use std::cmp::Ordering;

use super::LayoutError;
use super::lanes::ConflictMatrix;

const FIT_EPS: f32 = 1e-3;

/// Width budget of one chip in both render states. `high_priority` items
/// (accented milestones) are collapsed last.
#[derive(Debug, Clone, Copy)]
pub struct PackItem {
    pub expanded_width: f32,
    pub collapsed_width: f32,
    pub high_priority: bool,
}

#[derive(Debug, Clone)]
pub struct Packing {
    pub offsets: Vec<f32>,
    pub expanded: Vec<bool>,
    /// False when even the fully-collapsed configuration overflows the
    /// extent; offsets are then best-effort and clamped.
    pub fits: bool,
}

/// Packs lane-assigned chips into `extent` pixels of perpendicular space.
///
/// Two-phase procedure: place everything expanded, then collapse one chip at
/// a time until the layout fits (bounded by `items.len() + 2` rounds), then
/// try to re-expand chips rightmost-first wherever the collapse pass freed
/// more room than it needed.
pub fn pack(
    items: &[PackItem],
    lanes: &[usize],
    conflicts: &ConflictMatrix,
    extent: f32,
    gap: f32,
    prefer_low_priority: bool,
) -> Result<Packing, LayoutError> {
    for (index, item) in items.iter().enumerate() {
        if item.collapsed_width > extent + FIT_EPS {
            return Err(LayoutError::CollapsedWiderThanExtent {
                index,
                collapsed: item.collapsed_width,
                extent,
            });
        }
    }

    let n = items.len();
    let mut expanded = vec![true; n];
    let mut offsets = place(&current_widths(items, &expanded), lanes, conflicts, gap);

    for _ in 0..n + 2 {
        let widths = current_widths(items, &expanded);
        let Some(over) = overflow_item(&offsets, &widths, extent) else {
            break;
        };
        let Some(pick) =
            collapse_candidate(over, &offsets, &expanded, items, conflicts, prefer_low_priority)
        else {
            break;
        };
        expanded[pick] = false;
        offsets = place(&current_widths(items, &expanded), lanes, conflicts, gap);
    }

    // Re-expand pass: collapses further left may have freed more room than
    // the overflow needed. Rightmost candidates first; revert on misfit.
    let mut candidates: Vec<usize> = (0..n).filter(|&i| !expanded[i]).collect();
    candidates.sort_by(|&a, &b| {
        offsets[b]
            .partial_cmp(&offsets[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    for idx in candidates {
        expanded[idx] = true;
        let trial = place(&current_widths(items, &expanded), lanes, conflicts, gap);
        if overflow_item(&trial, &current_widths(items, &expanded), extent).is_none() {
            offsets = trial;
        } else {
            expanded[idx] = false;
        }
    }

    let widths = current_widths(items, &expanded);
    let fits = overflow_item(&offsets, &widths, extent).is_none();
    for i in 0..n {
        offsets[i] = offsets[i].min((extent - widths[i]).max(0.0));
    }

    Ok(Packing {
        offsets,
        expanded,
        fits,
    })
}

fn current_widths(items: &[PackItem], expanded: &[bool]) -> Vec<f32> {
    items
        .iter()
        .zip(expanded)
        .map(|(item, &exp)| {
            if exp {
                item.expanded_width
            } else {
                item.collapsed_width
            }
        })
        .collect()
}

/// Placement pass: lanes in ascending order, each chip at the smallest
/// offset >= 0 clearing every already-placed conflicting chip in a lower
/// lane by at least `gap`.
fn place(widths: &[f32], lanes: &[usize], conflicts: &ConflictMatrix, gap: f32) -> Vec<f32> {
    let n = widths.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| lanes[a].cmp(&lanes[b]).then_with(|| a.cmp(&b)));

    let mut offsets = vec![0.0f32; n];
    let mut placed: Vec<usize> = Vec::with_capacity(n);
    for &idx in &order {
        // Forbidden offset bands induced by lower-lane conflicting chips.
        let mut blocked: Vec<(f32, f32)> = placed
            .iter()
            .copied()
            .filter(|&other| lanes[other] < lanes[idx] && conflicts.conflicts(idx, other))
            .map(|other| {
                (
                    offsets[other] - widths[idx] - gap,
                    offsets[other] + widths[other] + gap,
                )
            })
            .collect();
        blocked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let mut x = 0.0f32;
        for (lo, hi) in blocked {
            if x >= hi {
                continue;
            }
            if x > lo {
                x = hi;
            }
        }
        offsets[idx] = x.max(0.0);
        placed.push(idx);
    }
    offsets
}

/// Index of the chip whose right edge overflows the extent the furthest, if
/// any. Ties resolve to the lowest index.
fn overflow_item(offsets: &[f32], widths: &[f32], extent: f32) -> Option<usize> {
    let mut worst: Option<(usize, f32)> = None;
    for i in 0..offsets.len() {
        let right = offsets[i] + widths[i];
        if right > extent + FIT_EPS {
            let replace = match worst {
                Some((_, best)) => right > best,
                None => true,
            };
            if replace {
                worst = Some((i, right));
            }
        }
    }
    worst.map(|(i, _)| i)
}

/// Picks the next chip to collapse: among the overflow chip and everything
/// conflicting with it, the leftmost still-expanded unaccented chip, falling
/// back to the leftmost accented one.
fn collapse_candidate(
    over: usize,
    offsets: &[f32],
    expanded: &[bool],
    items: &[PackItem],
    conflicts: &ConflictMatrix,
    prefer_low_priority: bool,
) -> Option<usize> {
    let pool: Vec<usize> = (0..items.len())
        .filter(|&i| expanded[i] && (i == over || conflicts.conflicts(i, over)))
        .collect();

    let leftmost = |indices: &[usize]| -> Option<usize> {
        indices
            .iter()
            .copied()
            .min_by(|&a, &b| {
                offsets[a]
                    .partial_cmp(&offsets[b])
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.cmp(&b))
            })
    };

    if prefer_low_priority {
        let subtle: Vec<usize> = pool
            .iter()
            .copied()
            .filter(|&i| !items[i].high_priority)
            .collect();
        if let Some(pick) = leftmost(&subtle) {
            return Some(pick);
        }
    }
    leftmost(&pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::lanes::{SpanItem, assign_lanes};

    fn spans(centers: &[f32]) -> Vec<SpanItem> {
        centers
            .iter()
            .map(|&center| SpanItem {
                center,
                half_extent: 14.0,
            })
            .collect()
    }

    fn chip(expanded_width: f32, high_priority: bool) -> PackItem {
        PackItem {
            expanded_width,
            collapsed_width: 24.0,
            high_priority,
        }
    }

    #[test]
    fn close_pair_collapses_isolated_chip_expands() {
        // Positions 10 / 12 / 90 on a 600px axis; 60px of cross-axis space.
        let assignment = assign_lanes(&spans(&[60.0, 72.0, 540.0]), 10.0);
        let items = vec![chip(80.0, false), chip(80.0, false), chip(48.0, false)];
        let packing = pack(
            &items,
            &assignment.lanes,
            &assignment.conflicts,
            60.0,
            8.0,
            true,
        )
        .expect("pack");
        assert!(packing.fits);
        // The conflicting pair cannot both show 80px labels in 60px.
        assert!(!packing.expanded[0]);
        assert!(!packing.expanded[1]);
        // The isolated chip keeps its full label at offset 0.
        assert!(packing.expanded[2]);
        assert_eq!(packing.offsets[2], 0.0);
        assert_eq!(assignment.lanes[2], 0);
    }

    #[test]
    fn single_chip_at_exactly_collapsed_extent() {
        let assignment = assign_lanes(&spans(&[300.0]), 10.0);
        let items = vec![chip(80.0, false)];
        let packing = pack(
            &items,
            &assignment.lanes,
            &assignment.conflicts,
            24.0,
            8.0,
            true,
        )
        .expect("pack");
        assert!(packing.fits);
        assert!(!packing.expanded[0]);
        assert_eq!(packing.offsets[0], 0.0);
    }

    #[test]
    fn accented_chip_survives_when_only_one_fits_expanded() {
        let assignment = assign_lanes(&spans(&[100.0, 112.0]), 10.0);
        // 90px holds one 50px label plus a gap and a 24px collapsed chip,
        // but not two 50px labels.
        let subtle_first = vec![chip(50.0, false), chip(50.0, true)];
        let packing = pack(
            &subtle_first,
            &assignment.lanes,
            &assignment.conflicts,
            90.0,
            8.0,
            true,
        )
        .expect("pack");
        assert!(packing.fits);
        assert!(!packing.expanded[0], "unaccented chip should collapse");
        assert!(packing.expanded[1], "accented chip should stay expanded");

        let accented_first = vec![chip(50.0, true), chip(50.0, false)];
        let packing = pack(
            &accented_first,
            &assignment.lanes,
            &assignment.conflicts,
            90.0,
            8.0,
            true,
        )
        .expect("pack");
        assert!(packing.fits);
        assert!(packing.expanded[0], "accented chip should stay expanded");
        assert!(!packing.expanded[1], "unaccented chip should collapse");
    }

    #[test]
    fn collapsed_chip_wider_than_extent_fails_fast() {
        let assignment = assign_lanes(&spans(&[300.0]), 10.0);
        let items = vec![chip(80.0, false)];
        let err = pack(
            &items,
            &assignment.lanes,
            &assignment.conflicts,
            20.0,
            8.0,
            true,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::CollapsedWiderThanExtent { index: 0, .. }
        ));
    }

    #[test]
    fn infeasible_stack_reports_not_fitting_without_panicking() {
        // Five chips on the same pixel must stack five lanes deep; 60px cannot
        // hold 5 x 24px even fully collapsed.
        let assignment = assign_lanes(&spans(&[300.0; 5]), 10.0);
        let items = vec![chip(80.0, false); 5];
        let packing = pack(
            &items,
            &assignment.lanes,
            &assignment.conflicts,
            60.0,
            8.0,
            true,
        )
        .expect("pack");
        assert!(!packing.fits);
        for (offset, item) in packing.offsets.iter().zip(&items) {
            assert!(
                offset + item.collapsed_width <= 60.0 + FIT_EPS,
                "clamped offset {offset} escapes the extent"
            );
        }
    }

    #[test]
    fn empty_input_fits_trivially() {
        let assignment = assign_lanes(&[], 10.0);
        let packing = pack(&[], &assignment.lanes, &assignment.conflicts, 60.0, 8.0, true)
            .expect("pack");
        assert!(packing.fits);
        assert!(packing.offsets.is_empty());
    }

    #[test]
    fn rightmost_collapsed_chip_is_re_expanded_when_room_remains() {
        // Three chips stacked on one pixel; 120px holds 24 + 8 + 40 + 8 + 40.
        let assignment = assign_lanes(&spans(&[300.0, 300.0, 300.0]), 10.0);
        let items = vec![chip(40.0, false), chip(40.0, false), chip(40.0, false)];
        let packing = pack(
            &items,
            &assignment.lanes,
            &assignment.conflicts,
            120.0,
            8.0,
            true,
        )
        .expect("pack");
        assert!(packing.fits);
        let expanded_count = packing.expanded.iter().filter(|&&e| e).count();
        assert_eq!(
            expanded_count, 2,
            "expected exactly two of three chips expanded, got {:?}",
            packing.expanded
        );
    }

    #[test]
    fn conflicting_neighbors_never_overlap() {
        let centers: Vec<f32> = (0..12).map(|i| 100.0 + i as f32 * 9.0).collect();
        let assignment = assign_lanes(&spans(&centers), 10.0);
        let items: Vec<PackItem> = (0..12).map(|i| chip(30.0 + i as f32 * 4.0, i % 3 == 0)).collect();
        let packing = pack(
            &items,
            &assignment.lanes,
            &assignment.conflicts,
            400.0,
            8.0,
            true,
        )
        .expect("pack");
        assert!(packing.fits);
        let widths: Vec<f32> = items
            .iter()
            .zip(&packing.expanded)
            .map(|(item, &e)| if e { item.expanded_width } else { item.collapsed_width })
            .collect();
        for a in 0..items.len() {
            for b in (a + 1)..items.len() {
                if !assignment.conflicts.conflicts(a, b) {
                    continue;
                }
                let (left, right) = if packing.offsets[a] <= packing.offsets[b] {
                    (a, b)
                } else {
                    (b, a)
                };
                assert!(
                    packing.offsets[left] + widths[left] + 8.0 <= packing.offsets[right] + FIT_EPS,
                    "chips {a} and {b} overlap: offsets {:?} widths {:?}",
                    (packing.offsets[a], packing.offsets[b]),
                    (widths[a], widths[b]),
                );
            }
        }
    }
}
