use std::cmp::Ordering;

/// An item's footprint along the time axis, in pixels. The extent is the
/// fixed chip dimension, never the expanded/collapsed label width - lane
/// assignment runs before any collapse decision exists.
#[derive(Debug, Clone, Copy)]
pub struct SpanItem {
    pub center: f32,
    pub half_extent: f32,
}

/// Symmetric pairwise conflict relation, precomputed once so the packing
/// pass never repeats overlap tests.
#[derive(Debug, Clone)]
pub struct ConflictMatrix {
    n: usize,
    bits: Vec<bool>,
}

impl ConflictMatrix {
    fn new(n: usize) -> ConflictMatrix {
        ConflictMatrix {
            n,
            bits: vec![false; n * n],
        }
    }

    fn set(&mut self, a: usize, b: usize) {
        self.bits[a * self.n + b] = true;
        self.bits[b * self.n + a] = true;
    }

    pub fn conflicts(&self, a: usize, b: usize) -> bool {
        self.bits[a * self.n + b]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

#[derive(Debug, Clone)]
pub struct LaneAssignment {
    pub lanes: Vec<usize>,
    pub lane_count: usize,
    pub conflicts: ConflictMatrix,
}

pub fn conflict_matrix(items: &[SpanItem], gap: f32) -> ConflictMatrix {
    let mut matrix = ConflictMatrix::new(items.len());
    for a in 0..items.len() {
        for b in (a + 1)..items.len() {
            let distance = (items[a].center - items[b].center).abs();
            if distance < items[a].half_extent + items[b].half_extent + gap {
                matrix.set(a, b);
            }
        }
    }
    matrix
}

/// Greedy interval coloring: items sorted by axis position (ties keep input
/// order) each take the first lane whose members they do not conflict with.
/// Deterministic for a given input order.
pub fn assign_lanes(items: &[SpanItem], gap: f32) -> LaneAssignment {
    let conflicts = conflict_matrix(items, gap);
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .center
            .partial_cmp(&items[b].center)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });

    let mut lanes = vec![0usize; items.len()];
    let mut members: Vec<Vec<usize>> = Vec::new();
    for &idx in &order {
        let found = members
            .iter()
            .position(|bucket| bucket.iter().all(|&other| !conflicts.conflicts(idx, other)));
        let lane = match found {
            Some(lane) => lane,
            None => {
                members.push(Vec::new());
                members.len() - 1
            }
        };
        members[lane].push(idx);
        lanes[idx] = lane;
    }

    LaneAssignment {
        lanes,
        lane_count: members.len(),
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(center: f32, half_extent: f32) -> SpanItem {
        SpanItem {
            center,
            half_extent,
        }
    }

    #[test]
    fn isolated_items_share_lane_zero() {
        let items = vec![item(60.0, 14.0), item(300.0, 14.0), item(540.0, 14.0)];
        let assignment = assign_lanes(&items, 10.0);
        assert_eq!(assignment.lanes, vec![0, 0, 0]);
        assert_eq!(assignment.lane_count, 1);
    }

    #[test]
    fn close_pair_splits_into_two_lanes() {
        // Positions 10% and 12% of a 600px axis with 28px chips conflict.
        let items = vec![item(60.0, 14.0), item(72.0, 14.0), item(540.0, 14.0)];
        let assignment = assign_lanes(&items, 10.0);
        assert!(assignment.conflicts.conflicts(0, 1));
        assert!(!assignment.conflicts.conflicts(0, 2));
        assert_eq!(assignment.lanes[0], 0);
        assert_eq!(assignment.lanes[1], 1);
        assert_eq!(assignment.lanes[2], 0);
        assert_eq!(assignment.lane_count, 2);
    }

    #[test]
    fn touching_spans_without_gap_do_not_conflict() {
        // Exactly half_extent + half_extent apart: only the gap makes it a conflict.
        let items = vec![item(100.0, 14.0), item(128.0, 14.0)];
        assert!(!conflict_matrix(&items, 0.0).conflicts(0, 1));
        assert!(conflict_matrix(&items, 10.0).conflicts(0, 1));
    }

    #[test]
    fn same_lane_members_never_conflict() {
        let items: Vec<SpanItem> = (0..40).map(|i| item(i as f32 * 17.0, 14.0)).collect();
        let assignment = assign_lanes(&items, 8.0);
        for a in 0..items.len() {
            for b in (a + 1)..items.len() {
                if assignment.lanes[a] == assignment.lanes[b] {
                    assert!(
                        !assignment.conflicts.conflicts(a, b),
                        "items {a} and {b} share lane {} but conflict",
                        assignment.lanes[a]
                    );
                }
            }
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![item(100.0, 14.0), item(100.0, 14.0)];
        let assignment = assign_lanes(&items, 8.0);
        assert_eq!(assignment.lanes, vec![0, 1]);
    }
}
