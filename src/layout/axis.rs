use crate::model::Day;

use super::LayoutError;

/// Maps civil dates onto the normalized 0-100 progress scale between the
/// start and due dates. Positions outside the window clamp to the ends.
#[derive(Debug, Clone, Copy)]
pub struct TimeAxis {
    start: Day,
    due: Day,
    total_days: i32,
}

impl TimeAxis {
    pub fn new(start: Day, due: Day) -> Result<TimeAxis, LayoutError> {
        let total_days = start.days_until(due);
        if total_days <= 0 {
            return Err(LayoutError::ZeroDuration { start, due });
        }
        Ok(TimeAxis {
            start,
            due,
            total_days,
        })
    }

    pub fn start(&self) -> Day {
        self.start
    }

    pub fn due(&self) -> Day {
        self.due
    }

    pub fn total_days(&self) -> i32 {
        self.total_days
    }

    /// Position of `day` on the 0-100 scale.
    pub fn position(&self, day: Day) -> f32 {
        let elapsed = self.start.days_until(day).clamp(0, self.total_days);
        elapsed as f32 / self.total_days as f32 * 100.0
    }

    /// Whole days remaining until the due date; negative once it has passed.
    pub fn days_remaining(&self, today: Day) -> i32 {
        today.days_until(self.due)
    }

    /// Fraction of the window elapsed at `today`, clamped to [0, 1].
    pub fn elapsed_fraction(&self, today: Day) -> f32 {
        self.position(today) / 100.0
    }

    pub fn contains(&self, day: Day) -> bool {
        day >= self.start && day <= self.due
    }
}
