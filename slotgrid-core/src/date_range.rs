//! The rendered date window.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Date window `[min, max]` currently rendered by a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

impl DateRange {
    pub fn new(min: NaiveDateTime, max: NaiveDateTime) -> Self {
        DateRange { min, max }
    }

    pub fn contains(&self, date: NaiveDateTime) -> bool {
        date >= self.min && date <= self.max
    }

    /// Whether `[start, end)` overlaps this window.
    pub fn intersects(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start < self.max && end > self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_intersects_is_half_open() {
        let range = DateRange::new(at(1, 0), at(2, 0));

        assert!(range.intersects(at(1, 10), at(1, 11)));
        assert!(range.intersects(at(1, 23), at(3, 0)));
        assert!(!range.intersects(at(2, 0), at(2, 1)));
        assert!(!range.intersects(at(1, 0) - chrono::Duration::hours(1), at(1, 0)));
    }
}
