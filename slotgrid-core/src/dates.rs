//! Wall-clock date helpers shared by the layout pipeline.
//!
//! All values here are `NaiveDateTime`: wall-clock readings in whatever
//! frame the caller is working in (native or grid).

use chrono::{Duration, NaiveDateTime, NaiveTime};

pub const MINUTE: Duration = Duration::minutes(1);
pub const HOUR: Duration = Duration::hours(1);
pub const DAY: Duration = Duration::days(1);

/// Midnight of the given date.
pub fn trim_time(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(NaiveTime::MIN)
}

/// Clamp `date` so it is not earlier than `min`.
pub fn normalize_date(date: NaiveDateTime, min: NaiveDateTime) -> NaiveDateTime {
    if date < min { min } else { date }
}

/// Move a date whose time of day falls before `start_day` forward to
/// `start_day` on the same calendar day.
pub fn round_by_start_day_hour(date: NaiveDateTime, start_day: NaiveTime) -> NaiveDateTime {
    if date.time() < start_day {
        date.date().and_time(start_day)
    } else {
        date
    }
}

/// Every `step` from `start` while strictly before `end`.
pub fn dates_of_interval(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
) -> Vec<NaiveDateTime> {
    if step <= Duration::zero() {
        return if start < end { vec![start] } else { Vec::new() };
    }

    let mut result = Vec::new();
    let mut current = start;
    while current < end {
        result.push(current);
        current += step;
    }
    result
}

/// Add a duration with no regard for DST.
///
/// The wall-clock reading is pinned to a fixed UTC offset, the duration is
/// added there and the result is read back as wall-clock, so an hour-long
/// appointment stays an hour long on the clock face even across a
/// transition.
pub fn add_duration_dst_neutral(start: NaiveDateTime, duration: Duration) -> NaiveDateTime {
    (start.and_utc() + duration).naive_utc()
}

/// Convert a decimal hour (`8.5` = 08:30) into a time of day.
///
/// Values are clamped into a single day; `24` maps to the last minute.
pub fn time_from_decimal_hour(hour: f64) -> NaiveTime {
    let total_minutes = (hour.clamp(0.0, 24.0) * 60.0).round() as u32;
    let total_minutes = total_minutes.min(24 * 60 - 1);
    NaiveTime::from_hms_opt(total_minutes / 60, total_minutes % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Minutes since midnight for a decimal hour, clamped to `0..=1440`.
pub fn minutes_from_decimal_hour(hour: f64) -> u32 {
    (hour.clamp(0.0, 24.0) * 60.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_round_by_start_day_hour_only_moves_early_times() {
        let start_day = NaiveTime::from_hms_opt(8, 30, 0).unwrap();

        assert_eq!(
            round_by_start_day_hour(at(2024, 6, 1, 7, 0), start_day),
            at(2024, 6, 1, 8, 30)
        );
        assert_eq!(
            round_by_start_day_hour(at(2024, 6, 1, 8, 29), start_day),
            at(2024, 6, 1, 8, 30)
        );
        assert_eq!(
            round_by_start_day_hour(at(2024, 6, 1, 9, 0), start_day),
            at(2024, 6, 1, 9, 0)
        );
    }

    #[test]
    fn test_dates_of_interval_excludes_end() {
        let dates = dates_of_interval(at(2024, 6, 1, 0, 0), at(2024, 6, 4, 0, 0), DAY);
        assert_eq!(
            dates,
            vec![at(2024, 6, 1, 0, 0), at(2024, 6, 2, 0, 0), at(2024, 6, 3, 0, 0)]
        );
    }

    #[test]
    fn test_dates_of_interval_with_zero_step() {
        let dates = dates_of_interval(at(2024, 6, 1, 0, 0), at(2024, 6, 2, 0, 0), Duration::zero());
        assert_eq!(dates, vec![at(2024, 6, 1, 0, 0)]);
    }

    #[test]
    fn test_dst_neutral_duration_keeps_clock_time() {
        // 2024-03-10 02:00 is a spring-forward transition in North America
        let end = add_duration_dst_neutral(at(2024, 3, 9, 23, 30), Duration::minutes(60));
        assert_eq!(end, at(2024, 3, 10, 0, 30));

        let end = add_duration_dst_neutral(at(2024, 3, 10, 1, 30), Duration::minutes(60));
        assert_eq!(end, at(2024, 3, 10, 2, 30));
    }

    #[test]
    fn test_time_from_decimal_hour() {
        assert_eq!(time_from_decimal_hour(8.5), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(time_from_decimal_hour(-3.0), NaiveTime::MIN);
        assert_eq!(time_from_decimal_hour(24.0), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
    }
}
