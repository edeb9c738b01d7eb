//! Cropping of occurrence starts to the visible part of the view.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use super::Pipeline;
use crate::appointment::AppointmentAdapter;
use crate::dates::{normalize_date, round_by_start_day_hour, trim_time};
use crate::occurrence::GridOccurrence;

/// All-day occurrences are clamped to the first view day, timed ones to the
/// first view date itself; either is then rounded up to the start of day.
fn cropped_start(
    occurrence: &GridOccurrence,
    takes_all_day: bool,
    first_view_date: NaiveDateTime,
    start_day: NaiveTime,
) -> NaiveDateTime {
    let min = if takes_all_day {
        trim_time(first_view_date)
    } else {
        first_view_date
    };

    round_by_start_day_hour(normalize_date(occurrence.start_date, min), start_day)
}

impl Pipeline<'_> {
    /// Crop against the view start and the configured start day hour.
    pub(super) fn crop_to_view_start(
        &self,
        occurrences: Vec<GridOccurrence>,
        adapter: &AppointmentAdapter<'_>,
    ) -> Vec<GridOccurrence> {
        let first_view_date = self.geometry().start_view_date();
        let start_day = self.settings.start_day_time();
        let takes_all_day = adapter.takes_all_day();

        occurrences
            .into_iter()
            .map(|occurrence| {
                let start = cropped_start(&occurrence, takes_all_day, first_view_date, start_day);
                occurrence.with_start(start)
            })
            .collect()
    }

    /// Crop against the first rendered cell of each occurrence's group.
    ///
    /// Occurrences with no such cell are dropped, as are timed ones that
    /// collapse to nothing once cropped.
    pub(super) fn crop_to_group_cells(
        &self,
        occurrences: Vec<GridOccurrence>,
        adapter: &AppointmentAdapter<'_>,
        is_all_day: bool,
    ) -> Vec<GridOccurrence> {
        let geometry = self.geometry();
        let takes_all_day = adapter.takes_all_day();

        occurrences
            .into_iter()
            .filter_map(|occurrence| {
                let group_index = occurrence.group_index().unwrap_or(0);
                let first_view_date = geometry.find_group_cell_start_date(
                    group_index,
                    occurrence.start_date,
                    occurrence.end_date,
                    is_all_day,
                )?;
                let start_day = NaiveTime::from_hms_opt(first_view_date.hour(), 0, 0)
                    .unwrap_or(NaiveTime::MIN);

                let start = cropped_start(&occurrence, takes_all_day, first_view_date, start_day);
                let cropped = occurrence.with_start(start);
                (is_all_day || cropped.end_date > cropped.start_date).then_some(cropped)
            })
            .collect()
    }
}
