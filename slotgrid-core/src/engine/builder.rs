//! Raw occurrence construction.

use chrono::NaiveDateTime;

use super::Pipeline;
use super::projector::offset_difference;
use crate::appointment::AppointmentAdapter;
use crate::dates::{add_duration_dst_neutral, trim_time};
use crate::occurrence::Occurrence;
use crate::recurrence::RecurrenceOptions;

pub(super) fn single_occurrence(adapter: &AppointmentAdapter<'_>) -> Occurrence {
    Occurrence::new(adapter.start_date(), adapter.end_date())
}

pub(super) fn ensure_non_degenerate(occurrences: Vec<Occurrence>) -> Vec<Occurrence> {
    occurrences.into_iter().map(Occurrence::non_degenerate).collect()
}

impl Pipeline<'_> {
    /// Visible window translated into the appointment's own frame.
    pub(super) fn recurrence_window(
        &self,
        adapter: &AppointmentAdapter<'_>,
    ) -> (NaiveDateTime, NaiveDateTime) {
        let range = self.geometry().date_range();
        let start_view = if adapter.takes_all_day() {
            trim_time(range.min)
        } else {
            range.min
        };

        if self.settings.is_time_zone_set() {
            let timezone = self.timezone();
            (timezone.from_grid(start_view), timezone.from_grid(range.max))
        } else {
            (start_view, range.max)
        }
    }

    /// Shift an exception date into the offset of the appointment's start.
    pub(super) fn exception_transform(
        &self,
        adapter: &AppointmentAdapter<'_>,
        date: NaiveDateTime,
    ) -> NaiveDateTime {
        if !self.settings.is_time_zone_set() {
            return date;
        }

        let timezone = self.timezone();
        let offsets = timezone.offsets(date);
        if offsets.is_equal() {
            return date;
        }

        let appointment_offset = timezone.offsets(adapter.start_date()).grid;
        let diff = offset_difference(appointment_offset, offsets.grid);
        date - self.dst_corrected_offset(date, diff)
    }

    /// Expand a recurring appointment; each occurrence ends `duration` later
    /// on the wall clock.
    pub(super) fn expand_recurrence(
        &self,
        adapter: &AppointmentAdapter<'_>,
        group_index: Option<usize>,
    ) -> Vec<Occurrence> {
        let Some(rule) = adapter.recurrence_rule() else {
            return Vec::new();
        };

        let (min, max) = self.recurrence_window(adapter);
        let transform = |date: NaiveDateTime| self.exception_transform(adapter, date);
        let options = RecurrenceOptions {
            rule,
            exception: adapter.recurrence_exception(),
            min,
            max,
            first_day_of_week: self.settings.first_weekday(),
            start: adapter.start_date(),
            end: adapter.end_date(),
            exception_transform: &transform,
        };

        let duration = adapter.duration();
        self.deps
            .recurrence
            .generate_dates(&options)
            .into_iter()
            .map(|start| {
                let occurrence = Occurrence::new(start, add_duration_dst_neutral(start, duration));
                match group_index {
                    Some(index) => occurrence.in_group(index),
                    None => occurrence,
                }
            })
            .collect()
    }

    /// One occurrence for a plain appointment, the expansion for a recurring one.
    pub(super) fn build_occurrences(&self, adapter: &AppointmentAdapter<'_>) -> Vec<Occurrence> {
        let occurrences = if adapter.is_recurrent() {
            self.expand_recurrence(adapter, None)
        } else {
            vec![single_occurrence(adapter)]
        };

        ensure_non_degenerate(occurrences)
    }
}
