//! Projection of native occurrences into grid time.
//!
//! A recurring appointment in a non-native display zone keeps its grid wall
//! clock time across DST: when the display zone's offset changes inside the
//! expanded range, each occurrence is shifted by the offset delta between
//! the appointment's canonical start and the occurrence itself.

use chrono::{Duration, FixedOffset, NaiveDateTime};
use tracing::trace;

use super::Pipeline;
use crate::appointment::AppointmentAdapter;
use crate::dates::HOUR;
use crate::occurrence::{GridOccurrence, Occurrence};

/// `a - b` as a duration.
pub(super) fn offset_difference(a: FixedOffset, b: FixedOffset) -> Duration {
    Duration::seconds(i64::from(a.local_minus_utc() - b.local_minus_utc()))
}

impl Pipeline<'_> {
    pub(super) fn can_process_not_native_timezone_dates(
        &self,
        adapter: &AppointmentAdapter<'_>,
    ) -> bool {
        self.settings.is_time_zone_set()
            && adapter.is_recurrent()
            && !self.timezone().offsets(adapter.start_date()).is_equal()
    }

    /// Zero out a negative offset delta at a date that sits within an hour
    /// after a transition, so one spring-forward is not counted twice.
    /// Positive deltas are returned unchanged.
    pub(super) fn dst_corrected_offset(&self, date: NaiveDateTime, diff: Duration) -> Duration {
        if diff < Duration::zero() {
            let timezone = self.timezone();
            let at_date = timezone.offsets(date).grid;
            let hour_before = timezone.offsets(date - HOUR).grid;

            if at_date != hour_before {
                return Duration::zero();
            }
        }

        diff
    }

    fn processed_not_native_timezone_dates(
        &self,
        occurrences: Vec<Occurrence>,
        adapter: &AppointmentAdapter<'_>,
    ) -> Vec<Occurrence> {
        let Some(last) = occurrences.last() else {
            return occurrences;
        };

        let timezone = self.timezone();
        let start_offset = timezone.offsets(adapter.start_date()).grid;
        let end_offset = timezone.offsets(last.end_date).grid;

        if start_offset == end_offset {
            return occurrences;
        }

        let canonical_end_offset = timezone.offsets(adapter.end_date()).grid;
        let duration = adapter.duration();

        occurrences
            .into_iter()
            .map(|occurrence| {
                let diff_start = self.dst_corrected_offset(
                    occurrence.start_date,
                    offset_difference(start_offset, timezone.offsets(occurrence.start_date).grid),
                );
                let diff_end = self.dst_corrected_offset(
                    occurrence.end_date,
                    offset_difference(
                        canonical_end_offset,
                        timezone.offsets(occurrence.end_date).grid,
                    ),
                );

                let start_date = occurrence.start_date + diff_start;
                let mut end_date = occurrence.end_date + diff_end;

                let grid_duration = timezone.to_grid(end_date) - timezone.to_grid(start_date);
                if duration > grid_duration {
                    end_date = start_date + duration;
                }

                Occurrence {
                    start_date,
                    end_date,
                    ..occurrence
                }
            })
            .collect()
    }

    fn grid_occurrences(
        &self,
        occurrences: Vec<Occurrence>,
        adapter: &AppointmentAdapter<'_>,
    ) -> Vec<GridOccurrence> {
        let timezone = self.timezone();
        let follow_native_drift = self.can_process_not_native_timezone_dates(adapter);
        let canonical_offset = timezone.offsets(adapter.start_date()).native;

        occurrences
            .into_iter()
            .map(|occurrence| {
                let source = if follow_native_drift {
                    let native_offset = timezone.offsets(occurrence.start_date).native;
                    let drift = offset_difference(native_offset, canonical_offset);
                    occurrence.shifted(drift)
                } else {
                    occurrence
                };

                GridOccurrence {
                    start_date: timezone.to_grid(source.start_date),
                    end_date: timezone.to_grid(source.end_date),
                    source,
                }
            })
            .collect()
    }

    pub(super) fn project(
        &self,
        occurrences: Vec<Occurrence>,
        adapter: &AppointmentAdapter<'_>,
    ) -> Vec<GridOccurrence> {
        let occurrences = if self.can_process_not_native_timezone_dates(adapter) {
            self.processed_not_native_timezone_dates(occurrences, adapter)
        } else {
            occurrences
        };

        let projected = self.grid_occurrences(occurrences, adapter);
        trace!(count = projected.len(), "projected occurrences into grid time");
        projected
    }
}
