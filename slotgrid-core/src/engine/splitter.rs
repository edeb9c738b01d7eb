//! Splitting of long appointments into one part per layout interval.

use tracing::trace;

use super::Pipeline;
use crate::appointment::AppointmentAdapter;
use crate::dates::{MINUTE, dates_of_interval};
use crate::occurrence::GridOccurrence;

impl Pipeline<'_> {
    /// Split each occurrence at every interval boundary between its start
    /// and its (view-clamped) end, when the render strategy asks for it.
    ///
    /// Parts keep the parent's source, so they stay in the parent's group.
    pub(super) fn split_long_occurrences(
        &self,
        occurrences: Vec<GridOccurrence>,
        adapter: &AppointmentAdapter<'_>,
    ) -> Vec<GridOccurrence> {
        let raw = adapter.source();
        let takes_all_day = adapter.takes_all_day();
        let render = self.deps.render;

        if !render.need_separate_appointment(takes_all_day) {
            return occurrences;
        }

        let geometry = self.geometry();
        let max_date = geometry.date_range().max;
        let step = geometry.interval_duration(takes_all_day);
        let part_duration = adapter.duration().max(MINUTE);

        let parts: Vec<GridOccurrence> = occurrences
            .into_iter()
            .flat_map(|occurrence| {
                let end_of_parts = render.normalize_end_date_by_view_end(raw, occurrence.end_date);

                dates_of_interval(occurrence.start_date, end_of_parts, step)
                    .into_iter()
                    .filter(move |start| *start < max_date)
                    .map(move |start| GridOccurrence {
                        start_date: start,
                        end_date: start + part_duration,
                        source: occurrence.source,
                    })
            })
            .collect();

        trace!(count = parts.len(), step_minutes = step.num_minutes(), "split long occurrences");
        parts
    }
}
