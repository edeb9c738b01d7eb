//! Eager resolution against a single fixed group set.

use tracing::debug;

use super::{Pipeline, decorate};
use crate::appointment::{AppointmentAdapter, RawAppointment};
use crate::geometry::Coordinate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseStrategy;

impl BaseStrategy {
    /// Resources are resolved once and shared by every occurrence.
    pub(crate) fn create<'r>(
        &self,
        pipeline: &Pipeline<'_>,
        raw: &'r RawAppointment,
    ) -> Vec<Coordinate<'r>> {
        let adapter = AppointmentAdapter::new(raw);
        let resources = pipeline.resources(raw);
        let is_all_day = pipeline.is_all_day(&adapter);
        let geometry = pipeline.geometry();

        let occurrences = pipeline.build_occurrences(&adapter);
        let projected = pipeline.project(occurrences, &adapter);
        let cropped = pipeline.crop_to_view_start(projected, &adapter);
        let parts = pipeline.split_long_occurrences(cropped, &adapter);

        let coordinates: Vec<Coordinate<'r>> = parts
            .into_iter()
            .flat_map(|occurrence| {
                geometry
                    .coordinates_by_date_in_group(
                        occurrence.start_date,
                        &resources,
                        is_all_day,
                        None,
                    )
                    .into_iter()
                    .map(move |position| decorate(position, occurrence, raw))
            })
            .collect();

        debug!(
            id = raw.id.as_deref().unwrap_or("-"),
            count = coordinates.len(),
            "resolved appointment"
        );
        coordinates
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, Timelike};

    use super::*;
    use crate::engine::tests::Fixture;
    use crate::grid::Group;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn week() -> Fixture {
        Fixture::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 7)
    }

    #[test]
    fn test_single_appointment_resolves_to_one_coordinate() {
        let fixture = week();
        let raw = RawAppointment::new("Lunch", at(3, 12, 0), at(3, 13, 0));

        let coordinates = BaseStrategy.create(&fixture.pipeline(), &raw);

        assert_eq!(coordinates.len(), 1);
        let coordinate = &coordinates[0];
        assert_eq!(coordinate.info.appointment.start_date, at(3, 12, 0));
        assert_eq!(coordinate.position.column_index, 2);
        assert_eq!(coordinate.position.row_index, 24);
        assert!(std::ptr::eq(coordinate.info.source_appointment, &raw));
    }

    #[test]
    fn test_shared_resources_fan_out_to_every_matching_group() {
        let fixture = week().with_groups(vec![
            Group::new("room", "a"),
            Group::new("room", "b"),
            Group::new("room", "c"),
        ]);
        let raw = RawAppointment::new("Cleaning", at(2, 9, 0), at(2, 10, 0))
            .with_resource("room", &["a", "c"]);

        let coordinates = BaseStrategy.create(&fixture.pipeline(), &raw);

        let groups: Vec<usize> = coordinates.iter().map(|c| c.position.group_index).collect();
        assert_eq!(groups, vec![0, 2]);
    }

    #[test]
    fn test_appointment_before_the_day_starts_is_moved_to_it() {
        let fixture = week().with_day_hours(8.0, 18.0);
        let raw = RawAppointment::new("Early", at(4, 6, 0), at(4, 9, 0));

        let coordinates = BaseStrategy.create(&fixture.pipeline(), &raw);

        assert_eq!(coordinates.len(), 1);
        assert_eq!(coordinates[0].info.appointment.start_date.hour(), 8);
        assert_eq!(coordinates[0].position.row_index, 0);
    }

    #[test]
    fn test_recurring_appointment_yields_one_coordinate_per_day() {
        let fixture = week();
        let raw = RawAppointment::new("Standup", at(1, 9, 0), at(1, 9, 15))
            .with_rule("FREQ=DAILY;COUNT=3");

        let coordinates = BaseStrategy.create(&fixture.pipeline(), &raw);

        let columns: Vec<usize> = coordinates.iter().map(|c| c.position.column_index).collect();
        assert_eq!(columns, vec![0, 1, 2]);
    }
}
