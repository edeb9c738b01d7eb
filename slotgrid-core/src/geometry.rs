//! Grid geometry: the seam between layout resolution and rendering.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::appointment::RawAppointment;
use crate::date_range::DateRange;
use crate::occurrence::GridOccurrence;
use crate::resources::ResourceAssignment;

/// A cell position reported by a [`GeometryProvider`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub top: f64,
    pub left: f64,
    pub row_index: usize,
    pub column_index: usize,
    pub group_index: usize,
    pub all_day: bool,
}

/// What a coordinate was resolved from.
#[derive(Debug, Clone, Serialize)]
pub struct CoordinateInfo<'a> {
    pub appointment: GridOccurrence,
    pub source_appointment: &'a RawAppointment,
}

/// A renderable appointment instance.
#[derive(Debug, Clone, Serialize)]
pub struct Coordinate<'a> {
    #[serde(flatten)]
    pub position: Position,
    pub info: CoordinateInfo<'a>,
}

/// Read-only view metadata and date -> position lookup.
///
/// All dates are grid wall-clock.
pub trait GeometryProvider {
    fn date_range(&self) -> DateRange;

    /// First date shown by the view.
    fn start_view_date(&self) -> NaiveDateTime {
        self.date_range().min
    }

    /// Length of one layout interval for the given row type.
    fn interval_duration(&self, all_day: bool) -> Duration;

    fn supports_all_day_row(&self) -> bool;

    /// Number of groups configured on the view (0 when ungrouped).
    fn group_count(&self) -> usize;

    /// Groups an appointment's resources map to.
    fn group_indices_for(&self, resources: &[ResourceAssignment]) -> Vec<usize>;

    /// Groups currently held by the view.
    fn group_indices(&self) -> Vec<usize>;

    fn group_start_date(&self, group_index: usize) -> Option<NaiveDateTime>;

    /// Start of the first rendered cell of a group that `[start, end)` touches.
    fn find_group_cell_start_date(
        &self,
        group_index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
        all_day: bool,
    ) -> Option<NaiveDateTime>;

    fn is_group_intersect_date_interval(
        &self,
        group_index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> bool;

    fn coordinates_by_date_in_group(
        &self,
        date: NaiveDateTime,
        resources: &[ResourceAssignment],
        all_day: bool,
        group_index: Option<usize>,
    ) -> Vec<Position>;

    fn coordinates_by_date(
        &self,
        date: NaiveDateTime,
        group_index: usize,
        all_day: bool,
    ) -> Option<Position>;
}
