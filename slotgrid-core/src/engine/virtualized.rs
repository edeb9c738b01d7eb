//! Resolution for virtual scrolling.
//!
//! Work is bounded by the rendered groups: occurrences are built per group,
//! and anything outside a group's rendered window is dropped before any
//! coordinate lookup.

use tracing::debug;

use super::builder::{ensure_non_degenerate, single_occurrence};
use super::{Pipeline, decorate};
use crate::appointment::{AppointmentAdapter, RawAppointment};
use crate::geometry::Coordinate;
use crate::occurrence::{GridOccurrence, Occurrence};
use crate::resources::ResourceAssignment;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualStrategy;

/// Rendered groups the appointment belongs to. Ungrouped items sit in group 0.
fn group_indices(pipeline: &Pipeline<'_>, resources: &[ResourceAssignment]) -> Vec<usize> {
    let geometry = pipeline.geometry();
    let mut indices = geometry.group_indices_for(resources);
    if indices.is_empty() {
        indices.push(0);
    }

    let rendered = geometry.group_indices();
    indices.retain(|index| rendered.contains(index));
    indices
}

impl VirtualStrategy {
    fn occurrences(
        &self,
        pipeline: &Pipeline<'_>,
        adapter: &AppointmentAdapter<'_>,
        groups: &[usize],
    ) -> Vec<Occurrence> {
        let geometry = pipeline.geometry();

        let occurrences = if adapter.is_recurrent() {
            if geometry.group_count() > 0 {
                groups
                    .iter()
                    .flat_map(|&index| pipeline.expand_recurrence(adapter, Some(index)))
                    .collect()
            } else {
                pipeline.expand_recurrence(adapter, Some(0))
            }
        } else {
            let single = single_occurrence(adapter);
            groups
                .iter()
                .filter(|&&index| geometry.group_start_date(index).is_some())
                .map(|&index| single.in_group(index))
                .collect()
        };

        ensure_non_degenerate(occurrences)
    }

    fn inside_rendered_window(&self, pipeline: &Pipeline<'_>, occurrence: &GridOccurrence) -> bool {
        pipeline.geometry().is_group_intersect_date_interval(
            occurrence.group_index().unwrap_or(0),
            occurrence.start_date,
            occurrence.end_date,
        )
    }

    pub(crate) fn create<'r>(
        &self,
        pipeline: &Pipeline<'_>,
        raw: &'r RawAppointment,
    ) -> Vec<Coordinate<'r>> {
        let adapter = AppointmentAdapter::new(raw);
        let resources = pipeline.resources(raw);
        let is_all_day = pipeline.is_all_day(&adapter);
        let geometry = pipeline.geometry();
        let groups = group_indices(pipeline, &resources);

        let occurrences = self.occurrences(pipeline, &adapter, &groups);
        let projected = pipeline.project(occurrences, &adapter);
        let cropped = pipeline.crop_to_group_cells(projected, &adapter, is_all_day);
        let mut parts = pipeline.split_long_occurrences(cropped, &adapter);

        if !is_all_day {
            parts.retain(|occurrence| self.inside_rendered_window(pipeline, occurrence));
        }

        let coordinates: Vec<Coordinate<'r>> = if adapter.is_recurrent() {
            parts
                .into_iter()
                .filter_map(|occurrence| {
                    let group_index = occurrence.group_index().unwrap_or(0);
                    geometry
                        .coordinates_by_date(occurrence.start_date, group_index, is_all_day)
                        .map(|position| decorate(position, occurrence, raw))
                })
                .collect()
        } else {
            parts
                .into_iter()
                .flat_map(|occurrence| {
                    geometry
                        .coordinates_by_date_in_group(
                            occurrence.start_date,
                            &resources,
                            is_all_day,
                            occurrence.group_index(),
                        )
                        .into_iter()
                        .map(move |position| decorate(position, occurrence, raw))
                })
                .collect()
        };

        debug!(
            id = raw.id.as_deref().unwrap_or("-"),
            groups = groups.len(),
            count = coordinates.len(),
            "resolved appointment"
        );
        coordinates
    }
}
