//! Appointment layout resolution.
//!
//! `LayoutEngine::create` turns one raw appointment into the grid
//! coordinates it should be drawn at:
//!
//! occurrences -> grid projection -> view cropping -> (splitting) -> coordinates
//!
//! Two strategies share those steps. `Base` resolves against a single fixed
//! group set. `Virtual` is used for virtual scrolling: occurrences are built
//! per group and anything outside a group's rendered window is dropped
//! before coordinates are looked up.

mod base;
mod builder;
mod cropper;
mod projector;
mod splitter;
mod virtualized;

pub use base::BaseStrategy;
pub use virtualized::VirtualStrategy;

use crate::appointment::{AppointmentAdapter, RawAppointment};
use crate::geometry::{Coordinate, CoordinateInfo, GeometryProvider, Position};
use crate::occurrence::GridOccurrence;
use crate::recurrence::RecurrenceExpander;
use crate::render_strategy::RenderStrategy;
use crate::resources::{ResourceAssignment, ResourceManager};
use crate::settings::LayoutSettings;
use crate::timezone::TimezoneTranslator;

/// Read-only collaborators the engine resolves against.
///
/// They must not change state while a `create` call is running.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub timezone: &'a dyn TimezoneTranslator,
    pub recurrence: &'a dyn RecurrenceExpander,
    pub resources: &'a dyn ResourceManager,
    pub geometry: &'a dyn GeometryProvider,
    pub render: &'a dyn RenderStrategy,
}

/// Steps shared by both strategies.
pub(crate) struct Pipeline<'a> {
    deps: Collaborators<'a>,
    settings: LayoutSettings,
}

impl<'a> Pipeline<'a> {
    fn timezone(&self) -> &'a dyn TimezoneTranslator {
        self.deps.timezone
    }

    fn geometry(&self) -> &'a dyn GeometryProvider {
        self.deps.geometry
    }

    fn resources(&self, raw: &RawAppointment) -> Vec<ResourceAssignment> {
        self.deps.resources.resources_from_item(raw)
    }

    /// All-day for layout purposes: the appointment takes whole days and the
    /// view has a row to put it in.
    fn is_all_day(&self, adapter: &AppointmentAdapter<'_>) -> bool {
        adapter.takes_all_day() && self.geometry().supports_all_day_row()
    }
}

fn decorate<'r>(
    position: Position,
    appointment: GridOccurrence,
    raw: &'r RawAppointment,
) -> Coordinate<'r> {
    Coordinate {
        position,
        info: CoordinateInfo {
            appointment,
            source_appointment: raw,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStrategy {
    Base(BaseStrategy),
    Virtual(VirtualStrategy),
}

impl LayoutStrategy {
    pub fn for_settings(settings: &LayoutSettings) -> Self {
        if settings.virtual_scrolling {
            LayoutStrategy::Virtual(VirtualStrategy)
        } else {
            LayoutStrategy::Base(BaseStrategy)
        }
    }

    fn create<'r>(&self, pipeline: &Pipeline<'_>, raw: &'r RawAppointment) -> Vec<Coordinate<'r>> {
        match self {
            LayoutStrategy::Base(strategy) => strategy.create(pipeline, raw),
            LayoutStrategy::Virtual(strategy) => strategy.create(pipeline, raw),
        }
    }
}

pub struct LayoutEngine<'a> {
    pipeline: Pipeline<'a>,
    strategy: LayoutStrategy,
}

impl<'a> LayoutEngine<'a> {
    /// The strategy is picked once, from `settings.virtual_scrolling`.
    pub fn new(deps: Collaborators<'a>, settings: LayoutSettings) -> Self {
        let strategy = LayoutStrategy::for_settings(&settings);
        LayoutEngine {
            pipeline: Pipeline { deps, settings },
            strategy,
        }
    }

    pub fn strategy(&self) -> LayoutStrategy {
        self.strategy
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.pipeline.settings
    }

    /// Resolve an appointment into the coordinates it is visible at.
    ///
    /// Never fails: occurrences that cannot be placed are left out, so an
    /// empty result means "not visible".
    pub fn create<'r>(&self, raw: &'r RawAppointment) -> Vec<Coordinate<'r>> {
        self.strategy.create(&self.pipeline, raw)
    }

    /// Occurrences of an appointment in grid time, before any cropping.
    pub fn occurrences(&self, raw: &RawAppointment) -> Vec<GridOccurrence> {
        let adapter = AppointmentAdapter::new(raw);
        let occurrences = self.pipeline.build_occurrences(&adapter);
        self.pipeline.project(occurrences, &adapter)
    }
}
