//! Appointment layout resolution for calendar and scheduler grids.
//!
//! [`LayoutEngine::create`] turns one appointment record, single or
//! recurring and possibly stored in a foreign time zone, into the list of
//! grid coordinates it should be drawn at. The engine only reads from its
//! collaborators ([`Collaborators`]); the crate ships reference
//! implementations of each:
//! - [`ZoneTranslator`] for time zone translation (chrono-tz)
//! - [`RRuleExpander`] for recurrence expansion (rrule)
//! - [`FieldResourceManager`] for resource lookup
//! - [`UniformGrid`] for grid geometry
//! - [`ViewRenderStrategy`] for long-appointment splitting

pub mod appointment;
pub mod date_range;
pub mod dates;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod occurrence;
pub mod recurrence;
pub mod render_strategy;
pub mod resources;
pub mod scenario;
pub mod settings;
pub mod timezone;

pub use appointment::{AppointmentAdapter, RawAppointment};
pub use date_range::DateRange;
pub use engine::{BaseStrategy, Collaborators, LayoutEngine, LayoutStrategy, VirtualStrategy};
pub use error::{SlotGridError, SlotGridResult};
pub use geometry::{Coordinate, CoordinateInfo, GeometryProvider, Position};
pub use grid::{Group, GridSettings, UniformGrid};
pub use occurrence::{GridOccurrence, Occurrence};
pub use recurrence::{RRuleExpander, RecurrenceExpander, RecurrenceOptions};
pub use render_strategy::{RenderStrategy, ViewKind, ViewRenderStrategy};
pub use resources::{FieldResourceManager, ResourceAssignment, ResourceManager};
pub use scenario::{Scenario, Workspace};
pub use settings::LayoutSettings;
pub use timezone::{Offsets, TimezoneTranslator, ZoneTranslator};
