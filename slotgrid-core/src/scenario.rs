//! Scenario files: settings, a grid description and appointments in one
//! TOML document.
//!
//! ```toml
//! native_time_zone = "Europe/Berlin"
//!
//! [settings]
//! time_zone = "America/New_York"
//!
//! [grid]
//! start_date = "2024-06-03"
//! days = 5
//! cell_duration = "30m"
//!
//! [view]
//! kind = "week"
//!
//! [[appointments]]
//! text = "Standup"
//! start_date = "2024-06-03T09:00:00"
//! end_date = "2024-06-03T09:15:00"
//! recurrence_rule = "FREQ=DAILY"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::appointment::RawAppointment;
use crate::engine::{Collaborators, LayoutEngine};
use crate::error::{SlotGridError, SlotGridResult};
use crate::geometry::GeometryProvider;
use crate::grid::{GridSettings, UniformGrid};
use crate::recurrence::RRuleExpander;
use crate::render_strategy::{ViewKind, ViewRenderStrategy};
use crate::resources::FieldResourceManager;
use crate::settings::LayoutSettings;
use crate::timezone::{ZoneTranslator, parse_zone};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default)]
    pub kind: ViewKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Zone appointment dates are written in. Falls back to the caller's zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_time_zone: Option<String>,

    /// Resource fields read off appointments. Empty means every field.
    #[serde(default)]
    pub resource_fields: Vec<String>,

    #[serde(default)]
    pub settings: LayoutSettings,

    pub grid: GridSettings,

    #[serde(default)]
    pub view: ViewSettings,

    #[serde(default)]
    pub appointments: Vec<RawAppointment>,
}

impl Scenario {
    pub fn load(path: &Path) -> SlotGridResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> SlotGridResult<Self> {
        let scenario: Scenario =
            toml::from_str(content).map_err(|e| SlotGridError::Scenario(e.to_string()))?;
        scenario.settings.validate()?;
        Ok(scenario)
    }

    /// Build the collaborators this scenario describes.
    ///
    /// `fallback_native` is used when the scenario names no native zone.
    pub fn workspace(&self, fallback_native: &str) -> SlotGridResult<Workspace> {
        let native_name = self.native_time_zone.as_deref().unwrap_or(fallback_native);
        let native = parse_zone(native_name)?;
        let grid_zone = self.settings.time_zone().map(parse_zone).transpose()?;

        let grid = UniformGrid::from_settings(&self.grid)?;
        let render = ViewRenderStrategy::new(self.view.kind, grid.date_range().max);

        debug!(
            native = %native,
            grid_zone = self.settings.time_zone().unwrap_or("-"),
            view = ?self.view.kind,
            "built scenario workspace"
        );

        Ok(Workspace {
            translator: ZoneTranslator::new(native, grid_zone),
            expander: RRuleExpander::new(native, self.settings.recurrence_limit),
            resources: FieldResourceManager::new(self.resource_fields.clone()),
            grid,
            render,
            settings: self.settings.clone(),
        })
    }
}

/// Owned collaborators for one scenario.
#[derive(Debug, Clone)]
pub struct Workspace {
    translator: ZoneTranslator,
    expander: RRuleExpander,
    resources: FieldResourceManager,
    grid: UniformGrid,
    render: ViewRenderStrategy,
    settings: LayoutSettings,
}

impl Workspace {
    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        Collaborators {
            timezone: &self.translator,
            recurrence: &self.expander,
            resources: &self.resources,
            geometry: &self.grid,
            render: &self.render,
        }
    }

    pub fn engine(&self) -> LayoutEngine<'_> {
        LayoutEngine::new(self.collaborators(), self.settings.clone())
    }
}
