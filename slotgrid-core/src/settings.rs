//! Layout settings.
//!
//! Loaded the same way as the rest of the workspace's configuration: an
//! optional TOML file, then `SLOTGRID_*` environment variables on top.

use std::path::Path;

use chrono::{NaiveTime, Weekday};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::dates::time_from_decimal_hour;
use crate::error::{SlotGridError, SlotGridResult};
use crate::recurrence::DEFAULT_RECURRENCE_LIMIT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Grid display zone (IANA name). Unset means the grid shows native time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// First displayed hour of a day, decimal (`8.5` = 08:30)
    pub start_day_hour: f64,
    /// 0 = Sunday .. 6 = Saturday
    pub first_day_of_week: u8,
    pub virtual_scrolling: bool,
    /// Upper bound on occurrences generated per expansion
    pub recurrence_limit: u16,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            time_zone: None,
            start_day_hour: 0.0,
            first_day_of_week: 0,
            virtual_scrolling: false,
            recurrence_limit: DEFAULT_RECURRENCE_LIMIT,
        }
    }
}

impl LayoutSettings {
    /// Load settings from an optional TOML file and `SLOTGRID_*` env vars.
    pub fn load(path: Option<&Path>) -> SlotGridResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings: LayoutSettings = builder
            .add_source(Environment::with_prefix("SLOTGRID").try_parsing(true))
            .build()
            .map_err(|e| SlotGridError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SlotGridError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> SlotGridResult<()> {
        if !(0.0..24.0).contains(&self.start_day_hour) {
            return Err(SlotGridError::Config(format!(
                "start_day_hour must be within 0..24, got {}",
                self.start_day_hour
            )));
        }
        if self.first_day_of_week > 6 {
            return Err(SlotGridError::Config(format!(
                "first_day_of_week must be within 0..=6, got {}",
                self.first_day_of_week
            )));
        }
        Ok(())
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn is_time_zone_set(&self) -> bool {
        self.time_zone().is_some()
    }

    pub fn start_day_time(&self) -> NaiveTime {
        time_from_decimal_hour(self.start_day_hour)
    }

    pub fn first_weekday(&self) -> Weekday {
        match self.first_day_of_week {
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            6 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}
