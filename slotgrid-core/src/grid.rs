//! A uniform day/cell grid used as the reference [`GeometryProvider`].
//!
//! Columns are days, repeated once per group left to right. Rows are
//! fixed-length cells between the start and end day hours, below an
//! optional all-day row. Each group may be limited to a rendered
//! sub-window to model virtual scrolling.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::dates::{DAY, minutes_from_decimal_hour, trim_time};
use crate::error::{SlotGridError, SlotGridResult};
use crate::geometry::{GeometryProvider, Position};
use crate::resources::ResourceAssignment;

const DEFAULT_DAYS: u32 = 7;
const DEFAULT_CELL_DURATION: &str = "30m";
const DEFAULT_CELL_WIDTH: f64 = 100.0;
const DEFAULT_CELL_HEIGHT: f64 = 50.0;
const DEFAULT_ALL_DAY_HEIGHT: f64 = 25.0;

/// One group column block, keyed by a resource id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub resource: String,
    pub id: String,
}

impl Group {
    pub fn new(resource: &str, id: &str) -> Self {
        Group {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

/// The part of one group currently rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupWindow {
    pub group: usize,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

fn default_days() -> u32 {
    DEFAULT_DAYS
}

fn default_end_day_hour() -> f64 {
    24.0
}

fn default_cell_duration() -> String {
    DEFAULT_CELL_DURATION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_cell_width() -> f64 {
    DEFAULT_CELL_WIDTH
}

fn default_cell_height() -> f64 {
    DEFAULT_CELL_HEIGHT
}

fn default_all_day_height() -> f64 {
    DEFAULT_ALL_DAY_HEIGHT
}

/// Grid description as found in a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSettings {
    pub start_date: NaiveDate,
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default)]
    pub start_day_hour: f64,
    #[serde(default = "default_end_day_hour")]
    pub end_day_hour: f64,
    /// humantime duration, e.g. `"30m"` or `"1day"`
    #[serde(default = "default_cell_duration")]
    pub cell_duration: String,
    #[serde(default = "default_true")]
    pub all_day_row: bool,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_groups: Option<Vec<usize>>,
    #[serde(default)]
    pub windows: Vec<GroupWindow>,
    #[serde(default = "default_cell_width")]
    pub cell_width: f64,
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
    #[serde(default = "default_all_day_height")]
    pub all_day_height: f64,
}

#[derive(Debug, Clone)]
pub struct UniformGrid {
    start_date: NaiveDate,
    days: u32,
    /// Minutes after midnight
    day_start: u32,
    day_end: u32,
    cell: Duration,
    all_day_row: bool,
    groups: Vec<Group>,
    rendered_groups: Option<Vec<usize>>,
    windows: BTreeMap<usize, DateRange>,
    cell_width: f64,
    cell_height: f64,
    all_day_height: f64,
}

impl UniformGrid {
    pub fn new(start_date: NaiveDate, days: u32) -> Self {
        UniformGrid {
            start_date,
            days: days.max(1),
            day_start: 0,
            day_end: 24 * 60,
            cell: Duration::minutes(30),
            all_day_row: true,
            groups: Vec::new(),
            rendered_groups: None,
            windows: BTreeMap::new(),
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            all_day_height: DEFAULT_ALL_DAY_HEIGHT,
        }
    }

    pub fn from_settings(settings: &GridSettings) -> SlotGridResult<Self> {
        if settings.days == 0 {
            return Err(SlotGridError::Grid("a grid needs at least one day".into()));
        }
        if settings.end_day_hour <= settings.start_day_hour {
            return Err(SlotGridError::Grid(format!(
                "end_day_hour ({}) must be after start_day_hour ({})",
                settings.end_day_hour, settings.start_day_hour
            )));
        }

        let cell = humantime::parse_duration(&settings.cell_duration)
            .map_err(|e| {
                SlotGridError::Grid(format!("cell_duration '{}': {}", settings.cell_duration, e))
            })
            .and_then(|d| {
                Duration::from_std(d).map_err(|e| SlotGridError::Grid(e.to_string()))
            })?;
        if cell < Duration::minutes(1) {
            return Err(SlotGridError::Grid("cell_duration must be at least one minute".into()));
        }

        let mut grid = UniformGrid::new(settings.start_date, settings.days)
            .with_day_hours(settings.start_day_hour, settings.end_day_hour)
            .with_cell_duration(cell)
            .with_all_day_row(settings.all_day_row)
            .with_groups(settings.groups.clone());

        if let Some(rendered) = &settings.rendered_groups {
            grid = grid.with_rendered_groups(rendered.clone());
        }
        for window in &settings.windows {
            grid = grid.with_window(window.group, DateRange::new(window.from, window.to));
        }

        grid.cell_width = settings.cell_width;
        grid.cell_height = settings.cell_height;
        grid.all_day_height = settings.all_day_height;

        Ok(grid)
    }

    pub fn with_day_hours(mut self, start: f64, end: f64) -> Self {
        self.day_start = minutes_from_decimal_hour(start);
        self.day_end = minutes_from_decimal_hour(end).max(self.day_start + 1);
        self
    }

    pub fn with_cell_duration(mut self, cell: Duration) -> Self {
        self.cell = cell.max(Duration::minutes(1));
        self
    }

    pub fn with_all_day_row(mut self, all_day_row: bool) -> Self {
        self.all_day_row = all_day_row;
        self
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self
    }

    /// Restrict the view to these groups (virtual scrolling).
    pub fn with_rendered_groups(mut self, groups: Vec<usize>) -> Self {
        self.rendered_groups = Some(groups);
        self
    }

    /// Restrict one group to part of the date range (virtual scrolling).
    pub fn with_window(mut self, group_index: usize, window: DateRange) -> Self {
        self.windows.insert(group_index, window);
        self
    }

    fn midnight(date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
    }

    fn day_offset(&self, date: NaiveDate) -> Option<i64> {
        let offset = (date - self.start_date).num_days();
        (0..self.days as i64).contains(&offset).then_some(offset)
    }

    fn day_start_on(&self, date: NaiveDate) -> NaiveDateTime {
        Self::midnight(date) + Duration::minutes(self.day_start as i64)
    }

    fn is_rendered(&self, group_index: usize) -> bool {
        match &self.rendered_groups {
            Some(rendered) => rendered.contains(&group_index),
            None => group_index < self.groups.len().max(1),
        }
    }

    fn window(&self, group_index: usize) -> DateRange {
        self.windows
            .get(&group_index)
            .copied()
            .unwrap_or_else(|| self.date_range())
    }

    /// Start of the cell containing `from`, or of the next cell when `from`
    /// falls outside the day hours.
    fn cell_at_or_after(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        let date = from.date();
        let day = self.day_offset(date)?;
        let seconds_of_day = (from - Self::midnight(date)).num_seconds();
        let day_start = self.day_start as i64 * 60;
        let day_end = self.day_end as i64 * 60;

        if seconds_of_day < day_start {
            return Some(self.day_start_on(date));
        }
        if seconds_of_day >= day_end {
            let next = date.succ_opt()?;
            return (day + 1 < self.days as i64).then(|| self.day_start_on(next));
        }

        let cell_seconds = self.cell.num_seconds().max(60);
        let row = (seconds_of_day - day_start) / cell_seconds;
        Some(self.day_start_on(date) + Duration::seconds(row * cell_seconds))
    }
}

impl GeometryProvider for UniformGrid {
    fn date_range(&self) -> DateRange {
        let last_day = self.start_date + Duration::days(self.days as i64 - 1);
        DateRange::new(
            self.day_start_on(self.start_date),
            Self::midnight(last_day) + Duration::minutes(self.day_end as i64),
        )
    }

    fn interval_duration(&self, all_day: bool) -> Duration {
        if all_day { DAY } else { self.cell }
    }

    fn supports_all_day_row(&self) -> bool {
        self.all_day_row
    }

    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn group_indices_for(&self, resources: &[ResourceAssignment]) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, group)| resources.iter().any(|r| r.contains(&group.resource, &group.id)))
            .map(|(index, _)| index)
            .collect()
    }

    fn group_indices(&self) -> Vec<usize> {
        match &self.rendered_groups {
            Some(rendered) => rendered.clone(),
            None => (0..self.groups.len().max(1)).collect(),
        }
    }

    fn group_start_date(&self, group_index: usize) -> Option<NaiveDateTime> {
        self.is_rendered(group_index)
            .then(|| self.window(group_index).min)
    }

    fn find_group_cell_start_date(
        &self,
        group_index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
        all_day: bool,
    ) -> Option<NaiveDateTime> {
        if !self.is_rendered(group_index) {
            return None;
        }

        let window = self.window(group_index);

        if all_day {
            let first_day = trim_time(window.min);
            return (start < window.max && end > first_day).then(|| start.max(first_day));
        }

        let range = self.date_range();
        let from = start.max(window.min).max(range.min);
        let limit = end.min(window.max).min(range.max);
        if from >= limit {
            return None;
        }

        self.cell_at_or_after(from).filter(|cell_start| *cell_start < limit)
    }

    fn is_group_intersect_date_interval(
        &self,
        group_index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> bool {
        self.is_rendered(group_index) && self.window(group_index).intersects(start, end)
    }

    fn coordinates_by_date_in_group(
        &self,
        date: NaiveDateTime,
        resources: &[ResourceAssignment],
        all_day: bool,
        group_index: Option<usize>,
    ) -> Vec<Position> {
        let indices = match group_index {
            Some(index) => vec![index],
            None => {
                let matched = self.group_indices_for(resources);
                if matched.is_empty() { vec![0] } else { matched }
            }
        };

        indices
            .into_iter()
            .filter_map(|index| self.coordinates_by_date(date, index, all_day))
            .collect()
    }

    fn coordinates_by_date(
        &self,
        date: NaiveDateTime,
        group_index: usize,
        all_day: bool,
    ) -> Option<Position> {
        if !self.is_rendered(group_index) {
            return None;
        }

        let window = self.window(group_index);
        let day = self.day_offset(date.date())?;
        let column_index = group_index * self.days as usize + day as usize;
        let left = column_index as f64 * self.cell_width;

        if all_day && self.all_day_row {
            if date.date() < window.min.date() || date >= window.max {
                return None;
            }
            return Some(Position {
                top: 0.0,
                left,
                row_index: 0,
                column_index,
                group_index,
                all_day: true,
            });
        }

        if date < window.min || date >= window.max {
            return None;
        }

        let seconds_of_day = (date - Self::midnight(date.date())).num_seconds();
        let offset = seconds_of_day - self.day_start as i64 * 60;
        if offset < 0 || seconds_of_day >= self.day_end as i64 * 60 {
            return None;
        }

        let cell_seconds = self.cell.num_seconds().max(60);
        let row_index = (offset / cell_seconds) as usize;
        let within_cell = (offset % cell_seconds) as f64 / cell_seconds as f64;
        let header = if self.all_day_row { self.all_day_height } else { 0.0 };

        Some(Position {
            top: header + (row_index as f64 + within_cell) * self.cell_height,
            left,
            row_index,
            column_index,
            group_index,
            all_day: false,
        })
    }
}
