//! Translation between an appointment's native time and grid time.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::dates::HOUR;
use crate::error::{SlotGridError, SlotGridResult};

/// UTC offsets in effect at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offsets {
    /// Offset of the native (appointment) zone
    pub native: FixedOffset,
    /// Offset of the grid display zone
    pub grid: FixedOffset,
}

impl Offsets {
    pub fn is_equal(&self) -> bool {
        self.native == self.grid
    }
}

/// Offset lookup and native <-> grid date conversion.
///
/// Implementations must answer consistently for the duration of one layout
/// call; the engine asks for the same instant more than once.
pub trait TimezoneTranslator {
    /// Offsets in effect at the native wall-clock `date`.
    fn offsets(&self, date: NaiveDateTime) -> Offsets;

    /// Native wall-clock -> grid wall-clock.
    fn to_grid(&self, date: NaiveDateTime) -> NaiveDateTime;

    /// Grid wall-clock -> native wall-clock.
    fn from_grid(&self, date: NaiveDateTime) -> NaiveDateTime;
}

/// `TimezoneTranslator` backed by IANA zones.
///
/// Without a grid zone the grid shows native time unchanged.
#[derive(Debug, Clone, Copy)]
pub struct ZoneTranslator {
    native: Tz,
    grid: Option<Tz>,
}

impl ZoneTranslator {
    pub fn new(native: Tz, grid: Option<Tz>) -> Self {
        ZoneTranslator { native, grid }
    }

    /// Build from zone names, e.g. `("Europe/Berlin", Some("America/New_York"))`.
    pub fn from_names(native: &str, grid: Option<&str>) -> SlotGridResult<Self> {
        let native = parse_zone(native)?;
        let grid = grid.map(parse_zone).transpose()?;
        Ok(ZoneTranslator { native, grid })
    }

    pub fn native(&self) -> Tz {
        self.native
    }

    pub fn grid(&self) -> Option<Tz> {
        self.grid
    }
}

impl TimezoneTranslator for ZoneTranslator {
    fn offsets(&self, date: NaiveDateTime) -> Offsets {
        let instant = resolve_local(&self.native, date);
        let native = instant.offset().fix();
        let grid = match self.grid {
            Some(grid) => instant.with_timezone(&grid).offset().fix(),
            None => native,
        };
        Offsets { native, grid }
    }

    fn to_grid(&self, date: NaiveDateTime) -> NaiveDateTime {
        match self.grid {
            Some(grid) => resolve_local(&self.native, date)
                .with_timezone(&grid)
                .naive_local(),
            None => date,
        }
    }

    fn from_grid(&self, date: NaiveDateTime) -> NaiveDateTime {
        match self.grid {
            Some(grid) => resolve_local(&grid, date)
                .with_timezone(&self.native)
                .naive_local(),
            None => date,
        }
    }
}

pub fn parse_zone(name: &str) -> SlotGridResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SlotGridError::TimeZone(name.to_string()))
}

/// Pin a wall-clock reading to an instant in `zone`.
///
/// Ambiguous readings (fall-back) take the earlier instant; readings inside
/// a spring-forward gap are pushed past the gap.
pub fn resolve_local<Z: TimeZone>(zone: &Z, date: NaiveDateTime) -> DateTime<Z> {
    match zone.from_local_datetime(&date) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => zone
            .from_local_datetime(&(date + HOUR))
            .earliest()
            .unwrap_or_else(|| zone.from_utc_datetime(&date)),
    }
}
