//! Appointment records and the read view used by the layout pipeline.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An appointment as supplied by the caller.
///
/// Dates are wall-clock readings in the appointment's native time zone.
/// Fields the engine does not understand are kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAppointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub all_day: bool,

    // Recurrence fields
    /// RRULE body, e.g. `FREQ=DAILY;COUNT=5`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<String>,
    /// Comma separated list of excluded occurrence starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_exception: Option<String>,

    /// Resource field name -> assigned resource ids (e.g. `room -> [a, b]`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Vec<String>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawAppointment {
    pub fn new(text: &str, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        RawAppointment {
            id: None,
            text: text.to_string(),
            start_date,
            end_date,
            all_day: false,
            recurrence_rule: None,
            recurrence_exception: None,
            resources: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_rule(mut self, rule: &str) -> Self {
        self.recurrence_rule = Some(rule.to_string());
        self
    }

    pub fn with_exception(mut self, exception: &str) -> Self {
        self.recurrence_exception = Some(exception.to_string());
        self
    }

    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn with_resource(mut self, field: &str, ids: &[&str]) -> Self {
        self.resources
            .insert(field.to_string(), ids.iter().map(|id| id.to_string()).collect());
        self
    }
}

/// Read-only view over a [`RawAppointment`], built once per layout call.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentAdapter<'a> {
    raw: &'a RawAppointment,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
}

impl<'a> AppointmentAdapter<'a> {
    /// An end before the start is read as a zero-length appointment.
    pub fn new(raw: &'a RawAppointment) -> Self {
        let end_date = raw.end_date.max(raw.start_date);
        AppointmentAdapter {
            raw,
            start_date: raw.start_date,
            end_date,
        }
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDateTime {
        self.end_date
    }

    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }

    pub fn recurrence_rule(&self) -> Option<&'a str> {
        self.raw
            .recurrence_rule
            .as_deref()
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
    }

    pub fn recurrence_exception(&self) -> Option<&'a str> {
        self.raw
            .recurrence_exception
            .as_deref()
            .map(str::trim)
            .filter(|exception| !exception.is_empty())
    }

    pub fn is_recurrent(&self) -> bool {
        self.recurrence_rule().is_some()
    }

    pub fn takes_all_day(&self) -> bool {
        self.raw.all_day
    }

    pub fn source(&self) -> &'a RawAppointment {
        self.raw
    }
}
