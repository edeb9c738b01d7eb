//! Concrete appointment instances flowing through the layout pipeline.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::dates::MINUTE;

/// One start/end pair in the appointment's native time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// Group the occurrence was expanded for (virtualized layouts only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_index: Option<usize>,
}

impl Occurrence {
    pub fn new(start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Occurrence {
            start_date,
            end_date,
            group_index: None,
        }
    }

    pub fn in_group(self, group_index: usize) -> Self {
        Occurrence {
            group_index: Some(group_index),
            ..self
        }
    }

    pub fn shifted(self, by: Duration) -> Self {
        Occurrence {
            start_date: self.start_date + by,
            end_date: self.end_date + by,
            ..self
        }
    }

    /// A zero-length occurrence gets one minute added to its end.
    pub fn non_degenerate(self) -> Self {
        if self.start_date == self.end_date {
            Occurrence {
                end_date: self.end_date + MINUTE,
                ..self
            }
        } else {
            self
        }
    }
}

/// An occurrence translated into grid-display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridOccurrence {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// The native occurrence this was projected (or split) from
    pub source: Occurrence,
}

impl GridOccurrence {
    pub fn group_index(&self) -> Option<usize> {
        self.source.group_index
    }

    pub fn with_start(self, start_date: NaiveDateTime) -> Self {
        GridOccurrence { start_date, ..self }
    }

    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }
}
