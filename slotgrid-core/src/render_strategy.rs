//! Render strategy flags that govern long-appointment splitting.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::appointment::RawAppointment;

pub trait RenderStrategy {
    /// Whether an appointment spanning several intervals is drawn as one
    /// part per interval.
    fn need_separate_appointment(&self, all_day: bool) -> bool;

    /// Clamp an end date to the view's end.
    fn normalize_end_date_by_view_end(
        &self,
        raw: &RawAppointment,
        end: NaiveDateTime,
    ) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Day,
    Week,
    Month,
    Timeline,
}

/// Render strategy of the built-in view kinds.
///
/// Only month views break long appointments into per-cell parts.
#[derive(Debug, Clone, Copy)]
pub struct ViewRenderStrategy {
    kind: ViewKind,
    view_end: NaiveDateTime,
}

impl ViewRenderStrategy {
    pub fn new(kind: ViewKind, view_end: NaiveDateTime) -> Self {
        ViewRenderStrategy { kind, view_end }
    }

    pub fn kind(&self) -> ViewKind {
        self.kind
    }
}

impl RenderStrategy for ViewRenderStrategy {
    fn need_separate_appointment(&self, _all_day: bool) -> bool {
        self.kind == ViewKind::Month
    }

    fn normalize_end_date_by_view_end(
        &self,
        _raw: &RawAppointment,
        end: NaiveDateTime,
    ) -> NaiveDateTime {
        end.min(self.view_end)
    }
}
