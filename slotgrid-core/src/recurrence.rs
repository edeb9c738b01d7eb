//! RRULE expansion for recurring appointments.
//!
//! Occurrences are generated on the wall clock: DTSTART is handed to the
//! rrule crate as a UTC value so the clock reading of each occurrence is
//! never moved by a DST transition.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use rrule::RRuleSet;
use tracing::{trace, warn};

use crate::error::{SlotGridError, SlotGridResult};
use crate::timezone::resolve_local;

pub const DEFAULT_RECURRENCE_LIMIT: u16 = 1000;

/// Everything needed to expand one recurring appointment inside a window.
pub struct RecurrenceOptions<'a> {
    pub rule: &'a str,
    pub exception: Option<&'a str>,
    /// Window in the appointment's own frame
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
    pub first_day_of_week: Weekday,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Re-expresses an exception date in the appointment's own offset
    pub exception_transform: &'a dyn Fn(NaiveDateTime) -> NaiveDateTime,
}

impl RecurrenceOptions<'_> {
    pub fn duration(&self) -> Duration {
        (self.end - self.start).max(Duration::zero())
    }

    pub fn transform_exception(&self, date: NaiveDateTime) -> NaiveDateTime {
        (self.exception_transform)(date)
    }
}

/// Pure date generation for a recurrence rule.
pub trait RecurrenceExpander {
    /// Ascending occurrence starts whose interval touches `[min, max]`,
    /// excluding exception dates.
    fn generate_dates(&self, options: &RecurrenceOptions<'_>) -> Vec<NaiveDateTime>;
}

/// `RecurrenceExpander` backed by the rrule crate.
#[derive(Debug, Clone)]
pub struct RRuleExpander {
    /// Zone used to read UTC (`Z` suffixed) exception dates
    native: Tz,
    limit: u16,
}

impl Default for RRuleExpander {
    fn default() -> Self {
        RRuleExpander {
            native: Tz::UTC,
            limit: DEFAULT_RECURRENCE_LIMIT,
        }
    }
}

impl RRuleExpander {
    pub fn new(native: Tz, limit: u16) -> Self {
        RRuleExpander { native, limit }
    }

    fn expand(&self, options: &RecurrenceOptions<'_>) -> SlotGridResult<Vec<NaiveDateTime>> {
        let rrule_set: RRuleSet = build_rrule_string(options)
            .parse()
            .map_err(|e| SlotGridError::RecurrenceRule(format!("'{}': {}", options.rule, e)))?;

        let duration = options.duration();
        let exceptions: Vec<NaiveDateTime> = options
            .exception
            .map(|list| self.parse_exceptions(list))
            .unwrap_or_default()
            .into_iter()
            .map(|date| options.transform_exception(date))
            .collect();

        // Widen by one second on both ends; the window filter below is exact.
        let tz: rrule::Tz = Utc.into();
        let after = (options.min - duration - Duration::seconds(1)).and_utc().with_timezone(&tz);
        let before = (options.max + Duration::seconds(1)).and_utc().with_timezone(&tz);

        let result = rrule_set.after(after).before(before).all(self.limit);
        if result.limited {
            warn!(
                rule = options.rule,
                limit = self.limit,
                "recurrence expansion hit the occurrence limit"
            );
        }

        let mut dates: Vec<NaiveDateTime> = result
            .dates
            .iter()
            .map(|dt| dt.naive_utc())
            .filter(|start| touches_window(*start, duration, options.min, options.max))
            .filter(|start| !exceptions.contains(start))
            .collect();
        dates.sort();
        dates.dedup();

        trace!(rule = options.rule, count = dates.len(), "expanded recurrence");
        Ok(dates)
    }

    fn parse_exceptions(&self, list: &str) -> Vec<NaiveDateTime> {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .filter_map(|item| match parse_exception_date(item, self.native) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(exception = item, error = %e, "skipping unreadable recurrence exception");
                    None
                }
            })
            .collect()
    }
}

impl RecurrenceExpander for RRuleExpander {
    fn generate_dates(&self, options: &RecurrenceOptions<'_>) -> Vec<NaiveDateTime> {
        match self.expand(options) {
            Ok(dates) => dates,
            Err(e) => {
                warn!(error = %e, "recurrence rule produced no occurrences");
                Vec::new()
            }
        }
    }
}

fn touches_window(
    start: NaiveDateTime,
    duration: Duration,
    min: NaiveDateTime,
    max: NaiveDateTime,
) -> bool {
    start <= max && (start >= min || start + duration > min)
}

/// Build an iCalendar-format rule set string for the rrule crate parser.
fn build_rrule_string(options: &RecurrenceOptions<'_>) -> String {
    let dtstart = format!("DTSTART:{}Z", options.start.format("%Y%m%dT%H%M%S"));
    let rule = normalize_rule(options.rule, options.first_day_of_week);
    format!("{dtstart}\nRRULE:{rule}")
}

/// Strip an `RRULE:` prefix, force UNTIL into UTC form and add WKST when the
/// rule does not carry one.
fn normalize_rule(rule: &str, first_day_of_week: Weekday) -> String {
    let body = rule.trim();
    let body = body.strip_prefix("RRULE:").unwrap_or(body);

    let mut parts: Vec<String> = body
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((key, value)) if key.eq_ignore_ascii_case("UNTIL") => {
                format!("UNTIL={}", normalize_until(value))
            }
            _ => part.to_string(),
        })
        .collect();

    let has_wkst = parts
        .iter()
        .any(|part| part.to_ascii_uppercase().starts_with("WKST="));
    if !has_wkst {
        parts.push(format!("WKST={}", weekday_code(first_day_of_week)));
    }

    parts.join(";")
}

fn normalize_until(value: &str) -> String {
    let value = value.trim();
    if value.len() == 8 {
        format!("{value}T235959Z")
    } else if value.ends_with('Z') {
        value.to_string()
    } else {
        format!("{value}Z")
    }
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Parse one exception entry: `YYYYMMDDTHHMMSS`, `YYYYMMDDTHHMMSSZ` or `YYYYMMDD`.
///
/// `Z` suffixed values are UTC and are read back as wall-clock in `native`.
pub fn parse_exception_date(value: &str, native: Tz) -> SlotGridResult<NaiveDateTime> {
    let value = value.trim();

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S")
            .map_err(|e| SlotGridError::DateParse(format!("{value}: {e}")))?;
        let instant: DateTime<Utc> = naive.and_utc();
        return Ok(instant.with_timezone(&native).naive_local());
    }

    if value.len() == 8 {
        return NaiveDate::parse_from_str(value, "%Y%m%d")
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|e| SlotGridError::DateParse(format!("{value}: {e}")));
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map_err(|e| SlotGridError::DateParse(format!("{value}: {e}")))?;
    // Round-trip through the zone so gap readings land on a real instant.
    Ok(resolve_local(&native, naive).naive_local())
}
