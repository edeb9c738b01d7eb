//! Terminal rendering for layout results.
//!
//! Extension traits that add colored output to slotgrid-core types using
//! owo_colors.

use chrono::NaiveDateTime;
use owo_colors::OwoColorize;
use slotgrid_core::{Coordinate, GeometryProvider, GridOccurrence, LayoutStrategy, Workspace};

const DATE_TIME: &str = "%Y-%m-%d %H:%M";

pub trait Render {
    fn render(&self) -> String;
}

/// `start - end`, with the end's date left out when it is the same day.
fn render_span(start: NaiveDateTime, end: NaiveDateTime) -> String {
    if start.date() == end.date() {
        format!("{} - {}", start.format(DATE_TIME), end.format("%H:%M"))
    } else {
        format!("{} - {}", start.format(DATE_TIME), end.format(DATE_TIME))
    }
}

impl Render for GridOccurrence {
    fn render(&self) -> String {
        let span = render_span(self.start_date, self.end_date);
        let native = format!(
            "native {}",
            render_span(self.source.start_date, self.source.end_date)
        );

        match self.group_index() {
            Some(group) => {
                format!("{} {} {}", span, native.dimmed(), format!("group {group}").cyan())
            }
            None => format!("{} {}", span, native.dimmed()),
        }
    }
}

impl Render for Coordinate<'_> {
    fn render(&self) -> String {
        let position = &self.position;
        let occurrence = &self.info.appointment;
        let cell = if position.all_day {
            format!("all-day col {}", position.column_index)
        } else {
            format!("col {} row {}", position.column_index, position.row_index)
        };

        format!(
            "{} {} {} {}",
            render_span(occurrence.start_date, occurrence.end_date),
            format!("group {}", position.group_index).cyan(),
            cell.yellow(),
            format!("({:.1}, {:.1})", position.left, position.top).dimmed()
        )
    }
}

impl Render for LayoutStrategy {
    fn render(&self) -> String {
        match self {
            LayoutStrategy::Base(_) => "base".green().to_string(),
            LayoutStrategy::Virtual(_) => "virtual".magenta().to_string(),
        }
    }
}

pub fn render_header(workspace: &Workspace, strategy: LayoutStrategy) -> String {
    let range = workspace.grid().date_range();
    let zone = workspace.settings().time_zone().unwrap_or("native time");

    format!(
        "📅 {} {} {}",
        render_span(range.min, range.max),
        format!("[{zone}]").dimmed(),
        strategy.render()
    )
}
