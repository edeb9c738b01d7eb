use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use slotgrid_core::{Coordinate, Scenario, Workspace};

use crate::render::{Render, render_header};

#[derive(Serialize)]
struct AppointmentLayout<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    text: &'a str,
    coordinates: Vec<Coordinate<'a>>,
}

pub fn run(scenario: &Scenario, workspace: &Workspace, json: bool) -> Result<()> {
    let engine = workspace.engine();

    let layouts: Vec<AppointmentLayout<'_>> = scenario
        .appointments
        .iter()
        .map(|raw| AppointmentLayout {
            id: raw.id.as_deref(),
            text: &raw.text,
            coordinates: engine.create(raw),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&layouts)?);
        return Ok(());
    }

    println!("{}", render_header(workspace, engine.strategy()));

    for layout in &layouts {
        println!();
        println!("{}", layout.text.bold());

        if layout.coordinates.is_empty() {
            println!("   {}", "Not visible".dimmed());
            continue;
        }
        for coordinate in &layout.coordinates {
            println!("   {}", coordinate.render());
        }
    }

    Ok(())
}
