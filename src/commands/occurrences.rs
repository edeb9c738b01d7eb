use anyhow::Result;
use owo_colors::OwoColorize;
use slotgrid_core::{Scenario, Workspace};

use crate::render::{Render, render_header};

pub fn run(scenario: &Scenario, workspace: &Workspace) -> Result<()> {
    let engine = workspace.engine();

    println!("{}", render_header(workspace, engine.strategy()));

    for raw in &scenario.appointments {
        let occurrences = engine.occurrences(raw);

        println!();
        println!("{} {}", raw.text.bold(), format!("({})", occurrences.len()).dimmed());
        for occurrence in &occurrences {
            println!("   {}", occurrence.render());
        }
    }

    Ok(())
}
