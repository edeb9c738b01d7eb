mod commands;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slotgrid_core::{LayoutSettings, Scenario, Workspace};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slotgrid")]
#[command(about = "Resolve appointment scenarios into calendar grid coordinates")]
struct Cli {
    /// Log every pipeline stage (same as SLOTGRID_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every appointment of a scenario into grid coordinates
    Layout {
        scenario: PathBuf,

        /// Use the virtual scrolling strategy
        #[arg(long = "virtual")]
        virtual_scrolling: bool,

        /// Print coordinates as JSON
        #[arg(long)]
        json: bool,

        /// Layout settings file, replacing the scenario's [settings]
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Print the expanded occurrences of every appointment, before cropping
    Occurrences {
        scenario: PathBuf,

        /// Layout settings file, replacing the scenario's [settings]
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Layout {
            scenario,
            virtual_scrolling,
            json,
            settings,
        } => {
            let mut scenario = load_scenario(&scenario, settings.as_deref())?;
            if virtual_scrolling {
                scenario.settings.virtual_scrolling = true;
            }
            let workspace = build_workspace(&scenario)?;
            commands::layout::run(&scenario, &workspace, json)
        }
        Commands::Occurrences { scenario, settings } => {
            let scenario = load_scenario(&scenario, settings.as_deref())?;
            let workspace = build_workspace(&scenario)?;
            commands::occurrences::run(&scenario, &workspace)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SLOTGRID_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenario(path: &Path, settings: Option<&Path>) -> Result<Scenario> {
    let mut scenario = Scenario::load(path)
        .with_context(|| format!("Could not load scenario {}", path.display()))?;

    if let Some(settings_path) = settings {
        scenario.settings = LayoutSettings::load(Some(settings_path))
            .with_context(|| format!("Could not load settings {}", settings_path.display()))?;
    }

    Ok(scenario)
}

fn build_workspace(scenario: &Scenario) -> Result<Workspace> {
    let local_zone = iana_time_zone::get_timezone().unwrap_or_else(|e| {
        warn!(error = %e, "could not detect the local time zone, using UTC");
        "UTC".to_string()
    });

    scenario
        .workspace(&local_zone)
        .context("Could not set up the scenario's grid")
}
