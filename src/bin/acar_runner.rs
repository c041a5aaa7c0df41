//! Headless auto-resolve runner
//!
//! Builds a two-sided scenario from battle-value totals, resolves it, and
//! prints the outcome as JSON or text.

use autoresolve::acar::{
    build_context, ForceEntry, ScenarioConfig, SimulationManager, UnitSetup,
};
use autoresolve::core::types::TeamId;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless auto-resolve runner
#[derive(Parser, Debug)]
#[command(name = "acar_runner")]
#[command(about = "Resolve an abstract battle and print the outcome")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Total battle value fielded by team 1
    #[arg(long, default_value_t = 3000)]
    team1_bv: u32,

    /// Total battle value fielded by team 2
    #[arg(long, default_value_t = 3000)]
    team2_bv: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the full battle report to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunnerOutput {
    seed: u64,
    team1_victory: bool,
    controls_battlefield: bool,
    team1_survivors: usize,
    team2_survivors: usize,
    team1_losses: usize,
    team2_losses: usize,
}

/// Split a BV total into 1000-BV units under one force
fn build_force(team: TeamId, name: &str, total_bv: u32) -> ForceEntry {
    let mut force = ForceEntry::new(team, name);
    let count = (total_bv / 1000).max(1);
    for i in 0..count {
        force
            .units
            .push(UnitSetup::new(format!("{name} {}", i + 1), total_bv / count));
    }
    force
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let forces = vec![
        build_force(TeamId(1), "First Battle Group", args.team1_bv),
        build_force(TeamId(2), "Second Battle Group", args.team2_bv),
    ];

    let config = ScenarioConfig {
        seed,
        ..ScenarioConfig::default()
    };
    let report_lines = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink_lines = report_lines.clone();
    let manager = SimulationManager::new(build_context(&forces), &config).with_result_sink(
        Box::new(move |event: autoresolve::acar::PostBattleEvent| {
            if let Ok(mut lines) = sink_lines.lock() {
                *lines = event.report;
            }
        }),
    );

    let result = match manager.resolve() {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Resolution failed: {err}");
            std::process::exit(1);
        }
    };

    if args.verbose {
        if let Ok(lines) = report_lines.lock() {
            for line in lines.iter() {
                eprintln!("{line}");
            }
        }
    }

    let output = RunnerOutput {
        seed,
        team1_victory: result.team1_victory,
        controls_battlefield: result.controls_battlefield,
        team1_survivors: result.surviving_units[&TeamId(1)].len(),
        team2_survivors: result.surviving_units[&TeamId(2)].len(),
        team1_losses: result.defeated_units[&TeamId(1)].len(),
        team2_losses: result.defeated_units[&TeamId(2)].len(),
    };

    match args.format.as_str() {
        "text" => {
            println!(
                "seed {}: team 1 {} (survivors {} vs {}, losses {} vs {})",
                output.seed,
                if output.team1_victory { "wins" } else { "does not win" },
                output.team1_survivors,
                output.team2_survivors,
                output.team1_losses,
                output.team2_losses,
            );
        }
        _ => match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Failed to serialize output: {err}");
                std::process::exit(1);
            }
        },
    }
}
