//! Puzzle command-line driver.
//!
//! Loads a level, runs a command script through the runtime and prints the
//! goal test report.
//!
//! ```bash
//! cargo run -p puzzle-cli -- demos/levels/bridge.ron demos/scripts/bridge.txt
//! echo "move_forward(3)" | cargo run -p puzzle-cli -- demos/levels/bridge.ron --format json
//! ```

mod presenter;
mod script;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use puzzle_content::{ConfigLoader, LevelLoader};
use puzzle_core::TestReport;
use puzzle_runtime::{ActionRecord, Runtime, RuntimeConfig};
use tokio::sync::broadcast::error::RecvError;

use presenter::LogPresenter;

/// Run a command script against a puzzle level
#[derive(Parser)]
#[command(name = "puzzle")]
#[command(about = "Run a command script against a puzzle level", long_about = None)]
#[command(version)]
struct Cli {
    /// Level file (RON or JSON)
    #[arg(value_name = "LEVEL")]
    level: PathBuf,

    /// Command script; read from stdin when omitted
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Game configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Action log and test results
    Summary,
    /// Test report as JSON
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = RuntimeConfig::from_env();
    if let Some(path) = &cli.config {
        config.game_config = ConfigLoader::load(path)?;
    }

    let level = LevelLoader::load(&cli.level, config.game_config.clone())?;
    let source = match &cli.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            buf
        }
    };
    let commands = script::parse(&source)?;

    tracing::info!(level = %level.name, commands = commands.len(), "starting level");

    let runtime = Runtime::builder()
        .config(config)
        .initial_state(level.state)
        .tests(level.tests)
        .presenter(LogPresenter {
            quiet: cli.format == OutputFormat::Json,
        })
        .build()?;

    let mut events = runtime.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => tracing::debug!(target: "cli::events", "{json}"),
                    Err(e) => tracing::warn!(target: "cli::events", "unencodable event: {e}"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "cli::events", skipped, "event subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    for command in commands {
        if command.is_undo() {
            runtime.run_queue().await;
            runtime.undo().await;
        } else {
            runtime.queue(command.name, command.params);
        }
    }
    runtime.run_queue().await;

    let report = runtime.evaluate().await;
    match cli.format {
        OutputFormat::Summary => print_summary(&level.name, &runtime.history(), &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(name: &str, history: &[ActionRecord], report: &TestReport) {
    println!();
    for record in history {
        match (&record.reason, &record.error) {
            (None, _) => println!("  ok    {}", record.name),
            (Some(reason), Some(error)) => println!("  fail  {} ({reason}): {error}", record.name),
            (Some(reason), None) => println!("  fail  {} ({reason})", record.name),
        }
    }

    println!();
    let verdict = if report.passed { "PASSED" } else { "FAILED" };
    println!("Level \"{name}\": {verdict}");
    if report.default_goal_check {
        println!("  goal reached: {}", report.passed);
    }
    for result in &report.items {
        let mark = if result.passed { "+" } else { "-" };
        println!("  {mark} [{}] {}", result.kind, result.message);
    }
}
