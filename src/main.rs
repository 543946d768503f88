//! Hazard Snake entry point
//!
//! Parses the command line, sets up logging, and either runs the game in the
//! terminal or plays a fixed number of ticks headless and prints the result.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hazard_snake::clock::SystemClock;
use hazard_snake::term::{Input, TermManager};
use hazard_snake::{Driver, Settings, SpawnPolicy};

/// Command-line arguments. Flags override values from `--config`.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// JSON settings file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write the effective settings to this file before starting.
    #[arg(long, value_name = "PATH")]
    save_config: Option<PathBuf>,
    /// Run seed (random when omitted).
    #[arg(short, long)]
    seed: Option<u64>,
    /// Milliseconds between snake moves.
    #[arg(
        long = "tick-ms",
        value_name = "MILLISECONDS",
        value_parser = clap::value_parser!(u64).range(1..=60_000)
    )]
    tick_ms: Option<u64>,
    /// Milliseconds between obstacle spawns.
    #[arg(
        long = "obstacle-ms",
        value_name = "MILLISECONDS",
        value_parser = clap::value_parser!(u64).range(1..=3_600_000)
    )]
    obstacle_ms: Option<u64>,
    /// Whether obstacles keep spawning after game over: always | while-running.
    #[arg(long, value_name = "POLICY", value_parser = parse_spawn_policy)]
    spawn_policy: Option<SpawnPolicy>,
    /// Let the demo AI play.
    #[arg(long)]
    autopilot: bool,
    /// Play this many ticks without a terminal and print the final state as JSON.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
    /// Send log output to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn parse_spawn_policy(value: &str) -> Result<SpawnPolicy, String> {
    SpawnPolicy::from_str(value)
        .ok_or_else(|| format!("unknown spawn policy '{value}' (expected always or while-running)"))
}

impl CliArgs {
    fn settings(&self) -> Settings {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };

        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(ms) = self.tick_ms {
            settings.tick_period_ms = ms;
        }
        if let Some(ms) = self.obstacle_ms {
            settings.obstacle_period_ms = ms;
        }
        if let Some(policy) = self.spawn_policy {
            settings.spawn_policy = policy;
        }
        if self.autopilot {
            settings.autopilot = true;
        }
        settings
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_file.as_ref())?;
    log::info!("Hazard Snake starting...");

    let settings = args.settings();
    if let Some(path) = &args.save_config {
        settings
            .save(path)
            .with_context(|| format!("cannot write settings to {}", path.display()))?;
    }

    if let Some(ticks) = args.headless {
        let driver = Driver::run_headless(&settings, ticks);
        log::info!("Headless run finished (seed {})", driver.seed());
        println!("{}", serde_json::to_string_pretty(&driver.snapshot())?);
        return Ok(());
    }

    run_terminal(&settings)
}

fn run_terminal(settings: &Settings) -> Result<()> {
    let mut term = TermManager::new();
    term.setup().context("failed to prepare the terminal")?;

    let mut driver = Driver::new(settings, SystemClock::new());
    let result = game_loop(&mut term, &mut driver);

    term.restore().context("failed to restore the terminal")?;
    result
}

fn game_loop(term: &mut TermManager, driver: &mut Driver<SystemClock>) -> Result<()> {
    let mut dirty = true;

    loop {
        if dirty {
            term.draw(&driver.snapshot(), driver.is_paused(), driver.autopilot())?;
            dirty = false;
        }

        // Sleep in the input poll until the next tick or spawn is due
        let timeout = if driver.is_paused() {
            std::time::Duration::from_millis(250)
        } else {
            driver.time_until_next()
        };

        for input in term.read_inputs(timeout)? {
            match input {
                Input::Quit => {
                    log::info!("Quit with score {}", driver.state().score);
                    return Ok(());
                }
                Input::Command(command) => driver.push_command(command),
                Input::TogglePause => driver.toggle_pause(),
                Input::ToggleAutopilot => driver.set_autopilot(!driver.autopilot()),
            }
            dirty = true;
        }

        if !driver.pump().is_empty() {
            dirty = true;
        }
    }
}
