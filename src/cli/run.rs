//! Run command implementation

use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::utils::{resolve_config, ConfigArgs, ProfileArgs};
use crate::config::CliOverrides;
use crate::plan::{Outcome, Planner};
use crate::sink::{ConsoleSink, KeyDriver, KeyboardSink};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub profiles: ProfileArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Title of the editor window to focus
    #[arg(short = 'w', long, value_name = "TITLE")]
    pub window: Option<String>,

    /// Seconds to wait after focusing the window
    #[arg(long, value_name = "SECS")]
    pub countdown: Option<u64>,

    /// Print the events instead of pressing keys
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the start confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub fn run(args: RunArgs) -> Result<()> {
    let overrides = CliOverrides {
        window_title: args.window.clone(),
        countdown_secs: args.countdown,
        ..args.config.overrides()
    };
    let config = resolve_config(&args.config, &overrides)?;
    let (baseline, target) = args.profiles.load()?;

    if let Some(name) = target.info.get("name") {
        println!("Target profile: {}", style(name).bold());
    }

    let mut planner = Planner::new(baseline, &target, config.engine_settings());

    if args.dry_run {
        let stdout = io::stdout();
        let mut sink = ConsoleSink::new(stdout.lock());
        planner.run(&mut sink)?;
        return Ok(());
    }

    if !args.yes {
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Highlight 'Body > Body > Height' in '{}' and do not move the mouse. Start?",
                config.window_title
            ))
            .default(true)
            .interact()?;
        if !proceed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut driver = platform_driver();
    driver.focus(&config.window_title)?;
    println!("Found window for {}!", config.window_title);

    if config.countdown_secs > 0 {
        println!("Waiting for {} seconds...", config.countdown_secs);
        thread::sleep(Duration::from_secs(config.countdown_secs));
    }

    let stop = Arc::new(AtomicBool::new(false));
    if io::stdin().is_terminal() {
        println!("Press Enter in this console to stop after the current row.");
        spawn_stop_watcher(stop.clone());
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    progress.enable_steady_tick(Duration::from_millis(120));

    let mut sink = KeyboardSink::new(driver, config.keys).with_stop_flag(stop).with_progress(progress);

    match planner.run(&mut sink)? {
        Outcome::Completed => println!("{}", style("Character creation complete!").green()),
        Outcome::Stopped => println!(
            "{}",
            style("Stopped early; the editor cursor is between two rows.").yellow()
        ),
    }
    Ok(())
}

fn spawn_stop_watcher(stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_ok() {
            stop.store(true, Ordering::SeqCst);
        }
    });
}

#[cfg(windows)]
fn platform_driver() -> crate::sink::windows::SendInputDriver {
    crate::sink::windows::SendInputDriver::new()
}

#[cfg(not(windows))]
fn platform_driver() -> crate::sink::TracingDriver {
    crate::sink::TracingDriver::default()
}
