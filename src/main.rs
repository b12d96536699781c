//! Order Wizard - Main entry point
//!
//! Interactive ordering of a home connectivity tariff, plus two headless
//! commands for checking configuration and catalogs.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::path::Path;
use tracing::{error, info, warn};

use order_wizard::app::App;
use order_wizard::cli::{Cli, Commands};
use order_wizard::logging::{self, LogTarget};
use order_wizard::{load_catalog, CatalogLoad, WizardConfig};

/// Main application entry point
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command() {
        Commands::Validate { config } => validate_config(config),
        Commands::Catalog { strict } => {
            let config = WizardConfig::resolve(cli.config.as_deref())?;
            logging::init(&config.log_level, LogTarget::Stderr)?;
            print_catalog(&config, *strict)
        }
        Commands::Run => {
            let config = WizardConfig::resolve(cli.config.as_deref())?;
            logging::init(&config.log_level, LogTarget::File(&config.log_file))?;
            info!("Order wizard starting up");
            run_tui(&config)
        }
    }
}

/// Check a configuration file and report the outcome.
fn validate_config(path: &Path) -> Result<()> {
    match WizardConfig::load_from_file(path) {
        Ok(config) => match config.validate() {
            Ok(()) => {
                println!("✓ Configuration file is valid: {:?}", path);
                Ok(())
            }
            Err(e) => {
                eprintln!("✗ Configuration validation failed: {:#}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("✗ Failed to load configuration file: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn load(config: &WizardConfig) -> CatalogLoad {
    let trade_points = config.trade_point_source();
    let tariffs = config.tariff_source();
    let load = load_catalog(trade_points.as_ref(), tariffs.as_ref());
    for issue in &load.issues {
        warn!("{}", issue);
    }
    load
}

/// Print the normalized catalog as JSON.
fn print_catalog(config: &WizardConfig, strict: bool) -> Result<()> {
    let load = load(config);
    println!(
        "{}",
        serde_json::to_string_pretty(&load.catalog).context("Failed to serialize catalog")?
    );

    if strict && load.is_degraded() {
        let reasons: Vec<String> = load.issues.iter().map(ToString::to_string).collect();
        anyhow::bail!("Catalog fell back to defaults: {}", reasons.join("; "));
    }
    Ok(())
}

/// Run the interactive wizard
fn run_tui(config: &WizardConfig) -> Result<()> {
    let load = load(config);
    let dispatcher = config.dispatcher();

    enable_raw_mode().context("Failed to enable raw mode")?;
    if let Err(e) = crossterm::execute!(stdout(), EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e).context("Failed to enter alternate screen");
    }

    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| {
            let mut app = App::new(load, dispatcher);
            app.run(&mut terminal).map_err(anyhow::Error::from)
        });

    // Always restore the terminal, even if the app failed
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), LeaveAlternateScreen);

    if let Err(e) = &result {
        error!("Wizard terminated with an error: {:#}", e);
    } else {
        info!("Order wizard exited");
    }
    result
}
