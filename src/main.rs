//! churncast - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use churncast::{
    cli::{Args, Commands, Config, Verbosity},
    doctor::Doctor,
    inference::{ChurnClassifier, LogisticPipeline},
    render::{PredictionReport, RenderedResult},
    repl::{DisplayManager, FormLayout, InputHandler, ReplSession},
    validation::{FeatureRecordBuilder, RawCustomerInput},
};

fn main() -> Result<()> {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(args.config.clone())?;
    if !config.display.color_output {
        colored::control::set_override(false);
    }

    let verbosity = args.verbosity_or(config.verbosity()?);
    init_tracing(verbosity);
    debug!(?verbosity, "configuration loaded");

    let model_path = args.model.clone().unwrap_or_else(|| config.model_path());

    match args.command() {
        Commands::Start { layout } => {
            let layout = layout.unwrap_or(config.form.layout);
            run_form(&config, &model_path, layout, verbosity)?;
        }
        Commands::Predict { input, json } => {
            run_predict(&model_path, &input, json, verbosity)?;
        }
        Commands::Schema => {
            DisplayManager::new().show_schema();
        }
        Commands::Doctor => {
            run_doctor(config, model_path);
        }
        Commands::Config => {
            show_config(&config, args.config.as_deref(), &model_path, verbosity);
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the verbosity level picks the filter
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the model or stop: nothing else works without it
fn load_model_or_exit(path: &Path, display: &DisplayManager) -> LogisticPipeline {
    match LogisticPipeline::load(path) {
        Ok(model) => model,
        Err(e) => {
            display.show_error(&e.to_string());
            eprintln!(
                "\nPlease ensure '{}' is a valid model artifact, or pass one with --model.",
                path.display()
            );
            std::process::exit(1);
        }
    }
}

fn run_form(
    config: &Config,
    model_path: &Path,
    layout: FormLayout,
    verbosity: Verbosity,
) -> Result<()> {
    let display = DisplayManager::new()
        .with_confidence_bar(config.display.show_confidence_bar && verbosity.show_progress());
    let model = load_model_or_exit(model_path, &display);

    let input = match config.history_path() {
        Some(path) => InputHandler::with_history(path)?,
        None => InputHandler::new()?,
    };

    let mut session = ReplSession::new(&model, layout, input).with_display(display);
    session.show_welcome(env!("CARGO_PKG_VERSION"), model.name());
    session.run()?;
    Ok(())
}

fn run_predict(model_path: &Path, input: &Path, json: bool, verbosity: Verbosity) -> Result<()> {
    let display = DisplayManager::new().with_confidence_bar(verbosity.show_progress());
    let model = load_model_or_exit(model_path, &display);

    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let raw = RawCustomerInput::from_json_str(&contents)?;
    let record = FeatureRecordBuilder::new().build(&raw)?;
    let prediction = model.classify(&record);

    if json {
        let report = PredictionReport::new(&record, &prediction);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        if matches!(verbosity, Verbosity::Verbose | Verbosity::VeryVerbose) {
            display.show_record(&record);
        }
        display.show_result(&RenderedResult::from_prediction(&prediction));
    }
    Ok(())
}

fn run_doctor(config: Config, model_path: PathBuf) {
    let doctor = Doctor::new(config, model_path);
    let checks = doctor.run_diagnostics();
    Doctor::display_results(&checks);

    let healthy = Doctor::overall_status(&checks);
    if !healthy {
        warn!("diagnostics reported failures");
    }
    std::process::exit(if healthy { 0 } else { 1 });
}

fn show_config(
    config: &Config,
    source: Option<&Path>,
    model_path: &Path,
    verbosity: Verbosity,
) {
    println!("\n{}\n", "churncast configuration".bold().cyan());

    match source.map(Path::to_path_buf).or_else(Config::default_path) {
        Some(path) if path.exists() => println!("Config file:  {}", path.display()),
        _ => println!("Config file:  {}", "(built-in defaults)".dimmed()),
    }
    println!();

    println!("Model:");
    println!("  Path:       {}", model_path.display());
    println!();

    println!("Form:");
    println!("  Layout:     {}", config.form.layout);
    match config.history_path() {
        Some(path) => println!("  History:    {}", path.display()),
        None => println!("  History:    disabled"),
    }
    println!();

    println!("Display:");
    println!(
        "  Colors:          {}",
        if config.display.color_output { "enabled" } else { "disabled" }
    );
    println!(
        "  Confidence bar:  {}",
        if config.display.show_confidence_bar { "enabled" } else { "disabled" }
    );
    println!("  Verbosity:       {}", verbosity.as_str());
    println!();
}
