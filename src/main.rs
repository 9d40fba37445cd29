use chrono::{Local, NaiveDate};
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

mod cli;

use cli::Cli;
use cli::commands::Commands;
use playgen::catalog::{DurationProbe, FfprobeProbe, FixedDurationProbe, Scanner};
use playgen::config::Config;
use playgen::domain::FolderMap;
use playgen::engine::Engine;
use playgen::output::ProgramWriter;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("playgen")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("playgen.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// `HH:MM:SS` for a second count.
fn format_runtime(secs: f64) -> String {
    let total = secs.round() as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

async fn scan_library(config: &Config, no_probe: bool) -> Result<FolderMap> {
    let probe: Box<dyn DurationProbe> = if no_probe {
        Box::new(FixedDurationProbe::new(config.probe.default_duration_secs))
    } else {
        Box::new(FfprobeProbe::new(&config.probe))
    };

    let scanner = Scanner::new(&config.probe, probe.as_ref());
    let folders = scanner
        .scan(&config.video_directory)
        .await
        .context(format!("Failed to scan {}", config.video_directory.display()))?;
    info!("Scanned {} folders", folders.len());
    Ok(folders)
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Generate {
            date,
            template,
            no_probe,
        } => handle_generate_command(config, date.unwrap_or_else(today), template.as_deref(), *no_probe).await,
        Commands::Scan { no_probe } => handle_scan_command(&config, *no_probe).await,
        Commands::Peek { category, date } => handle_peek_command(config, category, date.unwrap_or_else(today)).await,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn handle_generate_command(config: Config, date: NaiveDate, template: Option<&Path>, no_probe: bool) -> Result<()> {
    info!("Generating program for {} (template: {:?})", date, template);
    let folders = scan_library(&config, no_probe).await?;
    let writer = ProgramWriter::new(&config.output_directory);
    let mut engine = Engine::open(config);

    let draft = match template {
        Some(path) => engine.draft_from_template(&folders, path, date),
        None => engine.draft(&folders, date),
    }
    .context("Failed to generate program")?;

    // state is only saved once the program file exists
    let path = writer.write(draft.program()).context("Failed to write program")?;
    let program = engine.commit(draft).context("Failed to save playback state")?;

    println!("{} {}", "Generated:".green(), path.display());
    println!("  Items:   {}", program.len());
    println!("  Runtime: {}", format_runtime(program.total_duration()));
    Ok(())
}

async fn handle_scan_command(config: &Config, no_probe: bool) -> Result<()> {
    let folders = scan_library(config, no_probe).await?;
    let engine = Engine::open(config.clone());
    let pool = engine.pool(&folders);

    if pool.is_empty() {
        println!("{} {}", "No media found in".yellow(), config.video_directory.display());
        return Ok(());
    }

    println!("{}", "Categories:".cyan());
    for category in pool.categories() {
        let items = pool.items(category);
        let total: f64 = items.iter().map(|item| item.duration).sum();
        println!("  {:<16} {:>5} items  {}", category, items.len(), format_runtime(total));
    }
    println!("{} {}", "Total clips:".green(), pool.len());
    Ok(())
}

async fn handle_peek_command(config: Config, category: &str, date: NaiveDate) -> Result<()> {
    info!("Peeking '{}' for {}", category, date);
    let folders = scan_library(&config, true).await?;
    let engine = Engine::open(config);

    match engine.peek(&folders, category, date) {
        Some(item) => {
            let last = engine
                .state()
                .last_played(&item.path)
                .map(|at| at.to_string())
                .unwrap_or_else(|| "never".to_string());
            println!("{} {}", "Next:".green(), item.path);
            println!("  Last played: {}", last);
        }
        None => println!("{} '{}'", "No clips in category".yellow(), category),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging first
    setup_logging(cli.is_verbose()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
