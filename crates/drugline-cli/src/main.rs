//! drugline - drug mention pipeline over clinical trials and PubMed
//!
//! Loads raw CSV/JSON tables, validates them against fixed schemas, finds
//! which publications mention which drugs, and ranks journals.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "drugline")]
#[command(about = "Drug mention pipeline over clinical trials and PubMed")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./drugline.toml or ~/.config/drugline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Maximum attempts for file reads
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Milliseconds before the first retry (doubles afterwards)
    #[arg(long, global = true)]
    retry_delay_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate sources and write drug mentions
    Run(cmd::run::RunArgs),
    /// Rank journals by distinct drugs mentioned
    Journals(cmd::journals::JournalsArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (config file defaults, CLI overrides)
    let mut config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    if let Some(n) = cli.max_retries {
        config.processing.max_retries = n;
    }
    if let Some(ms) = cli.retry_delay_ms {
        config.processing.retry_delay_ms = ms;
    }

    // Progress context (TTY auto-detect)
    let progress = drugline_core::ProgressContext::new();

    // Logging:
    //   TTY:     quiet (warn) unless --debug, progress lines show activity
    //   non-TTY: configured level unless --debug
    let level = match (cli.debug, progress.is_tty()) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => config.logging.level.as_str(),
    };
    let multi = progress.is_tty().then(|| progress.multi());
    drugline_core::init_logging(level, config.logging.file.as_deref(), multi)?;

    match &config.source {
        Some(path) => log::info!("Loaded config from {}", path.display()),
        None => log::debug!("No config file found, using defaults"),
    }

    match cli.command {
        Command::Run(args) => cmd::run::run(args, config.pipeline(), &progress),
        Command::Journals(args) => cmd::journals::run(args, config.pipeline()),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Config file",
                &config
                    .source
                    .as_ref()
                    .map_or("(defaults)".to_string(), |p| p.display().to_string()),
            ]);
            table.add_row(vec!["Bronze", &config.paths.bronze.display().to_string()]);
            table.add_row(vec!["Silver", &config.paths.silver.display().to_string()]);
            table.add_row(vec!["Gold", &config.paths.gold.display().to_string()]);
            table.add_row(vec![
                "Publication tables",
                &config.pipeline.publication_tables.join(", "),
            ]);
            table.add_row(vec![
                "Sources",
                &config.pipeline.sources.as_ref().map_or("(scan bronze)".to_string(), |s| {
                    format!("{} files", s.len())
                }),
            ]);
            table.add_row(vec!["Max retries", &config.processing.max_retries.to_string()]);
            table.add_row(vec![
                "Retry delay",
                &format!("{}ms", config.processing.retry_delay_ms),
            ]);
            table.add_row(vec!["Log level", &config.logging.level]);
            table.add_row(vec![
                "Log file",
                &config
                    .logging
                    .file
                    .as_ref()
                    .map_or("not set".to_string(), |p| p.display().to_string()),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
