//! `drugline run` - bronze → silver → gold drug mention pipeline

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{
    Cell, CellAlignment, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};
use drugline_core::{ProgressContext, fmt_num};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Bronze (raw input) directory
    #[arg(long)]
    pub bronze: Option<PathBuf>,

    /// Silver (validated tables) directory
    #[arg(long)]
    pub silver: Option<PathBuf>,

    /// Gold (outputs) directory
    #[arg(long)]
    pub gold: Option<PathBuf>,

    /// Source file to load instead of scanning the bronze directory (repeatable)
    #[arg(long = "source", value_name = "FILE")]
    pub sources: Vec<PathBuf>,

    /// Also rank journals once mentions are written
    #[arg(long)]
    pub journals: bool,
}

pub fn run(
    args: RunArgs,
    mut config: drugline_ingest::Config,
    progress: &ProgressContext,
) -> Result<()> {
    if let Some(dir) = args.bronze {
        config.bronze_dir = dir;
    }
    if let Some(dir) = args.silver {
        config.silver_dir = dir;
    }
    if let Some(dir) = args.gold {
        config.gold_dir = dir;
    }
    if !args.sources.is_empty() {
        config.sources = Some(args.sources);
    }

    let summary = drugline_ingest::run_mentions(&config, progress)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Table").fg(Color::Cyan),
            Cell::new("Valid").fg(Color::Cyan),
            Cell::new("Invalid").fg(Color::Cyan),
        ]);
    for stats in &summary.tables {
        let invalid = Cell::new(fmt_num(stats.invalid)).set_alignment(CellAlignment::Right);
        table.add_row(vec![
            Cell::new(&stats.table),
            Cell::new(fmt_num(stats.valid)).set_alignment(CellAlignment::Right),
            if stats.invalid > 0 {
                invalid.fg(Color::Yellow)
            } else {
                invalid
            },
        ]);
    }

    println!();
    println!("=== Run Complete ===");
    println!("{table}");
    println!(
        "Drugs mentioned: {} ({} files, {} skipped)",
        fmt_num(summary.drugs_mentioned),
        summary.source_files,
        summary.skipped_files
    );
    println!("Output: {}", summary.output.display());
    println!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    if args.journals {
        super::journals::report(&config)?;
    }
    Ok(())
}
