//! `drugline journals` - journal mentioning the most distinct drugs

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

#[derive(Args, Debug)]
pub struct JournalsArgs {
    /// Gold directory holding drug_mentions.json
    #[arg(long)]
    pub gold: Option<PathBuf>,
}

pub fn run(args: JournalsArgs, mut config: drugline_ingest::Config) -> Result<()> {
    if let Some(dir) = args.gold {
        config.gold_dir = dir;
    }
    report(&config)
}

/// Rank journals and print the result. A missing ranking is reported, not
/// treated as a failure.
pub(crate) fn report(config: &drugline_ingest::Config) -> Result<()> {
    let summary = drugline_ingest::run_journals(config)?;

    let Some(ranking) = summary.ranking else {
        println!("No journal data available ({} mentions)", summary.mentions);
        return Ok(());
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Journal").fg(Color::Cyan),
            Cell::new("Drugs").fg(Color::Cyan),
            Cell::new("Codes").fg(Color::Cyan),
        ]);
    table.add_row(vec![
        ranking.name.clone(),
        ranking.drug_count.to_string(),
        ranking.drugs.join(", "),
    ]);

    println!();
    println!("{table}");
    if let Some(path) = summary.output {
        println!("Output: {}", path.display());
    }
    Ok(())
}
