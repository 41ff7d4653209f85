//! Pipeline runners: bronze → silver → gold mentions, and journal ranking

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use drugline_core::{ProgressContext, fmt_num};
use drugline_mentions::schema::DRUGS;
use drugline_mentions::{
    JournalRanking, SchemaRegistry, TableDataset, combine, find_mentions, rank_journals,
    take_table,
};

use crate::config::Config;
use crate::decode::load_source;
use crate::discovery::list_sources;
use crate::persist::{load_mentions, save_json};

/// Row counts for one logical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub table: String,
    pub valid: usize,
    pub invalid: usize,
}

/// Mention pipeline execution summary
#[derive(Debug)]
pub struct MentionSummary {
    pub source_files: usize,
    /// Source files whose name matched no known table
    pub skipped_files: usize,
    pub tables: Vec<TableStats>,
    pub drugs_mentioned: usize,
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Journal ranking execution summary
#[derive(Debug)]
pub struct JournalSummary {
    pub mentions: usize,
    pub ranking: Option<JournalRanking>,
    /// Written only when there is a ranking
    pub output: Option<PathBuf>,
    pub elapsed: Duration,
}

fn table_stats(tables: &BTreeMap<String, TableDataset>) -> Vec<TableStats> {
    tables
        .values()
        .map(|d| TableStats {
            table: d.table().to_string(),
            valid: d.valid.len(),
            invalid: d.invalid.len(),
        })
        .collect()
}

/// Run the mention pipeline.
///
/// Loads every source, validates and combines them per table, writes the
/// silver tables, then matches drugs against the configured publication
/// tables and writes the gold mentions file.
pub fn run_mentions(config: &Config, progress: &ProgressContext) -> Result<MentionSummary> {
    let start = Instant::now();
    let registry = SchemaRegistry::standard();

    let paths = match &config.sources {
        Some(paths) => paths.clone(),
        None => list_sources(&config.bronze_dir)?,
    };
    log::info!("Loading {} source files", paths.len());

    let pb = progress.stage_line("load");
    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        pb.set_message(path.display().to_string());
        let source = load_source(path, &config.retry)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        sources.push(source);
    }
    let skipped_files = sources
        .iter()
        .filter(|s| registry.infer_table(&s.name).is_none())
        .count();
    pb.finish_with_message(format!("{} files", paths.len()));

    let pb = progress.stage_line("validate");
    let mut tables = combine(registry, sources);
    let tables_stats = table_stats(&tables);
    for dataset in tables.values() {
        save_json(&dataset.valid, &config.table_path(dataset.table()))?;
        save_json(&dataset.invalid, &config.invalid_path(dataset.table()))?;
    }
    pb.finish_with_message(format!("{} tables", tables_stats.len()));

    let pb = progress.stage_line("match");
    let drugs = take_table(&mut tables, registry, DRUGS)?;
    let publications = config
        .search_tables()
        .into_iter()
        .map(|t| take_table(&mut tables, registry, t))
        .collect::<Result<Vec<_>, _>>()?;
    let publication_refs: Vec<&TableDataset> = publications.iter().collect();
    let mentions = find_mentions(&drugs, &publication_refs);
    pb.finish_with_message(format!("{} drugs mentioned", fmt_num(mentions.len())));

    let output = config.mentions_path();
    save_json(&mentions, &output)?;

    let summary = MentionSummary {
        source_files: paths.len(),
        skipped_files,
        tables: tables_stats,
        drugs_mentioned: mentions.len(),
        output,
        elapsed: start.elapsed(),
    };

    log::info!("=== Drug Mention Summary ===");
    log::info!(
        "Files: {} loaded ({} skipped)",
        summary.source_files,
        summary.skipped_files
    );
    for stats in &summary.tables {
        log::info!(
            "  {}: {} valid, {} invalid",
            stats.table,
            fmt_num(stats.valid),
            fmt_num(stats.invalid)
        );
    }
    log::info!(
        "Drugs mentioned: {} of {}",
        fmt_num(summary.drugs_mentioned),
        fmt_num(drugs.valid.len())
    );
    log::info!("Output: {}", summary.output.display());
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    Ok(summary)
}

/// Rank journals over the persisted mentions and write the result.
///
/// An empty or venue-less mention file is not an error: the summary just
/// carries no ranking and nothing is written.
pub fn run_journals(config: &Config) -> Result<JournalSummary> {
    let start = Instant::now();
    let input = config.mentions_path();

    let mentions = load_mentions(&input, &config.retry)
        .with_context(|| format!("Failed to read mentions from {}", input.display()))?;
    log::info!("Loaded {} drug mentions", fmt_num(mentions.len()));

    let ranking = rank_journals(&mentions);
    let output = match &ranking {
        Some(ranking) => {
            let path = config.journals_path();
            save_json(ranking, &path)?;
            Some(path)
        }
        None => {
            let stale = config.journals_path();
            if stale.exists() {
                log::warn!("No ranking this run, removing stale {}", stale.display());
                std::fs::remove_file(&stale)
                    .with_context(|| format!("Failed to remove {}", stale.display()))?;
            }
            None
        }
    };

    let summary = JournalSummary {
        mentions: mentions.len(),
        ranking,
        output,
        elapsed: start.elapsed(),
    };

    log::info!("=== Journal Ranking Summary ===");
    match &summary.ranking {
        Some(r) => log::info!("Top journal: {} ({} drugs)", r.name, r.drug_count),
        None => log::info!("Top journal: no data"),
    }
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());

    Ok(summary)
}
