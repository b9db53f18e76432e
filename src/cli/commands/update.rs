//! Metadata update command handler

use crate::models::ScanPayload;
use crate::services::{MergeStats, MetadataUpdater};
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct UpdateArgs {
    pub movie_file: PathBuf,
    pub show_file: PathBuf,
    pub json_data: Option<String>,
    pub json_file: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn cmd_update_metadata(args: UpdateArgs) -> anyhow::Result<()> {
    let payload = match (&args.json_data, &args.json_file) {
        (Some(data), _) => ScanPayload::from_json(data).context("Invalid --json-data payload")?,
        (None, Some(path)) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ScanPayload::from_json(&data)
                .with_context(|| format!("Invalid payload in {}", path.display()))?
        }
        (None, None) => anyhow::bail!("Provide the scan payload with --json-data or --json-file"),
    };

    let updater = MetadataUpdater::new(&args.movie_file, &args.show_file);
    let summary = updater.update(&payload, args.dry_run)?;

    println!();
    println!("{:-<70}", "");
    if args.dry_run {
        println!("Dry run, no files written");
    }
    print_stats("Movies", &summary.movies);
    print_stats("Shows", &summary.shows);

    if summary.written.is_empty() && !args.dry_run {
        println!("Metadata already up to date");
    }
    for path in &summary.written {
        println!("Updated {}", path.display());
    }

    Ok(())
}

fn print_stats(label: &str, stats: &MergeStats) {
    println!("{label}:");
    println!("  Added:    {}", stats.added);
    println!("  Updated:  {}", stats.updated);
    println!("  Retained: {}", stats.retained);
    if stats.seasons_added > 0 {
        println!("  New seasons: {}", stats.seasons_added);
    }
}
