//! One Pace metadata generation command handler

use crate::config::Config;
use crate::services::{GenerateOptions, OnePaceGenerator};
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub csv_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub start_season: Option<u32>,
    pub summaries: Option<PathBuf>,
    pub sagas: Option<PathBuf>,
}

pub fn cmd_generate_one_pace(config: &Config, args: GenerateArgs) -> anyhow::Result<()> {
    let mut options = GenerateOptions::from_config(&config.one_pace);
    if let Some(csv_dir) = args.csv_dir {
        options.csv_dir = csv_dir;
    }
    if let Some(output) = args.output {
        options.output = output;
    }
    if let Some(start_season) = args.start_season {
        anyhow::ensure!(start_season >= 1, "--start-season must be >= 1");
        options.start_season = start_season;
    }
    if let Some(summaries) = args.summaries {
        options.summaries = summaries;
    }
    if let Some(sagas) = args.sagas {
        options.sagas = sagas;
    }

    let summary = OnePaceGenerator::new(options).run()?;

    println!();
    println!("{:-<70}", "");
    println!("One Pace metadata generated!");
    println!("  Arcs:     {}", summary.arcs);
    println!("  Episodes: {}", summary.episodes);
    println!("  Output:   {}", summary.output.display());

    Ok(())
}
