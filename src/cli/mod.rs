//! CLI module - Command-line interface for kometa-kit
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kometa-kit - Kometa metadata utilities
/// Generates, updates and audits Kometa metadata files
#[derive(Parser)]
#[command(name = "kometa-kit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every sheet of a spreadsheet to a CSV file
    #[command(alias = "xlsx")]
    ExportSheets {
        /// Input .xlsx/.xls file
        input: PathBuf,
        /// Directory receiving one CSV per sheet
        output: PathBuf,
    },

    /// Report Plex franchise collections without a poster mapping
    #[command(alias = "audit")]
    AuditCollections {
        /// Plex server URL
        #[arg(long)]
        plex_url: Option<String>,
        /// Plex authentication token
        #[arg(long)]
        plex_token: Option<String>,
        /// TMDB API key
        #[arg(long)]
        tmdb_api_key: Option<String>,
        /// Kometa config holding `url_poster_mappings`
        #[arg(long)]
        poster_config: Option<PathBuf>,
        /// Directory for the missing collection reports
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Generate the One Pace metadata file from the episode guide CSVs
    #[command(alias = "one-pace")]
    GenerateOnePace {
        /// Directory with one CSV per arc
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        /// Output YAML file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Season number of the first arc
        #[arg(long)]
        start_season: Option<u32>,
        /// YAML file with arc summaries
        #[arg(long)]
        summaries: Option<PathBuf>,
        /// YAML file with sagas and their arcs
        #[arg(long)]
        sagas: Option<PathBuf>,
    },

    /// Scan the media folders and send the result to GitHub
    #[command(alias = "scan")]
    ScanFolders {
        /// Movie library root
        #[arg(long)]
        movie_dir: Option<PathBuf>,
        /// Show library root
        #[arg(long)]
        show_dir: Option<PathBuf>,
        /// Repository receiving the dispatch (owner/name)
        #[arg(long)]
        repository: Option<String>,
        /// GitHub token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Write the payload JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also dispatch when --output is given
        #[arg(long)]
        dispatch: bool,
        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Merge a folder scan into the movie and show metadata files
    #[command(alias = "update")]
    UpdateMetadata {
        /// Movie metadata file
        #[arg(long)]
        movie_file: PathBuf,
        /// Show metadata file
        #[arg(long)]
        show_file: PathBuf,
        /// Scan payload as a JSON string
        #[arg(long, conflicts_with = "json_file", required_unless_present = "json_file")]
        json_data: Option<String>,
        /// Scan payload read from a JSON file
        #[arg(long)]
        json_file: Option<PathBuf>,
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Write markdown reports of entries without a poster
    #[command(alias = "posters")]
    FindMissingPosters {
        /// Movie metadata file
        #[arg(long)]
        movie_file: PathBuf,
        /// Show metadata file
        #[arg(long)]
        show_file: PathBuf,
        /// Movie report path
        #[arg(long)]
        movie_report: Option<PathBuf>,
        /// Show report path
        #[arg(long)]
        show_report: Option<PathBuf>,
    },

    /// Create default config file
    Init,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::parse_from(["kometa-kit", "generate-one-pace", "--start-season", "2"]);
        match cli.command {
            Commands::GenerateOnePace {
                start_season,
                csv_dir,
                ..
            } => {
                assert_eq!(start_season, Some(2));
                assert!(csv_dir.is_none());
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_update_requires_payload() {
        let result = Cli::try_parse_from([
            "kometa-kit",
            "update-metadata",
            "--movie-file",
            "movies.yml",
            "--show-file",
            "shows.yml",
        ]);
        assert!(result.is_err());
    }
}
