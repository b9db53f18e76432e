//! Folder scan command handler

use crate::clients::DispatchClient;
use crate::config::Config;
use crate::library::{FolderScanner, write_atomic};
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct ScanArgs {
    pub movie_dir: Option<PathBuf>,
    pub show_dir: Option<PathBuf>,
    pub repository: Option<String>,
    pub token: Option<String>,
    pub output: Option<PathBuf>,
    pub dispatch: bool,
    pub dry_run: bool,
}

/// What `scan-folders` does with the payload once the scan is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPlan {
    pub print: bool,
    pub write: bool,
    pub dispatch: bool,
}

impl ScanPlan {
    /// `--dry-run` only prints. `--output` writes the file and dispatches
    /// only with `--dispatch`; without `--output` the payload is dispatched.
    #[must_use]
    pub const fn new(has_output: bool, dispatch: bool, dry_run: bool) -> Self {
        if dry_run {
            return Self {
                print: true,
                write: false,
                dispatch: false,
            };
        }
        Self {
            print: false,
            write: has_output,
            dispatch: !has_output || dispatch,
        }
    }
}

pub async fn cmd_scan_folders(config: &Config, args: ScanArgs) -> anyhow::Result<()> {
    let movie_dir = args
        .movie_dir
        .unwrap_or_else(|| PathBuf::from(&config.library.movie_dir));
    let show_dir = args
        .show_dir
        .unwrap_or_else(|| PathBuf::from(&config.library.show_dir));

    let payload = FolderScanner::new(movie_dir, show_dir).scan()?;
    let json = serde_json::to_string_pretty(&payload)?;

    println!(
        "Found {} movie(s) and {} show(s)",
        payload.movies.len(),
        payload.shows.len()
    );

    let plan = ScanPlan::new(args.output.is_some(), args.dispatch, args.dry_run);

    if plan.print {
        println!("{json}");
    }

    if let Some(output) = args.output.as_ref().filter(|_| plan.write) {
        write_atomic(output, &json)?;
        println!("Payload written to {}", output.display());
    }

    if !plan.dispatch {
        return Ok(());
    }

    let mut config = config.clone();
    if let Some(repository) = args.repository {
        config.dispatch.repository = repository;
    }
    if let Some(token) = args.token {
        config.dispatch.token = token;
    }
    config.validate_dispatch()?;

    let client = DispatchClient::new(
        &config.dispatch.api_base,
        &config.dispatch.repository,
        &config.dispatch.token,
        &config.dispatch.event_type,
    )
    .context("Failed to create dispatch client")?;

    client
        .dispatch(&payload)
        .await
        .with_context(|| format!("Dispatch to {} failed", config.dispatch.repository))?;

    println!("Dispatch sent to {}", config.dispatch.repository);
    Ok(())
}
