//! Collection poster audit command handler

use crate::clients::{PlexClient, TmdbClient};
use crate::config::Config;
use crate::models::MediaKind;
use crate::services::CollectionAuditor;
use crate::services::collections::{load_poster_config, write_report};
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct AuditArgs {
    pub plex_url: Option<String>,
    pub plex_token: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub poster_config: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

pub async fn cmd_audit_collections(config: &Config, args: AuditArgs) -> anyhow::Result<()> {
    let mut config = config.clone();
    if let Some(url) = args.plex_url {
        config.plex.url = url;
    }
    if let Some(token) = args.plex_token {
        config.plex.token = token;
    }
    if let Some(key) = args.tmdb_api_key {
        config.tmdb.api_key = key;
    }
    config.validate_audit()?;

    let poster_config_path = args
        .poster_config
        .unwrap_or_else(|| PathBuf::from(&config.collections.poster_config));
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.collections.output_dir));

    let poster_config = load_poster_config(&poster_config_path)?;

    let plex = PlexClient::new(
        &config.plex.url,
        &config.plex.token,
        config.plex.request_timeout_seconds,
    )
    .context("Failed to create Plex client")?;
    let tmdb = TmdbClient::new(
        &config.tmdb.base_url,
        &config.tmdb.api_key,
        config.tmdb.request_timeout_seconds,
    )
    .context("Failed to create TMDB client")?;

    let search_url = config.collections.search_url.clone();
    let auditor = CollectionAuditor::new(plex, tmdb, config.collections);

    let mut reports = Vec::new();
    for kind in [MediaKind::Movie, MediaKind::Show] {
        let report = auditor.audit(kind, &poster_config).await?;
        if let Some(path) = write_report(&report, &output_dir, &search_url)? {
            println!("Wrote {}", path.display());
        }
        reports.push(report);
    }

    let missing: usize = reports.iter().map(|r| r.missing.len()).sum();

    println!();
    println!("{:-<70}", "");
    for report in &reports {
        let label = match report.kind {
            MediaKind::Movie => "Movie",
            MediaKind::Show => "Show",
        };
        println!("{} Plex {label} Collections Found", report.plex.len());
        println!("{} TMDB {label} Collections Found", report.configured.len());
    }
    println!("{missing} Missing Collection Posters Found");

    Ok(())
}
