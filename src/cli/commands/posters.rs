//! Missing poster report command handler

use crate::config::Config;
use crate::library::load_metadata_document;
use crate::models::MediaKind;
use crate::services::poster_report::{missing_movie_posters, missing_show_posters, write_report};
use std::path::{Path, PathBuf};

pub fn cmd_find_missing_posters(
    config: &Config,
    movie_file: &Path,
    show_file: &Path,
    movie_report: Option<PathBuf>,
    show_report: Option<PathBuf>,
) -> anyhow::Result<()> {
    let movies = load_metadata_document(movie_file)?;
    let shows = load_metadata_document(show_file)?;

    let movie_report =
        movie_report.unwrap_or_else(|| PathBuf::from(&config.reports.movie_report));
    let show_report = show_report.unwrap_or_else(|| PathBuf::from(&config.reports.show_report));

    let missing_movies = missing_movie_posters(&movies.metadata);
    let missing_shows = missing_show_posters(&shows.metadata);

    write_report(&movie_report, MediaKind::Movie, &missing_movies, &config.reports)?;
    write_report(&show_report, MediaKind::Show, &missing_shows, &config.reports)?;

    println!("{} movie(s) missing a poster -> {}", missing_movies.len(), movie_report.display());
    println!("{} show(s) missing posters -> {}", missing_shows.len(), show_report.display());

    Ok(())
}
