//! Markdown reports of metadata entries that still need a poster.

use crate::config::ReportsConfig;
use crate::constants::scan::UNKNOWN_YEAR;
use crate::library::document::{DocumentError, write_atomic};
use crate::models::media::has_value;
use crate::models::{MediaEntry, MediaKind};
use indexmap::IndexMap;
use std::fmt::Write as _;
use std::path::Path;

const PARENT: &str = "Parent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPoster {
    pub db_id: u64,
    pub title: String,
    pub release_year: String,
    /// `Parent` and/or season numbers; empty for movies.
    pub seasons: Vec<String>,
}

impl MissingPoster {
    fn new(db_id: u64, entry: &MediaEntry, seasons: Vec<String>) -> Self {
        Self {
            db_id,
            title: entry.label_title.clone().unwrap_or_default(),
            release_year: entry
                .release_year
                .as_ref()
                .map_or_else(|| UNKNOWN_YEAR.to_string(), ToString::to_string),
            seasons,
        }
    }
}

/// Movies whose `url_poster` is absent or empty.
#[must_use]
pub fn missing_movie_posters(entries: &IndexMap<u64, MediaEntry>) -> Vec<MissingPoster> {
    entries
        .iter()
        .filter(|(_, entry)| !entry.has_poster())
        .map(|(db_id, entry)| MissingPoster::new(*db_id, entry, Vec::new()))
        .collect()
}

/// Shows missing the parent poster or any season poster.
///
/// Seasons written as bare `N:` lines are not reported.
#[must_use]
pub fn missing_show_posters(entries: &IndexMap<u64, MediaEntry>) -> Vec<MissingPoster> {
    entries
        .iter()
        .filter_map(|(db_id, entry)| {
            let mut seasons = Vec::new();
            if !entry.has_poster() {
                seasons.push(PARENT.to_string());
            }

            for (number, season) in entry.seasons.iter().flatten() {
                if let Some(season) = season
                    && !has_value(season.url_poster.as_deref())
                {
                    seasons.push(number.to_string());
                }
            }

            (!seasons.is_empty()).then(|| MissingPoster::new(*db_id, entry, seasons))
        })
        .collect()
}

/// `ThePosterDB` search link for a title.
#[must_use]
pub fn poster_search_link(base: &str, title: &str, kind: MediaKind) -> String {
    let term = title
        .split(' ')
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+");
    format!("{base}?term={term}&section={}", kind.plural())
}

#[must_use]
pub fn render_report(kind: MediaKind, missing: &[MissingPoster], config: &ReportsConfig) -> String {
    let mut out = String::new();
    let heading = match kind {
        MediaKind::Movie => "Movies",
        MediaKind::Show => "Shows",
    };
    let _ = write!(out, "## {heading} missing a url_poster\n\n");

    if missing.is_empty() {
        let _ = write!(
            out,
            "All {} have a poster linked, check back later!",
            kind.plural()
        );
        return out;
    }

    match kind {
        MediaKind::Movie => {
            out.push_str("|TMDB ID|Title|Release Year|Find a Poster|\n");
            out.push_str("|-------|-----|------------|-------------|\n");
        }
        MediaKind::Show => {
            out.push_str("|TMDB ID|Title|Release Year|Missing Seasons|Find a Poster|\n");
            out.push_str("|-------|-----|------------|---------------|-------------|\n");
        }
    }

    let link_base = match kind {
        MediaKind::Movie => &config.movie_link_base,
        MediaKind::Show => &config.show_link_base,
    };

    for item in missing {
        let id = format!("[{0}]({link_base}{0})", item.db_id);
        let search = format!(
            "[Search on TPDB]({})",
            poster_search_link(&config.poster_search_url, &item.title, kind)
        );
        let _ = match kind {
            MediaKind::Movie => writeln!(
                out,
                "|{id}|{}|{}|{search}|",
                item.title, item.release_year
            ),
            MediaKind::Show => writeln!(
                out,
                "|{id}|{}|{}|{}|{search}|",
                item.title,
                item.release_year,
                item.seasons.join(", ")
            ),
        };
    }

    out
}

pub fn write_report(
    path: &Path,
    kind: MediaKind,
    missing: &[MissingPoster],
    config: &ReportsConfig,
) -> Result<(), DocumentError> {
    write_atomic(path, &render_report(kind, missing, config))
}
