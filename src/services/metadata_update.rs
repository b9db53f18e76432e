//! Merges a folder scan into the movie and show metadata documents.
//!
//! Operator-entered values always win; the scan only fills what is missing.
//! Nothing is ever removed.

use crate::library::document::{DocumentError, load_metadata_document, save_metadata_document};
use crate::models::{MediaEntry, ReleaseYear, ScanPayload, ScannedMovie, ScannedShow, SeasonEntry};
use crate::parser::title::{sort_key, sort_title};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

type Entries = IndexMap<u64, MediaEntry>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    /// Scanned items that had no entry yet.
    pub added: usize,
    /// Existing entries that gained fields or seasons.
    pub updated: usize,
    /// Existing entries that were not part of the scan.
    pub retained: usize,
    pub seasons_added: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    pub movies: MergeStats,
    pub shows: MergeStats,
    /// Files that were rewritten; empty for a dry run or when nothing changed.
    pub written: Vec<PathBuf>,
}

pub struct MetadataUpdater {
    movie_file: PathBuf,
    show_file: PathBuf,
}

impl MetadataUpdater {
    #[must_use]
    pub fn new(movie_file: impl Into<PathBuf>, show_file: impl Into<PathBuf>) -> Self {
        Self {
            movie_file: movie_file.into(),
            show_file: show_file.into(),
        }
    }

    pub fn update(&self, payload: &ScanPayload, dry_run: bool) -> Result<UpdateSummary, DocumentError> {
        let mut movie_doc = load_metadata_document(&self.movie_file)?;
        let mut show_doc = load_metadata_document(&self.show_file)?;

        let (movies, movie_stats) = merge_movies(&movie_doc.metadata, &payload.movies);
        let (shows, show_stats) = merge_shows(&show_doc.metadata, &payload.shows);

        let mut written = Vec::new();
        if !dry_run {
            if !same_order_and_content(&movies, &movie_doc.metadata) {
                movie_doc.metadata = movies;
                save_metadata_document(&self.movie_file, &movie_doc)?;
                written.push(self.movie_file.clone());
            }
            if !same_order_and_content(&shows, &show_doc.metadata) {
                show_doc.metadata = shows;
                save_metadata_document(&self.show_file, &show_doc)?;
                written.push(self.show_file.clone());
            }
        }

        info!(
            movies_added = movie_stats.added,
            shows_added = show_stats.added,
            files_written = written.len(),
            dry_run,
            "Metadata update finished"
        );

        Ok(UpdateSummary {
            movies: movie_stats,
            shows: show_stats,
            written,
        })
    }
}

pub fn merge_movies(existing: &Entries, scanned: &[ScannedMovie]) -> (Entries, MergeStats) {
    let mut stats = MergeStats::default();
    let mut merged = Entries::with_capacity(existing.len() + scanned.len());

    for movie in scanned {
        let previous = existing.get(&movie.db_id);
        let entry = merge_entry(previous, &movie.title, &movie.release_year);
        count_change(&mut stats, previous, &entry);
        merged.insert(movie.db_id, entry);
    }

    retain_unscanned(existing, &mut merged, &mut stats);
    sort_entries(&mut merged);
    (merged, stats)
}

pub fn merge_shows(existing: &Entries, scanned: &[ScannedShow]) -> (Entries, MergeStats) {
    let mut stats = MergeStats::default();
    let mut merged = Entries::with_capacity(existing.len() + scanned.len());

    for show in scanned {
        let previous = existing.get(&show.db_id);
        let mut entry = merge_entry(previous, &show.title, &show.release_year);

        // Kometa rejects an empty `seasons:` key.
        if !show.seasons.is_empty() {
            let seasons = entry.seasons.get_or_insert_with(BTreeMap::new);
            for season in &show.seasons {
                match seasons.get_mut(&season.number) {
                    Some(slot) => {
                        slot.get_or_insert_with(SeasonEntry::placeholder)
                            .url_poster
                            .get_or_insert_with(String::new);
                    }
                    None => {
                        seasons.insert(season.number, Some(SeasonEntry::placeholder()));
                        if previous.is_some() {
                            stats.seasons_added += 1;
                        }
                    }
                }
            }
        }

        count_change(&mut stats, previous, &entry);
        merged.insert(show.db_id, entry);
    }

    retain_unscanned(existing, &mut merged, &mut stats);
    sort_entries(&mut merged);
    (merged, stats)
}

/// Existing entry with any missing core field filled from the scan.
fn merge_entry(existing: Option<&MediaEntry>, title: &str, release_year: &str) -> MediaEntry {
    let mut entry = existing.cloned().unwrap_or_default();

    let label_title = entry
        .label_title
        .get_or_insert_with(|| title.to_string())
        .clone();
    entry
        .release_year
        .get_or_insert_with(|| ReleaseYear::from(release_year));
    entry
        .sort_title
        .get_or_insert_with(|| sort_title(&label_title));
    entry.url_poster.get_or_insert_with(String::new);

    entry
}

fn count_change(stats: &mut MergeStats, previous: Option<&MediaEntry>, entry: &MediaEntry) {
    match previous {
        None => stats.added += 1,
        Some(previous) if previous != entry => stats.updated += 1,
        Some(_) => {}
    }
}

fn retain_unscanned(existing: &Entries, merged: &mut Entries, stats: &mut MergeStats) {
    for (db_id, entry) in existing {
        if !merged.contains_key(db_id) {
            debug!(db_id, "Keeping entry not present in scan");
            merged.insert(*db_id, entry.clone());
            stats.retained += 1;
        }
    }
}

fn same_order_and_content(a: &Entries, b: &Entries) -> bool {
    a.len() == b.len() && a.iter().eq(b.iter())
}

/// Orders entries by sort title with numbers compared by value.
pub fn sort_entries(entries: &mut Entries) {
    entries.sort_by_cached_key(|_, entry| sort_key(entry.ordering_title()));
}
