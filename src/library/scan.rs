use crate::models::{ScanPayload, ScannedMovie, ScannedSeason, ScannedShow};
use crate::parser::folder::{SeasonFolder, parse_media_folder, parse_season_folder};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Walks the movie and show roots and collects tagged media folders.
pub struct FolderScanner {
    movie_dir: PathBuf,
    show_dir: PathBuf,
}

impl FolderScanner {
    pub fn new(movie_dir: impl Into<PathBuf>, show_dir: impl Into<PathBuf>) -> Self {
        Self {
            movie_dir: movie_dir.into(),
            show_dir: show_dir.into(),
        }
    }

    pub fn scan(&self) -> Result<ScanPayload> {
        let movies = self.scan_movies()?;
        let shows = self.scan_shows()?;

        info!(
            movies = movies.len(),
            shows = shows.len(),
            "Folder scan complete"
        );

        Ok(ScanPayload { movies, shows })
    }

    fn scan_movies(&self) -> Result<Vec<ScannedMovie>> {
        let mut movies = Vec::new();

        for folder in list_subdirectories(&self.movie_dir)? {
            let Some(info) = parse_media_folder(&folder) else {
                debug!(folder = %folder, "Skipping movie folder without database id");
                continue;
            };

            movies.push(ScannedMovie {
                title: info.title,
                release_year: info.release_year,
                db_id: info.db_id,
            });
        }

        Ok(movies)
    }

    fn scan_shows(&self) -> Result<Vec<ScannedShow>> {
        let mut shows = Vec::new();

        for folder in list_subdirectories(&self.show_dir)? {
            let Some(info) = parse_media_folder(&folder) else {
                debug!(folder = %folder, "Skipping show folder without database id");
                continue;
            };

            let mut seasons = Vec::new();
            for inner in list_subdirectories(&self.show_dir.join(&folder))? {
                match parse_season_folder(&inner) {
                    SeasonFolder::Season(number) => seasons.push(ScannedSeason { number }),
                    SeasonFolder::Invalid => {
                        warn!(show = %folder, folder = %inner, "Ignoring season folder with a non-numeric season");
                    }
                    SeasonFolder::Other => {}
                }
            }

            shows.push(ScannedShow {
                title: info.title,
                release_year: info.release_year,
                db_id: info.db_id,
                seasons,
            });
        }

        Ok(shows)
    }
}

/// Names of the immediate sub-directories of `root`, sorted.
fn list_subdirectories(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        anyhow::bail!("Directory does not exist: {}", root.display());
    }

    let mut names = Vec::new();
    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to list {}", root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        } else {
            warn!(path = %entry.path().display(), "Skipping folder with a non UTF-8 name");
        }
    }

    Ok(names)
}
