//! One Pace metadata generation.
//!
//! Reads the per-arc CSV exports of the One Pace episode guide and produces a
//! Kometa metadata file with one season per arc. The root entry of an
//! existing output file is preserved; only its `seasons` are regenerated.

use crate::config::{OnePaceConfig, ShowDefaults};
use crate::constants::SCHEMA_HEADER;
use crate::constants::one_pace::{
    CHAPTERS_COLUMN, EPISODES_COLUMN, OVERVIEW_ARC_COLUMN, OVERVIEW_CHAPTERS_COLUMN,
    OVERVIEW_EPISODES_COLUMN, OVERVIEW_FILE, OVERVIEW_TOTALS_ROW, TITLE_COLUMN,
    UNRELEASED_MARKER,
};
use crate::library::document::{DocumentError, read_yaml, to_yaml_string, write_atomic};
use crate::models::one_pace::{
    OverviewRanges, ParsedArc, SagaInfo, SagasFile, SummariesFile,
};
use crate::models::{ArcSeason, EpisodeRecord, ShowDocument, ShowEntry};
use crate::parser::arc_name::{self, strip_tbr_marker};
use crate::parser::range::{clean_field, normalize_range, span};
use crate::parser::title::format_episode_title;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("CSV directory not found: {0}")]
    CsvDirNotFound(PathBuf),

    #[error("CSV file not found for arc '{arc}' (tried: {tried})")]
    ArcFileNotFound { arc: String, tried: String },

    #[error("Failed to read CSV {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Failed to list {path}: {source}")]
    ListDir {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub csv_dir: PathBuf,
    pub output: PathBuf,
    pub summaries: PathBuf,
    pub sagas: PathBuf,
    pub start_season: u32,
    pub show_title: String,
    pub season_poster_template: String,
    pub defaults: ShowDefaults,
}

impl GenerateOptions {
    #[must_use]
    pub fn from_config(config: &OnePaceConfig) -> Self {
        Self {
            csv_dir: PathBuf::from(&config.csv_dir),
            output: PathBuf::from(&config.output),
            summaries: PathBuf::from(&config.summaries),
            sagas: PathBuf::from(&config.sagas),
            start_season: config.start_season,
            show_title: config.show_title.clone(),
            season_poster_template: config.season_poster_template.clone(),
            defaults: config.defaults.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub arcs: usize,
    pub episodes: usize,
    pub output: PathBuf,
}

pub struct OnePaceGenerator {
    options: GenerateOptions,
}

impl OnePaceGenerator {
    #[must_use]
    pub const fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Builds the document and writes it to the configured output path.
    pub fn run(&self) -> Result<GenerateSummary, GenerateError> {
        let document = self.build()?;
        let content = to_yaml_string(&document, Some(SCHEMA_HEADER))?;
        write_atomic(&self.options.output, &content)?;

        let (arcs, episodes) = document
            .metadata
            .values()
            .map(|show| {
                (
                    show.seasons.len(),
                    show.seasons.values().map(|s| s.episodes.len()).sum::<usize>(),
                )
            })
            .fold((0, 0), |acc, (a, e)| (acc.0 + a, acc.1 + e));

        info!(
            arcs,
            episodes,
            output = %self.options.output.display(),
            "One Pace metadata written"
        );

        Ok(GenerateSummary {
            arcs,
            episodes,
            output: self.options.output.clone(),
        })
    }

    /// Builds the full document without touching the output file.
    pub fn build(&self) -> Result<ShowDocument, GenerateError> {
        let csv_dir = &self.options.csv_dir;
        if !csv_dir.is_dir() {
            return Err(GenerateError::CsvDirNotFound(csv_dir.clone()));
        }

        let overview = read_overview(csv_dir)?;
        let order = if overview.is_empty() {
            warn!("Could not read {OVERVIEW_FILE}.csv, using alphabetical order");
            alphabetical_arcs(csv_dir)?
        } else {
            overview.keys().cloned().collect()
        };

        let arcs = parse_arcs(csv_dir, &order)?;
        let summaries = load_summaries(&self.options.summaries);
        let sagas = load_sagas(&self.options.sagas);

        let seasons = arcs
            .iter()
            .zip(self.options.start_season..)
            .map(|(arc, number)| {
                let season = self.build_season(number, arc, &overview, &summaries, &sagas);
                (number, season)
            })
            .collect();

        let fields = load_root_fields(
            &self.options.output,
            &self.options.show_title,
            &self.options.defaults,
        )?;

        let mut metadata = IndexMap::new();
        metadata.insert(self.options.show_title.clone(), ShowEntry { fields, seasons });

        Ok(ShowDocument { metadata })
    }

    fn build_season(
        &self,
        number: u32,
        arc: &ParsedArc,
        overview: &IndexMap<String, OverviewRanges>,
        summaries: &HashMap<String, String>,
        sagas: &HashMap<String, SagaInfo>,
    ) -> ArcSeason {
        let title = strip_tbr_marker(&arc.listed_name).to_string();

        let listed = overview.get(&arc.listed_name).cloned().unwrap_or_default();
        let anime_range = listed
            .anime_episodes
            .as_deref()
            .and_then(non_empty_range)
            .or_else(|| span(arc.episodes.values().filter_map(|e| e.anime_episodes.as_deref())));
        let manga_range = listed
            .manga_chapters
            .as_deref()
            .and_then(non_empty_range)
            .or_else(|| span(arc.episodes.values().filter_map(|e| e.manga_chapters.as_deref())));

        let summary_text = arc_name::resolve(&title, |c| summaries.get(c).cloned())
            .unwrap_or_else(|| {
                warn!(arc = %title, "No summary found, using default");
                format!("The {title} Arc")
            });

        let mut summary = vec![summary_text];
        if let Some(range) = &anime_range {
            summary.push(format!("Covers anime episode(s): {range}"));
        }
        if let Some(range) = &manga_range {
            summary.push(format!("Covers manga chapter(s): {range}"));
        }

        let saga = arc_name::resolve(&title, |c| sagas.get(c).cloned());
        if saga.is_none() {
            warn!(arc = %title, "No saga found for arc");
        }

        ArcSeason {
            url_poster: self
                .options
                .season_poster_template
                .replace("{season}", &number.to_string()),
            url_background: saga.as_ref().and_then(|s| s.url_background.clone()),
            saga: saga.map(|s| s.name),
            summary: summary.join("\n"),
            episodes: arc.episodes.clone(),
            title,
        }
    }
}

fn non_empty_range(raw: &str) -> Option<String> {
    let range = normalize_range(raw.trim());
    (!range.is_empty()).then_some(range)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> GenerateError + '_ {
    move |source| GenerateError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// Arc order and listed ranges from `Arc Overview.csv`; empty when absent.
pub fn read_overview(csv_dir: &Path) -> Result<IndexMap<String, OverviewRanges>, GenerateError> {
    let path = csv_dir.join(format!("{OVERVIEW_FILE}.csv"));
    let mut arcs = IndexMap::new();

    if !path.is_file() {
        return Ok(arcs);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(csv_error(&path))?;
    let headers = reader.headers().map_err(csv_error(&path))?.clone();
    let arc_col = column(&headers, OVERVIEW_ARC_COLUMN);
    let episodes_col = column(&headers, OVERVIEW_EPISODES_COLUMN);
    let chapters_col = column(&headers, OVERVIEW_CHAPTERS_COLUMN);

    for record in reader.records() {
        let record = record.map_err(csv_error(&path))?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

        let arc = field(arc_col);
        if arc.is_empty() || arc == OVERVIEW_TOTALS_ROW {
            continue;
        }

        arcs.insert(
            arc.to_string(),
            OverviewRanges {
                anime_episodes: non_empty(field(episodes_col).to_string()),
                manga_chapters: non_empty(field(chapters_col).to_string()),
            },
        );
    }

    Ok(arcs)
}

/// Every arc CSV in the directory except the overview, by file name.
fn alphabetical_arcs(csv_dir: &Path) -> Result<Vec<String>, GenerateError> {
    let mut arcs = Vec::new();
    let walker = walkdir::WalkDir::new(csv_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| GenerateError::ListDir {
            path: csv_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !entry.file_type().is_file() || !is_csv {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            && stem != OVERVIEW_FILE
        {
            arcs.push(stem.to_string());
        }
    }

    Ok(arcs)
}

/// Locates the CSV for an arc, trying each name candidate in order.
pub fn find_arc_file(csv_dir: &Path, arc: &str) -> Result<PathBuf, GenerateError> {
    let candidates = arc_name::candidates(arc);

    arc_name::resolve(arc, |candidate| {
        let path = csv_dir.join(format!("{candidate}.csv"));
        path.is_file().then_some(path)
    })
    .ok_or_else(|| GenerateError::ArcFileNotFound {
        arc: arc.to_string(),
        tried: candidates
            .iter()
            .map(|c| format!("{c}.csv"))
            .collect::<Vec<_>>()
            .join(", "),
    })
}

fn parse_arcs(csv_dir: &Path, order: &[String]) -> Result<Vec<ParsedArc>, GenerateError> {
    let mut arcs = Vec::with_capacity(order.len());

    for listed_name in order {
        let path = find_arc_file(csv_dir, listed_name)?;
        let file_stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(listed_name)
            .to_string();

        info!(arc = %listed_name, file = %path.display(), "Processing arc");
        let episodes = parse_arc_file(&path, &file_stem)?;

        if episodes.is_empty() {
            warn!(arc = %listed_name, "No episodes found, skipping");
            continue;
        }

        info!(arc = %listed_name, episodes = episodes.len(), "Parsed arc");
        arcs.push(ParsedArc {
            listed_name: listed_name.clone(),
            episodes,
        });
    }

    Ok(arcs)
}

/// Parses one arc CSV into numbered episodes.
///
/// Rows without a title and unreleased rows are skipped and do not take an
/// episode number.
pub fn parse_arc_file(
    path: &Path,
    arc_name: &str,
) -> Result<BTreeMap<u32, EpisodeRecord>, GenerateError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error(path))?;
    let headers = reader.headers().map_err(csv_error(path))?.clone();
    let title_col = column(&headers, TITLE_COLUMN);
    let chapters_col = column(&headers, CHAPTERS_COLUMN);
    let episodes_col = column(&headers, EPISODES_COLUMN);

    let mut episodes = BTreeMap::new();
    let mut number = 1;

    for record in reader.records() {
        let record = record.map_err(csv_error(path))?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let raw_title = field(title_col).trim();
        if raw_title.is_empty() || raw_title.contains(UNRELEASED_MARKER) {
            continue;
        }

        let manga_chapters = non_empty(clean_field(field(chapters_col)));
        let anime_episodes = non_empty(clean_field(field(episodes_col)));

        let mut summary = Vec::new();
        if let Some(range) = &anime_episodes {
            summary.push(format!("Covers anime episode(s): {range}"));
        }
        if let Some(range) = &manga_chapters {
            summary.push(format!("Covers manga chapter(s): {range}"));
        }

        episodes.insert(
            number,
            EpisodeRecord {
                title: format_episode_title(raw_title, arc_name, anime_episodes.as_deref()),
                anime_episodes,
                manga_chapters,
                summary: (!summary.is_empty()).then(|| summary.join("\n")),
            },
        );
        number += 1;
    }

    Ok(episodes)
}

/// Arc name -> summary from the summaries file; empty when unavailable.
pub fn load_summaries(path: &Path) -> HashMap<String, String> {
    if !path.is_file() {
        warn!(path = %path.display(), "Summaries file not found");
        return HashMap::new();
    }

    match read_yaml::<SummariesFile>(path) {
        Ok(file) => file
            .arcs
            .into_iter()
            .filter_map(|(arc, entry)| {
                let summary = entry?.summary?;
                (!summary.trim().is_empty()).then_some((arc, summary))
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "Could not read summaries file");
            HashMap::new()
        }
    }
}

/// Arc name -> saga from the sagas file; empty when unavailable.
pub fn load_sagas(path: &Path) -> HashMap<String, SagaInfo> {
    if !path.is_file() {
        warn!(path = %path.display(), "Sagas file not found");
        return HashMap::new();
    }

    match read_yaml::<SagasFile>(path) {
        Ok(file) => {
            let mut arcs = HashMap::new();
            for (name, saga) in file.sagas {
                let info = SagaInfo {
                    name,
                    url_background: saga.url_background.filter(|u| !u.is_empty()),
                };
                for arc in saga.arcs {
                    arcs.insert(arc, info.clone());
                }
            }
            arcs
        }
        Err(e) => {
            warn!(error = %e, "Could not read sagas file");
            HashMap::new()
        }
    }
}

/// Root fields for the show entry.
///
/// Taken from the previous output when it has an entry for `show_title`
/// (minus `seasons`), otherwise from the configured defaults. A previous
/// output that exists but cannot be parsed is an error.
pub fn load_root_fields(
    output: &Path,
    show_title: &str,
    defaults: &ShowDefaults,
) -> Result<Mapping, GenerateError> {
    if output.is_file() {
        let existing: Value = read_yaml(output)?;
        let root = existing
            .get("metadata")
            .and_then(|m| m.get(show_title))
            .and_then(Value::as_mapping);

        if let Some(root) = root {
            debug!(path = %output.display(), "Preserving root fields from existing metadata");
            return Ok(root
                .iter()
                .filter(|(key, _)| key.as_str() != Some("seasons"))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect());
        }

        warn!(
            path = %output.display(),
            show = show_title,
            "Existing metadata has no entry for this show, using default metadata values"
        );
    } else {
        warn!(
            path = %output.display(),
            "Existing metadata file not found, using default metadata values"
        );
    }

    match serde_yaml::to_value(defaults).map_err(DocumentError::from)? {
        Value::Mapping(fields) => Ok(fields),
        _ => Ok(Mapping::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "One Pace Episode,Chapters,Episodes\n";

    #[test]
    fn test_parse_arc_file_numbers_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Orange Town.csv");
        fs::write(
            &path,
            format!(
                "{HEADER}Orange Town 01,Ch. 8-10,Ep. 4-5\n,,\nOrange Town Forward,,\nOrange Town 02,\"Ch. 11,\n12\",6\n"
            ),
        )
        .unwrap();

        let episodes = parse_arc_file(&path, "Orange Town").unwrap();
        assert_eq!(episodes.len(), 2);

        let first = &episodes[&1];
        assert_eq!(first.title, "Orange Town Pt. 1 (4 - 5)");
        assert_eq!(first.manga_chapters.as_deref(), Some("8 - 10"));
        assert_eq!(
            first.summary.as_deref(),
            Some("Covers anime episode(s): 4 - 5\nCovers manga chapter(s): 8 - 10")
        );

        let second = &episodes[&2];
        assert_eq!(second.title, "Orange Town Pt. 2 (6)");
        assert_eq!(second.manga_chapters.as_deref(), Some("11, 12"));
    }

    #[test]
    fn test_parse_arc_file_leading_space_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Loguetown.csv");
        fs::write(&path, " One Pace Episode,Chapters,Episodes\nLoguetown 01,,\n").unwrap();

        let episodes = parse_arc_file(&path, "Loguetown").unwrap();
        let first = &episodes[&1];
        assert_eq!(first.title, "Loguetown Pt. 1");
        assert!(first.anime_episodes.is_none());
        assert!(first.summary.is_none());
    }

    #[test]
    fn test_find_arc_file_variants() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Arlongs Park.csv"), HEADER).unwrap();
        fs::write(dir.path().join("Straw Hat.csv"), HEADER).unwrap();

        let found = find_arc_file(dir.path(), "Arlong's Park (WIP)").unwrap();
        assert!(found.ends_with("Arlongs Park.csv"));

        let found = find_arc_file(dir.path(), "Straw Hats").unwrap();
        assert!(found.ends_with("Straw Hat.csv"));
    }

    #[test]
    fn test_find_arc_file_reports_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_arc_file(dir.path(), "Jaya's Islands").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Jaya's Islands.csv"));
        assert!(message.contains("Jayas Islands.csv"));
        assert!(message.contains("Jayas Island.csv"));
    }

    #[test]
    fn test_read_overview_skips_totals() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Arc Overview.csv"),
            "Arcs,Anime Episodes,Manga Chapters\nRomance Dawn,1-3,1-7\nOrange Town,,\n,,\nTotals,1-1100,1-1100\n",
        )
        .unwrap();

        let overview = read_overview(dir.path()).unwrap();
        let names: Vec<&str> = overview.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Romance Dawn", "Orange Town"]);
        assert_eq!(overview["Romance Dawn"].anime_episodes.as_deref(), Some("1-3"));
        assert!(overview["Orange Town"].manga_chapters.is_none());
    }

    #[test]
    fn test_load_sagas_maps_arcs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sagas.yml");
        fs::write(
            &path,
            "sagas:\n  East Blue:\n    url_background: https://example.com/east.png\n    arcs:\n      - Romance Dawn\n      - Orange Town\n  Alabasta:\n    url_background: ''\n    arcs: [Reverse Mountain]\n",
        )
        .unwrap();

        let sagas = load_sagas(&path);
        assert_eq!(sagas["Orange Town"].name, "East Blue");
        assert_eq!(
            sagas["Romance Dawn"].url_background.as_deref(),
            Some("https://example.com/east.png")
        );
        assert!(sagas["Reverse Mountain"].url_background.is_none());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_saga_miss_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let csvs = dir.path().join("csvs");
        fs::create_dir_all(&csvs).unwrap();
        fs::write(csvs.join("Loguetown.csv"), format!("{HEADER}Loguetown 01,96-100,48\n")).unwrap();
        let sagas = dir.path().join("sagas.yml");
        fs::write(&sagas, "sagas:\n  East Blue:\n    arcs: [Romance Dawn]\n").unwrap();

        let mut options = GenerateOptions::from_config(&OnePaceConfig::default());
        options.csv_dir = csvs;
        options.output = dir.path().join("one-pace.yml");
        options.summaries = dir.path().join("summaries.yml");
        options.sagas = sagas;

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        let document = tracing::subscriber::with_default(subscriber, || {
            OnePaceGenerator::new(options).build().unwrap()
        });
        assert!(!document.metadata.is_empty());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let line = output
            .lines()
            .find(|l| l.contains("No saga found"))
            .unwrap_or_else(|| panic!("saga miss not logged: {output}"));
        assert!(line.contains("WARN"));
        assert!(line.contains("Loguetown"));
    }

    #[test]
    fn test_load_summaries_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_summaries(&dir.path().join("nope.yml")).is_empty());
    }

    #[test]
    fn test_load_root_fields_drops_seasons() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one-pace.yml");
        fs::write(
            &path,
            "metadata:\n  One Pace:\n    label_title: Custom\n    seasons:\n      1:\n        title: Old\n    tagline: Kept\n",
        )
        .unwrap();

        let fields = load_root_fields(&path, "One Pace", &ShowDefaults::default()).unwrap();
        let keys: Vec<&str> = fields.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["label_title", "tagline"]);
    }

    #[test]
    fn test_load_root_fields_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let fields =
            load_root_fields(&dir.path().join("none.yml"), "One Pace", &ShowDefaults::default())
                .unwrap();
        let keys: Vec<&str> = fields.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys.first(), Some(&"match"));
        assert!(keys.contains(&"genre.sync"));
        assert_eq!(
            fields.get("studio").and_then(Value::as_str),
            Some("Toei Animation")
        );
    }

    #[test]
    fn test_load_root_fields_rejects_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one-pace.yml");
        fs::write(&path, "metadata: {One Pace: [").unwrap();
        assert!(load_root_fields(&path, "One Pace", &ShowDefaults::default()).is_err());
    }
}
