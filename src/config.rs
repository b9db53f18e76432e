use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub plex: PlexConfig,

    pub tmdb: TmdbConfig,

    pub dispatch: DispatchConfig,

    pub library: LibraryConfig,

    pub collections: CollectionsConfig,

    pub one_pace: OnePaceConfig,

    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlexConfig {
    pub url: String,

    pub token: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:32400".to_string(),
            token: String::new(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_key: String,

    pub base_url: String,

    pub request_timeout_seconds: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub api_base: String,

    /// `owner/name` of the repository receiving the dispatch event
    pub repository: String,

    /// Fine-grained personal access token with `contents: write`
    pub token: String,

    pub event_type: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            repository: "ChaseRoohms/kometa-configs".to_string(),
            token: String::new(),
            event_type: "metadata_file_update".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub movie_dir: String,

    pub show_dir: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            movie_dir: "/media/plex/movies".to_string(),
            show_dir: "/media/plex/shows".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    /// Kometa config holding `url_poster_mappings`
    pub poster_config: String,

    pub movie_mapping_key: String,

    pub show_mapping_key: String,

    /// Collections never audited (studios, charts, universes)
    pub bypass: Vec<String>,

    /// Plex collection name -> TMDB collection name
    pub name_replacements: BTreeMap<String, String>,

    /// Collections ending in one of these are treated as generic groupings
    pub generic_suffixes: Vec<String>,

    /// Removed, in order, from fetched TMDB titles
    pub title_suffixes: Vec<String>,

    pub search_url: String,

    pub output_dir: String,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        let name_replacements = [
            ("28 Days/Weeks Later", "28 Days/Weeks/Years Later"),
            ("Godzilla (MonsterVerse)", "Godzilla"),
            ("Berserk: Golden Age Arc", "Berserk: The Golden Age Arc"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self {
            poster_config: "config.yml".to_string(),
            movie_mapping_key: "franchise_movie_posters".to_string(),
            show_mapping_key: "franchise_show_posters".to_string(),
            bypass: [
                "Alien / Predator",
                "A24",
                "Illumination Entertainment",
                "DreamWorks Studios",
                "Marvel Studios",
                "Pixar",
                "Plex Popular",
                "IMDb Popular",
                "IMDb Top 250",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            name_replacements,
            generic_suffixes: [" Movies", " Universe", " Series", " Shows"]
                .into_iter()
                .map(String::from)
                .collect(),
            title_suffixes: vec![" - Collection".to_string(), "Collection".to_string()],
            search_url: "https://www.themoviedb.org/search?query=".to_string(),
            output_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OnePaceConfig {
    pub csv_dir: String,

    pub output: String,

    pub summaries: String,

    pub sagas: String,

    pub start_season: u32,

    /// Key of the show under `metadata:`
    pub show_title: String,

    /// `{season}` is replaced by the season number
    pub season_poster_template: String,

    /// Root fields used when no previous output exists
    pub defaults: ShowDefaults,
}

impl Default for OnePaceConfig {
    fn default() -> Self {
        Self {
            csv_dir: "data/one-pace/csvs".to_string(),
            output: "metadata/one-pace.yml".to_string(),
            summaries: "data/one-pace/summaries.yml".to_string(),
            sagas: "data/one-pace/sagas.yml".to_string(),
            start_season: 1,
            show_title: "One Pace".to_string(),
            season_poster_template: format!("{ASSETS_BASE}/seasons/{{season}}.png"),
            defaults: ShowDefaults::default(),
        }
    }
}

const ASSETS_BASE: &str =
    "https://raw.githubusercontent.com/chase-roohms/kometa-configs/main/assets/one-pace";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub title: String,
}

/// Parent-level Kometa fields, serialized in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowDefaults {
    #[serde(rename = "match")]
    pub match_rule: MatchConfig,
    pub label_title: String,
    pub sort_title: String,
    pub original_title: String,
    pub use_original_title: String,
    pub release_year: String,
    pub url_poster: String,
    pub url_background: String,
    pub url_logo: String,
    pub studio: String,
    pub audio_language: String,
    pub tagline: String,
    pub summary: String,
    #[serde(rename = "genre.sync")]
    pub genre_sync: Vec<String>,
}

impl Default for ShowDefaults {
    fn default() -> Self {
        Self {
            match_rule: MatchConfig {
                title: "One Pace".to_string(),
            },
            label_title: "One Pace".to_string(),
            sort_title: "One Pace".to_string(),
            original_title: "One Piece".to_string(),
            use_original_title: "no".to_string(),
            release_year: "2013".to_string(),
            url_poster: format!("{ASSETS_BASE}/parent.png"),
            url_background: format!("{ASSETS_BASE}/background.png"),
            url_logo: format!("{ASSETS_BASE}/logo.png"),
            studio: "Toei Animation".to_string(),
            audio_language: "ja-JP".to_string(),
            tagline: "The dreams of pirates will never end!".to_string(),
            summary: "One Pace is a fan project that recuts the One Piece anime in an attempt \
                      to make the anime pacing more bearable. The team accomplishes this by \
                      removing filler scenes not present in the source material. This process \
                      requires meticulous editing and quality control to ensure seamless music \
                      and transitions. One Pace includes everything that is in the manga, plus \
                      a little bit of anime only content where it is appropriate."
                .to_string(),
            genre_sync: vec!["Anime".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub movie_report: String,

    pub show_report: String,

    pub poster_search_url: String,

    pub movie_link_base: String,

    pub show_link_base: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            movie_report: "poster_report_movies.md".to_string(),
            show_report: "poster_report_shows.md".to_string(),
            poster_search_url: "https://theposterdb.com/search".to_string(),
            movie_link_base: "https://www.themoviedb.org/movie/".to_string(),
            show_link_base: "https://www.thetvdb.com/search?query=".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Loads `path` when given, otherwise searches the default locations.
    pub fn load_or_default_paths(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                info!("Loading config from: {}", path.display());
                Self::load_from_path(path)
            }
            None => Self::load(),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("kometa-kit").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".kometa-kit").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("kometa-kit.toml")
    }

    /// Writes the default config to `path` (or `./kometa-kit.toml`) unless
    /// a file is already there.
    pub fn create_default_if_missing(path: Option<&Path>) -> Result<bool> {
        let path = path.map_or_else(Self::default_config_path, Path::to_path_buf);
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.one_pace.start_season == 0 {
            anyhow::bail!("one_pace.start_season must be >= 1");
        }

        if !self.one_pace.season_poster_template.contains("{season}") {
            anyhow::bail!("one_pace.season_poster_template must contain {{season}}");
        }

        Ok(())
    }

    /// Checks the credentials `audit-collections` needs.
    pub fn validate_audit(&self) -> Result<()> {
        if self.plex.url.is_empty() {
            anyhow::bail!("Plex URL cannot be empty");
        }
        if self.plex.token.is_empty() {
            anyhow::bail!("Plex token is not set (plex.token or --plex-token)");
        }
        if self.tmdb.api_key.is_empty() {
            anyhow::bail!("TMDB API key is not set (tmdb.api_key or --tmdb-api-key)");
        }
        Ok(())
    }

    /// Checks the settings a repository dispatch needs.
    pub fn validate_dispatch(&self) -> Result<()> {
        if self.dispatch.repository.split('/').filter(|s| !s.is_empty()).count() != 2 {
            anyhow::bail!(
                "dispatch.repository must be in owner/name form, got '{}'",
                self.dispatch.repository
            );
        }
        if self.dispatch.token.is_empty() {
            anyhow::bail!("Dispatch token is not set (dispatch.token or --token)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.one_pace.start_season, 1);
        assert_eq!(config.plex.url, "http://localhost:32400");
        assert_eq!(config.dispatch.event_type, "metadata_file_update");
        assert!(config.collections.bypass.contains(&"A24".to_string()));
        assert_eq!(
            config.collections.name_replacements.get("Godzilla (MonsterVerse)"),
            Some(&"Godzilla".to_string())
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[one_pace.defaults]"));
        assert!(toml_str.contains("\"genre.sync\""));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [one_pace]
            start_season = 3

            [one_pace.defaults]
            tagline = "Custom"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.one_pace.start_season, 3);
        assert_eq!(config.one_pace.defaults.tagline, "Custom");
        assert_eq!(config.one_pace.defaults.studio, "Toei Animation");
        assert_eq!(config.library.movie_dir, "/media/plex/movies");
    }

    #[test]
    fn test_create_default_and_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");

        assert!(Config::create_default_if_missing(Some(&path)).unwrap());
        assert!(!Config::create_default_if_missing(Some(&path)).unwrap());

        let config = Config::load_or_default_paths(Some(&path)).unwrap();
        assert_eq!(config.one_pace.show_title, "One Pace");

        let missing = dir.path().join("missing.toml");
        assert!(Config::load_or_default_paths(Some(&missing)).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.one_pace.season_poster_template = "https://example.com/poster.png".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        assert!(config.validate_dispatch().is_err());
        config.dispatch.token = "ghp_test".to_string();
        assert!(config.validate_dispatch().is_ok());
        config.dispatch.repository = "no-slash".to_string();
        assert!(config.validate_dispatch().is_err());
    }
}
