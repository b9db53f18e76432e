//! Franchise collection poster audit.
//!
//! Compares the collections present in Plex with the collections that have a
//! poster mapping in the Kometa config and reports the ones without.

use crate::clients::{PlexClient, TmdbClient};
use crate::config::CollectionsConfig;
use crate::library::document::{read_yaml, write_atomic};
use crate::models::MediaKind;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const POSTER_KEY_PREFIX: &str = "url_poster_";

/// Anything that can list collection titles for a media kind.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn collection_titles(&self, kind: MediaKind) -> Result<Vec<String>>;
}

/// Anything that can resolve an id to a display name.
#[async_trait]
pub trait TitleLookup: Send + Sync {
    async fn lookup_name(&self, kind: MediaKind, id: u64) -> Result<Option<String>>;
}

#[async_trait]
impl CollectionSource for PlexClient {
    async fn collection_titles(&self, kind: MediaKind) -> Result<Vec<String>> {
        Self::collection_titles(self, kind).await
    }
}

#[async_trait]
impl TitleLookup for TmdbClient {
    async fn lookup_name(&self, kind: MediaKind, id: u64) -> Result<Option<String>> {
        self.name(kind, id).await
    }
}

/// Result of auditing one media kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub kind: MediaKind,
    pub plex: BTreeSet<String>,
    pub configured: BTreeSet<String>,
    pub missing: Vec<String>,
}

pub struct CollectionAuditor<S, L> {
    source: S,
    lookup: L,
    config: CollectionsConfig,
}

impl<S: CollectionSource, L: TitleLookup> CollectionAuditor<S, L> {
    pub const fn new(source: S, lookup: L, config: CollectionsConfig) -> Self {
        Self {
            source,
            lookup,
            config,
        }
    }

    /// Franchise-style collection names from Plex, aliased to TMDB naming.
    pub async fn plex_collections(&self, kind: MediaKind) -> Result<BTreeSet<String>> {
        let titles = self
            .source
            .collection_titles(kind)
            .await
            .with_context(|| format!("Failed to list Plex {kind} collections"))?;

        info!(kind = %kind, count = titles.len(), "Fetched Plex collections");
        Ok(franchise_collections(&self.config, titles))
    }

    /// Names of the collections that already have a poster mapping.
    pub async fn configured_collections(
        &self,
        kind: MediaKind,
        poster_config: &Value,
    ) -> BTreeSet<String> {
        let key = match kind {
            MediaKind::Movie => &self.config.movie_mapping_key,
            MediaKind::Show => &self.config.show_mapping_key,
        };

        let mut names = BTreeSet::new();
        for id in mapping_ids(poster_config, key) {
            info!(kind = %kind, id, "Grabbing TMDB title");
            match self.lookup.lookup_name(kind, id).await {
                Ok(Some(name)) => {
                    names.insert(clean_title(&name, &self.config.title_suffixes));
                }
                Ok(None) => warn!(kind = %kind, id, "Could not find TMDB entry, skipping"),
                Err(e) => warn!(kind = %kind, id, error = %e, "TMDB lookup failed, skipping"),
            }
        }
        names
    }

    pub async fn audit(&self, kind: MediaKind, poster_config: &Value) -> Result<AuditReport> {
        let plex = self.plex_collections(kind).await?;
        let configured = self.configured_collections(kind, poster_config).await;
        let missing = plex.difference(&configured).cloned().collect();

        Ok(AuditReport {
            kind,
            plex,
            configured,
            missing,
        })
    }
}

/// Drops generic and bypassed collections, then applies the alias table.
#[must_use]
pub fn franchise_collections<I>(config: &CollectionsConfig, titles: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    titles
        .into_iter()
        .filter(|title| {
            !config
                .generic_suffixes
                .iter()
                .any(|suffix| title.ends_with(suffix.as_str()))
        })
        .filter(|title| !config.bypass.contains(title))
        .map(|title| {
            config
                .name_replacements
                .get(&title)
                .cloned()
                .unwrap_or(title)
        })
        .collect()
}

/// Removes each configured fragment in order, then trims.
#[must_use]
pub fn clean_title(name: &str, suffixes: &[String]) -> String {
    suffixes
        .iter()
        .fold(name.to_string(), |acc, suffix| acc.replace(suffix.as_str(), ""))
        .trim()
        .to_string()
}

/// TMDB ids from the `url_poster_<id>` keys under `url_poster_mappings.<key>`.
#[must_use]
pub fn mapping_ids(poster_config: &Value, mapping_key: &str) -> Vec<u64> {
    let Some(mappings) = poster_config
        .get("url_poster_mappings")
        .and_then(|m| m.get(mapping_key))
        .and_then(Value::as_mapping)
    else {
        warn!(key = mapping_key, "No poster mappings configured");
        return Vec::new();
    };

    mappings
        .keys()
        .filter_map(|key| {
            let raw = key.as_str()?;
            match raw.strip_prefix(POSTER_KEY_PREFIX).unwrap_or(raw).parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(key = raw, "Skipping poster mapping, not a TMDB id");
                    None
                }
            }
        })
        .collect()
}

pub fn load_poster_config(path: &Path) -> Result<Value> {
    read_yaml(path).with_context(|| format!("Failed to load poster config {}", path.display()))
}

/// Markdown list of missing collections with a search link each.
#[must_use]
pub fn render_missing(missing: &[String], search_url: &str) -> String {
    missing
        .iter()
        .map(|name| {
            let query: String =
                url::form_urlencoded::byte_serialize(format!("{name} Collection").as_bytes())
                    .collect();
            format!("- [{name}]({search_url}{query})\n")
        })
        .collect()
}

/// Writes `missing_{kind}_collections.md`; nothing is written when no
/// collection is missing.
pub fn write_report(
    report: &AuditReport,
    output_dir: &Path,
    search_url: &str,
) -> Result<Option<PathBuf>> {
    if report.missing.is_empty() {
        return Ok(None);
    }

    let path = output_dir.join(format!("missing_{}_collections.md", report.kind));
    write_atomic(&path, &render_missing(&report.missing, search_url))?;
    info!(path = %path.display(), count = report.missing.len(), "Wrote missing collections report");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakePlex(Vec<&'static str>);

    #[async_trait]
    impl CollectionSource for FakePlex {
        async fn collection_titles(&self, _kind: MediaKind) -> Result<Vec<String>> {
            Ok(self.0.iter().map(ToString::to_string).collect())
        }
    }

    struct FakeTmdb(HashMap<u64, &'static str>);

    #[async_trait]
    impl TitleLookup for FakeTmdb {
        async fn lookup_name(&self, _kind: MediaKind, id: u64) -> Result<Option<String>> {
            if id == 500 {
                anyhow::bail!("server error");
            }
            Ok(self.0.get(&id).map(ToString::to_string))
        }
    }

    #[test]
    fn test_franchise_collections_filters() {
        let config = CollectionsConfig::default();
        let titles = [
            "Marvel Cinematic Universe",
            "Pixar",
            "Star Wars",
            "Godzilla (MonsterVerse)",
            "Christmas Movies",
        ]
        .into_iter()
        .map(String::from);

        let names: Vec<String> = franchise_collections(&config, titles).into_iter().collect();
        assert_eq!(names, vec!["Godzilla".to_string(), "Star Wars".to_string()]);
    }

    #[test]
    fn test_clean_title() {
        let suffixes = CollectionsConfig::default().title_suffixes;
        assert_eq!(clean_title("Star Wars Collection", &suffixes), "Star Wars");
        assert_eq!(clean_title("Alien - Collection", &suffixes), "Alien");
        assert_eq!(clean_title("Breaking Bad", &suffixes), "Breaking Bad");
    }

    #[test]
    fn test_mapping_ids_skips_bad_keys() {
        let config: Value = serde_yaml::from_str(
            "url_poster_mappings:\n  franchise_movie_posters:\n    url_poster_10: a\n    url_poster_abc: b\n    url_poster_86311: c\n",
        )
        .unwrap();
        assert_eq!(mapping_ids(&config, "franchise_movie_posters"), vec![10, 86311]);
        assert!(mapping_ids(&config, "franchise_show_posters").is_empty());
    }

    #[test]
    fn test_render_missing_links() {
        let out = render_missing(
            &["Fast & Furious".to_string()],
            "https://www.themoviedb.org/search?query=",
        );
        assert_eq!(
            out,
            "- [Fast & Furious](https://www.themoviedb.org/search?query=Fast+%26+Furious+Collection)\n"
        );
    }

    #[tokio::test]
    async fn test_audit_diff() {
        let plex = FakePlex(vec!["Star Wars", "Alien", "The Matrix", "IMDb Top 250"]);
        let tmdb = FakeTmdb(HashMap::from([
            (10, "Star Wars Collection"),
            (8091, "Alien Collection"),
        ]));
        let config: Value = serde_yaml::from_str(
            "url_poster_mappings:\n  franchise_movie_posters:\n    url_poster_10: a\n    url_poster_8091: b\n    url_poster_404: c\n    url_poster_500: d\n",
        )
        .unwrap();

        let auditor = CollectionAuditor::new(plex, tmdb, CollectionsConfig::default());
        let report = auditor.audit(MediaKind::Movie, &config).await.unwrap();

        assert_eq!(report.plex.len(), 3);
        assert_eq!(report.configured.len(), 2);
        assert_eq!(report.missing, vec!["The Matrix".to_string()]);
    }

    #[test]
    fn test_write_report_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let report = AuditReport {
            kind: MediaKind::Show,
            plex: BTreeSet::new(),
            configured: BTreeSet::new(),
            missing: Vec::new(),
        };
        assert!(write_report(&report, dir.path(), "q=").unwrap().is_none());
        assert!(!dir.path().join("missing_show_collections.md").exists());
    }
}
