use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anime_episodes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manga_chapters: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One arc, emitted as one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcSeason {
    pub title: String,

    pub url_poster: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_background: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saga: Option<String>,

    pub summary: String,

    pub episodes: BTreeMap<u32, EpisodeRecord>,
}

/// An arc parsed from its CSV file, before season numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArc {
    /// Name as listed in the overview (or the file stem when there is none).
    pub listed_name: String,
    pub episodes: BTreeMap<u32, EpisodeRecord>,
}

/// Ranges listed for an arc in `Arc Overview.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewRanges {
    pub anime_episodes: Option<String>,
    pub manga_chapters: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaInfo {
    pub name: String,
    pub url_background: Option<String>,
}

/// Root entry of the generated document: preserved fields, then seasons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowEntry {
    #[serde(flatten)]
    pub fields: Mapping,

    pub seasons: BTreeMap<u32, ArcSeason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowDocument {
    pub metadata: IndexMap<String, ShowEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummariesFile {
    #[serde(default)]
    pub arcs: IndexMap<String, Option<ArcSummary>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArcSummary {
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SagasFile {
    #[serde(default)]
    pub sagas: IndexMap<String, SagaEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SagaEntry {
    #[serde(default)]
    pub url_background: Option<String>,
    #[serde(default)]
    pub arcs: Vec<String>,
}
