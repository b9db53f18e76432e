use indexmap::IndexMap;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::fmt;

/// Library category, used to pick endpoints, sections and report wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    /// Singular name as used by Plex section types and report file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }

    /// Plural name as used by `ThePosterDB` search sections.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Show => "shows",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Release year as stored in a metadata file.
///
/// Folder scans produce text (`"1999"`, `"Unknown"`) while hand-edited
/// entries are often plain integers; the original representation is kept so
/// rewriting a file does not churn it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReleaseYear {
    Number(i64),
    Text(String),
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(year) => write!(f, "{year}"),
            Self::Text(year) => f.write_str(year),
        }
    }
}

impl From<&str> for ReleaseYear {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_poster: Option<String>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl SeasonEntry {
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            url_poster: Some(String::new()),
            extra: Mapping::new(),
        }
    }
}

/// One movie or show under `metadata:`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<ReleaseYear>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_poster: Option<String>,

    /// Season number -> season. `None` values are `3:` lines with no body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<BTreeMap<u32, Option<SeasonEntry>>>,

    /// Any other operator-set keys, kept verbatim.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl MediaEntry {
    #[must_use]
    pub fn has_poster(&self) -> bool {
        has_value(self.url_poster.as_deref())
    }

    /// Title used for ordering: the sort title, else the label title.
    #[must_use]
    pub fn ordering_title(&self) -> &str {
        self.sort_title
            .as_deref()
            .or(self.label_title.as_deref())
            .unwrap_or_default()
    }
}

/// `true` for a present, non-empty poster URL.
#[must_use]
pub fn has_value(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// A Kometa metadata file keyed by TMDB/TVDB id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    /// Top-level keys other than `metadata` (templates, comments-as-keys).
    #[serde(flatten)]
    pub extra: Mapping,

    #[serde(default, deserialize_with = "deserialize_entries")]
    pub metadata: IndexMap<u64, MediaEntry>,
}

/// Entry id written either as `603:` or as a quoted `'603':`.
#[derive(Debug, PartialEq, Eq, Hash)]
struct EntryId(u64);

impl<'de> Deserialize<'de> for EntryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = EntryId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a numeric TMDB/TVDB id")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<EntryId, E> {
                Ok(EntryId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<EntryId, E> {
                u64::try_from(v)
                    .map(EntryId)
                    .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<EntryId, E> {
                v.trim()
                    .parse()
                    .map(EntryId)
                    .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

fn deserialize_entries<'de, D>(deserializer: D) -> Result<IndexMap<u64, MediaEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<IndexMap<EntryId, MediaEntry>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|(EntryId(id), entry)| (id, entry))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_document_keeps_unknown_keys() {
        let yaml = r"
metadata:
  603:
    label_title: The Matrix
    release_year: 1999
    sort_title: Matrix
    url_poster: https://example.com/matrix.jpg
    edition: Remastered
";
        let doc: MetadataDocument = serde_yaml::from_str(yaml).unwrap();
        let entry = &doc.metadata[&603];
        assert_eq!(entry.label_title.as_deref(), Some("The Matrix"));
        assert_eq!(entry.release_year, Some(ReleaseYear::Number(1999)));
        assert!(entry.has_poster());
        assert_eq!(
            entry.extra.get("edition").and_then(|v| v.as_str()),
            Some("Remastered")
        );
    }

    #[test]
    fn test_parse_show_with_null_season() {
        let yaml = r"
metadata:
  81189:
    label_title: Breaking Bad
    release_year: '2008'
    url_poster: ''
    seasons:
      0:
        url_poster: ''
      1:
";
        let doc: MetadataDocument = serde_yaml::from_str(yaml).unwrap();
        let entry = &doc.metadata[&81189];
        assert_eq!(entry.release_year, Some(ReleaseYear::from("2008")));
        assert!(!entry.has_poster());
        let seasons = entry.seasons.as_ref().unwrap();
        assert_eq!(seasons.len(), 2);
        assert!(seasons[&1].is_none());
        assert_eq!(
            seasons[&0].as_ref().unwrap().url_poster.as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_quoted_ids_are_accepted() {
        let yaml = r"
metadata:
  '603':
    label_title: The Matrix
  949:
    label_title: Heat
";
        let doc: MetadataDocument = serde_yaml::from_str(yaml).unwrap();
        let ids: Vec<u64> = doc.metadata.keys().copied().collect();
        assert_eq!(ids, vec![603, 949]);
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        let yaml = "metadata:\n  matrix:\n    label_title: The Matrix\n";
        assert!(serde_yaml::from_str::<MetadataDocument>(yaml).is_err());
    }

    #[test]
    fn test_empty_metadata_key() {
        let doc: MetadataDocument = serde_yaml::from_str("metadata:\n").unwrap();
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_ordering_title_falls_back_to_label() {
        let entry = MediaEntry {
            label_title: Some("Heat".to_string()),
            ..MediaEntry::default()
        };
        assert_eq!(entry.ordering_title(), "Heat");
    }

    #[test]
    fn test_release_year_display() {
        assert_eq!(ReleaseYear::Number(1999).to_string(), "1999");
        assert_eq!(ReleaseYear::from("Unknown").to_string(), "Unknown");
    }
}
