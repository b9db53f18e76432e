use crate::models::MediaKind;
use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    directory: Vec<LibrarySection>,
}

#[derive(Debug, Deserialize)]
struct CollectionsContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<PlexCollection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub section_type: String,
}

impl LibrarySection {
    #[must_use]
    pub fn is_kind(&self, kind: MediaKind) -> bool {
        self.section_type == kind.as_str()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlexCollection {
    pub title: String,
}

#[derive(Clone)]
pub struct PlexClient {
    client: Client,
    base_url: String,
    token: String,
}

impl PlexClient {
    pub fn new(base_url: &str, token: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("kometa-kit/0.1")
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Plex request");

        let response = self
            .client
            .get(&url)
            .header("X-Plex-Token", &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Plex API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }

    pub async fn sections(&self) -> Result<Vec<LibrarySection>> {
        let response: PlexResponse<SectionsContainer> = self.get("/library/sections").await?;
        Ok(response.media_container.directory)
    }

    pub async fn collections(&self, section_key: &str) -> Result<Vec<PlexCollection>> {
        let path = format!(
            "/library/sections/{}/collections",
            urlencoding::encode(section_key)
        );
        let response: PlexResponse<CollectionsContainer> = self.get(&path).await?;
        Ok(response.media_container.metadata)
    }

    /// Titles of every collection in every section of the given kind.
    pub async fn collection_titles(&self, kind: MediaKind) -> Result<Vec<String>> {
        let mut titles = Vec::new();

        for section in self.sections().await?.into_iter().filter(|s| s.is_kind(kind)) {
            let collections = self.collections(&section.key).await?;
            debug!(
                section = %section.title,
                count = collections.len(),
                "Fetched Plex collections"
            );
            titles.extend(collections.into_iter().map(|c| c.title));
        }

        Ok(titles)
    }
}
