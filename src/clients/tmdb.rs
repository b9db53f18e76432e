use crate::models::MediaKind;
use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(base_url: &str, api_key: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("kometa-kit/0.1")
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Name of a movie collection or a TV show; `None` when TMDB has no such id.
    pub async fn name(&self, kind: MediaKind, id: u64) -> Result<Option<String>> {
        let resource = match kind {
            MediaKind::Movie => "collection",
            MediaKind::Show => "tv",
        };

        let mut url = Url::parse(&format!("{}/{}/{}", self.base_url, resource, id))?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);

        debug!(resource, id, "Fetching TMDB title");

        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        let resource: NamedResource = response.json().await?;
        Ok(resource.name)
    }
}
