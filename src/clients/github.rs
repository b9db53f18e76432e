//! GitHub `repository_dispatch` client used to hand folder scans to CI.

use crate::models::ScanPayload;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Dispatch request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Dispatch rejected with {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
}

#[derive(Serialize)]
struct DispatchRequest<'a> {
    event_type: &'a str,
    client_payload: ClientPayload<'a>,
}

#[derive(Serialize)]
struct ClientPayload<'a> {
    data: &'a ScanPayload,
}

#[derive(Clone)]
pub struct DispatchClient {
    client: Client,
    api_base: String,
    repository: String,
    token: String,
    event_type: String,
}

impl DispatchClient {
    pub fn new(api_base: &str, repository: &str, token: &str, event_type: &str) -> Result<Self, DispatchError> {
        let client = Client::builder().user_agent("kometa-kit/0.1").build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            token: token.to_string(),
            event_type: event_type.to_string(),
        })
    }

    /// Posts the payload; anything but `204 No Content` is an error.
    pub async fn dispatch(&self, payload: &ScanPayload) -> Result<(), DispatchError> {
        let url = format!("{}/repos/{}/dispatches", self.api_base, self.repository);
        let body = DispatchRequest {
            event_type: &self.event_type,
            client_payload: ClientPayload { data: payload },
        };

        debug!(url = %url, event_type = %self.event_type, "Sending repository dispatch");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
            .json(&body)
            .send()
            .await?;

        if response.status() != StatusCode::NO_CONTENT {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DispatchError::UnexpectedStatus { status, body });
        }

        info!(repository = %self.repository, "Repository dispatch accepted");
        Ok(())
    }
}
