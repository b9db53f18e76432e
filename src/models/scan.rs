use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedSeason {
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedMovie {
    pub title: String,
    pub release_year: String,
    pub db_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedShow {
    pub title: String,
    pub release_year: String,
    pub db_id: u64,
    #[serde(default)]
    pub seasons: Vec<ScannedSeason>,
}

/// Folder scan result, posted as `client_payload.data` of a dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPayload {
    #[serde(default)]
    pub movies: Vec<ScannedMovie>,
    #[serde(default)]
    pub shows: Vec<ScannedShow>,
}

impl ScanPayload {
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}
