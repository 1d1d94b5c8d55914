//! Remote war-data API access.
//!
//! `WarApi` is the seam between the refresh pipeline and the network.
//! `ClashClient` implements it over HTTP with bearer authentication;
//! tests substitute `MockWarApi`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ApiConfig;
use crate::models::{ClanIdentity, ClanWar, LeagueGroup, Tag, WarRosters};

/// Errors that can occur while talking to the remote API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else {
            FetchError::Http(err)
        }
    }
}

/// Read access to league groups and league wars.
#[async_trait]
pub trait WarApi: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Current league group of a clan.
    async fn league_group(&self, clan_tag: &Tag) -> Result<LeagueGroup, FetchError>;

    /// A single league war.
    async fn war(&self, war_tag: &Tag) -> Result<ClanWar, FetchError>;
}

/// Fetch one war and orient it around the tracked clan.
///
/// `Ok(None)` means the war does not involve the tracked clan.
pub async fn fetch_war_rosters(
    api: &dyn WarApi,
    war_tag: &Tag,
    clan: &ClanIdentity,
) -> Result<Option<WarRosters>, FetchError> {
    let war = api.war(war_tag).await?;
    let rosters = war.into_rosters(clan);
    if rosters.is_none() {
        debug!("War {} does not involve clan {}", war_tag, clan.tag);
    }
    Ok(rosters)
}

/// HTTP client for the remote war-data API.
pub struct ClashClient {
    client: Client,
    base_url: Url,
}

impl ClashClient {
    /// Create a client from API configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(config.base_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| FetchError::InvalidToken(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Join path segments onto the base URL.
    ///
    /// Each segment is percent-encoded, so a tag's `#` becomes `%23`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WarApi for ClashClient {
    fn name(&self) -> &'static str {
        "clash-api"
    }

    async fn league_group(&self, clan_tag: &Tag) -> Result<LeagueGroup, FetchError> {
        let url = self.endpoint(&["clans", clan_tag.as_str(), "currentwar", "leaguegroup"])?;
        info!("Fetching league group for {}", clan_tag);
        self.get_json(url).await
    }

    async fn war(&self, war_tag: &Tag) -> Result<ClanWar, FetchError> {
        let url = self.endpoint(&["clanwarleagues", "wars", war_tag.as_str()])?;
        info!("Fetching war {}", war_tag);
        self.get_json(url).await
    }
}

/// In-memory `WarApi` for tests.
#[cfg(test)]
pub struct MockWarApi {
    league: Option<LeagueGroup>,
    wars: std::collections::HashMap<Tag, ClanWar>,
    requested: std::sync::Mutex<Vec<Tag>>,
}

#[cfg(test)]
impl MockWarApi {
    pub fn new(league: LeagueGroup) -> Self {
        Self {
            league: Some(league),
            wars: std::collections::HashMap::new(),
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A backend whose league-group request always fails.
    pub fn unreachable() -> Self {
        Self {
            league: None,
            wars: std::collections::HashMap::new(),
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_war(mut self, war_tag: &str, war: ClanWar) -> Self {
        self.wars.insert(Tag::from(war_tag), war);
        self
    }

    /// War tags requested so far, in request order.
    pub fn requested(&self) -> Vec<Tag> {
        self.requested.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl WarApi for MockWarApi {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn league_group(&self, _clan_tag: &Tag) -> Result<LeagueGroup, FetchError> {
        self.league.clone().ok_or_else(|| FetchError::HttpStatus {
            status: 503,
            message: "Service Unavailable".to_string(),
        })
    }

    async fn war(&self, war_tag: &Tag) -> Result<ClanWar, FetchError> {
        self.requested.lock().unwrap().push(war_tag.clone());
        self.wars
            .get(war_tag)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                status: 404,
                message: "Not Found".to_string(),
            })
    }
}
