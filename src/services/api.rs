use std::future::Future;

use log::debug;
use reqwest::Client;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::types::{HeroRecord, MatchRecord};

const USER_AGENT: &str = concat!("dota-match-browser/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub enum MatchPage {
    Records(Vec<MatchRecord>),
    /// The server answered with a non-success status.
    Rejected(u16),
}

/// Read-only access to the hero and match endpoints.
///
/// `path` arguments are relative to the API root, query string included.
pub trait DotaApi {
    fn fetch_heroes(&self) -> impl Future<Output = Result<Vec<HeroRecord>>> + Send;

    fn fetch_match_page(&self, path: &str) -> impl Future<Output = Result<MatchPage>> + Send;
}

#[derive(Debug, Clone)]
pub struct OpenDotaClient {
    client: Client,
    base_url: String,
}

impl OpenDotaClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get(&self, path: &str) -> Result<(u16, String, String)> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, url, body))
    }
}

impl DotaApi for OpenDotaClient {
    async fn fetch_heroes(&self) -> Result<Vec<HeroRecord>> {
        let (status, url, body) = self.get("heroes").await?;
        decode_heroes(status, url, &body)
    }

    async fn fetch_match_page(&self, path: &str) -> Result<MatchPage> {
        let (status, _, body) = self.get(path).await?;
        decode_match_page(status, &body)
    }
}

pub fn decode_heroes(status: u16, url: String, body: &str) -> Result<Vec<HeroRecord>> {
    if !is_success(status) {
        return Err(Error::Status { status, url });
    }
    Ok(serde_json::from_str(body.trim())?)
}

/// Anything other than a JSON array counts as an empty page; a body that is
/// not JSON at all is an error.
pub fn decode_match_page(status: u16, body: &str) -> Result<MatchPage> {
    if !is_success(status) {
        return Ok(MatchPage::Rejected(status));
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Ok(MatchPage::Records(Vec::new()));
    }

    match serde_json::from_str::<Value>(trimmed)? {
        value @ Value::Array(_) => Ok(MatchPage::Records(serde_json::from_value(value)?)),
        _ => Ok(MatchPage::Records(Vec::new())),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
