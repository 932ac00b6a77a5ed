use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.opendota.com/api";
const DEFAULT_MATCH_PAGES: usize = 5;
const DEFAULT_PAGE_DELAY_MS: u64 = 500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub match_pages: usize,
    pub page_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            match_pages: DEFAULT_MATCH_PAGES,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_url = env::var("OPENDOTA_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let match_pages = parse_var("MATCH_PAGES", DEFAULT_MATCH_PAGES)?;
        let page_delay_ms = parse_var("PAGE_DELAY_MS", DEFAULT_PAGE_DELAY_MS)?;
        let timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        Self {
            api_url,
            match_pages,
            page_delay: Duration::from_millis(page_delay_ms),
            request_timeout: Duration::from_secs(timeout_secs),
        }
        .validated()
    }

    /// Applies command-line overrides on top of the environment values.
    pub fn with_overrides(mut self, api_url: Option<String>, pages: Option<usize>) -> Result<Self> {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(pages) = pages {
            self.match_pages = pages;
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self> {
        if self.match_pages == 0 {
            return Err(Error::Config("MATCH_PAGES must be at least 1".to_string()));
        }
        let trimmed = self.api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Config("OPENDOTA_API_URL is empty".to_string()));
        }
        self.api_url = trimmed.to_string();
        Ok(self)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{name} must be a non-negative integer, got \"{raw}\""))),
        _ => Ok(default),
    }
}
