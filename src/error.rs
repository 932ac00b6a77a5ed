use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{url} answered with status {status}")]
    Status { status: u16, url: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("configuration: {0}")]
    Config(String),
    #[error("no hero named \"{0}\"")]
    UnknownHero(String),
}
