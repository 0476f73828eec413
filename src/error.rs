// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("render service error (status {status}): {message}")]
    Render { status: u16, message: String },

    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    pub fn network(url: &str, err: impl std::fmt::Display) -> Self {
        FetchError::Network { url: url.to_string(), message: err.to_string() }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("rejected by server (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for PublishError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PublishError::Decode(err.to_string())
        } else {
            PublishError::Network(err.to_string())
        }
    }
}

/// Image preparation problems. Never fatal to a run.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("image still {size} bytes after compression (limit {limit})")]
    TooLarge { size: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),

    #[error("could not save seen set to {path}: {source}")]
    Store {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
