use thiserror::Error;

use crate::fetch::FetchError;

/// Errors surfaced by the crate's public operations.
///
/// Per-page fetch failures during a crawl are not reported through this type;
/// they are collected in [`crate::results::CrawlResult::errors`].
#[derive(Debug, Error)]
pub enum Error {
    /// The crawl seed cannot be used to derive a base domain
    #[error("invalid start URL '{url}': {reason}")]
    InvalidStartUrl { url: String, reason: String },

    /// A URL passed to a single-page operation is unusable
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
