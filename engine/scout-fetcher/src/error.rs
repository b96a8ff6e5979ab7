//! Error types for the fetcher

use recommendation_store::StoreError;
use thiserror::Error;

/// Errors raised while talking to an external HTTP service
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request failed with status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors that abort an ETL cycle
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Snapshot fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
