// SPDX-License-Identifier: Apache-2.0
//! Error types for the pingback receiver

use thiserror::Error;

/// Errors raised by a storage collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Errors fetching a source document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unsupported source URL: {0}")]
    UnsupportedUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
