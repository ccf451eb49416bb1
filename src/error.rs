// src/error.rs

use thiserror::Error;

/// Errors surfaced by the library outside of individual probes.
///
/// Probe failures never show up here: they are folded into the outcome text
/// of their section so the rest of the scan keeps going.
#[derive(Debug, Error)]
pub enum SentinelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to launch scan: {0}")]
    Launch(String),
}

pub type Result<T> = std::result::Result<T, SentinelError>;
