//! Errors raised at the ingestion and configuration boundaries.
//!
//! The resolver, composer and store never fail; only loading external data can.

use thiserror::Error;

/// Errors turning catalog or build records into parts.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown part category: {0}")]
    UnknownCategory(String),
    #[error("Invalid technical specs for part {part_id}: {message}")]
    InvalidSpecs { part_id: u64, message: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors loading a [`PlacementConfig`](crate::config::PlacementConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for ingestion.
pub type CatalogResult<T> = Result<T, CatalogError>;
