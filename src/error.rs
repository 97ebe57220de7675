//! Error types for IterView
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for IterView operations
///
/// Fetch failures against the record source are split into the two kinds the
/// viewer distinguishes: metadata fetches and per-page record fetches. Both
/// are recoverable; the controller logs them and keeps its previous state.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fetching `/iterations/meta` failed (transport, status, or decoding)
    #[error("Failed to fetch iteration metadata: {0}")]
    MetaFetch(String),

    /// Fetching `/iteration/{page}` failed (transport, status, or decoding)
    #[error("Failed to fetch iteration {page}: {message}")]
    RecordFetch {
        /// 1-based page that was requested
        page: u32,
        /// Failure description
        message: String,
    },

    /// A jump target outside `1..=total_pages`
    #[error("Page {requested} is out of range (1..={total_pages})")]
    PageOutOfRange {
        /// The page that was requested
        requested: u32,
        /// Current collection size
        total_pages: u32,
    },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for IterView operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
