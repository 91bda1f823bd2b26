//! Error types for the schoolcal engine.

use thiserror::Error;

/// Failure of a single source fetch.
///
/// Fetch collaborators wrap whatever their backend SDK raises into one of
/// these so the aggregator can report per-source failures uniformly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Not authenticated")]
    Unauthenticated,
}
