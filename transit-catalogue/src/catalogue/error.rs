//! Catalogue error types.

/// Errors raised by catalogue ingestion and queries.
///
/// `UnknownStop`/`UnknownBus` are the recoverable "not found" outcomes the
/// boundary layer turns into not-found responses. The remaining variants
/// are ingestion or data defects that abort a build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    /// No stop registered under this name
    #[error("unknown stop: {0}")]
    UnknownStop(String),

    /// No bus registered under this name
    #[error("unknown bus: {0}")]
    UnknownBus(String),

    /// A stop with this name already exists
    #[error("stop already registered: {0}")]
    DuplicateStop(String),

    /// A bus with this name already exists
    #[error("bus already registered: {0}")]
    DuplicateBus(String),

    /// No road distance recorded between two adjacent route stops,
    /// in either direction
    #[error("no road distance between {from} and {to}")]
    MissingDistance { from: String, to: String },
}
