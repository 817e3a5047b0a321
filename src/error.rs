//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for application-level plumbing.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in config loading, the CLI and server startup.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a catalog dump cannot be loaded or queried.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The dump file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The dump file is not a valid catalog document.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A directory walk failed partway.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },
    /// A user-supplied element search pattern is not a valid regex.
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    /// Every configured catalog failed to load, so there is nothing to query.
    #[error("Failed to load all assemblies: {}", .0.join(", "))]
    NothingLoaded(Vec<String>),
    #[error("Namespace(s) not found: {}", .0.join(", "))]
    NamespaceNotFound(Vec<String>),
    #[error("Type names cannot be empty")]
    NoTypeNames,
    /// Requested types are unknown or their simple names are ambiguous.
    #[error("Type(s) not found or ambiguous: {}", missing.join(", "))]
    TypeNotFound {
        missing: Vec<String>,
        /// Closest known full names, best first
        suggestions: Vec<String>,
    },
}

/// Error raised inside the search subsystem.
///
/// These never reach search callers: ingestion errors skip the offending
/// document and query errors degrade to an empty result.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A previous holder of the index lock panicked.
    #[error("search index lock poisoned")]
    LockPoisoned,
    /// Two documents in one build share an id.
    #[error("duplicate document id '{0}'")]
    DuplicateId(String),
    /// A document could not be encoded for size accounting.
    #[error("failed to encode document '{id}': {source}")]
    Encode {
        id: String,
        #[source]
        source: postcard::Error,
    },
}
