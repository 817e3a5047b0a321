//! Code-aware keyword search over the loaded catalog.
//!
//! This module provides identifier tokenization, the meaningfulness filter used
//! during catalog loading, and a multi-field inverted index with ranked,
//! paginated and highlighted keyword queries.

// Module declarations
pub mod dictionary;
pub mod document;
pub mod index;
pub mod meaning;
pub mod query;
pub(crate) mod scoring;
pub mod tokenize;

// Public re-exports (used via lib.rs)
pub use document::{CatalogElement, ElementKind, IndexedDocument, build_document, documents_for_type};
pub use index::{BuildSummary, IndexStatistics, SearchIndex};
pub use meaning::is_meaningful;
pub use query::{KeywordSearchResult, Pagination, QueryEngine, SearchHit, SearchQuery, SearchScope};
pub use tokenize::tokenize;
