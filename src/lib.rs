pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod indexing;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use catalog::{MetadataRepository, TypeRegistry};
pub use indexing::IndexingService;
pub use search::{IndexStatistics, KeywordSearchResult, SearchIndex};
pub use state::CatalogState;
