//! Shared state behind the MCP tools and CLI commands.

use crate::catalog::{MetadataRepository, TypeRegistry};
use crate::config::{Config, SearchConfig};
use crate::indexing::IndexingService;
use crate::search::dictionary::{self, WordIndex};
use std::sync::Arc;

/// Loaded catalog, its search index and the limits requests are clamped to.
#[derive(Debug)]
pub struct CatalogState {
    repository: MetadataRepository,
    indexing: IndexingService,
    search: SearchConfig,
}

impl CatalogState {
    /// Loads every configured catalog and builds the initial search index.
    ///
    /// Catalog failures are recorded on the registry rather than returned.
    pub fn load(config: &Config) -> Self {
        if let Some(path) = &config.dictionary {
            match WordIndex::load(path) {
                Ok(words) => {
                    dictionary::install(words);
                }
                Err(e) => tracing::warn!(
                    "Failed to load dictionary {}, using built-in words: {}",
                    path.display(),
                    e
                ),
            }
        }

        let mut registry = TypeRegistry::new();
        let loaded = registry.load_catalogs(&config.catalogs);
        tracing::info!(
            "Loaded {} types from {} catalog paths ({} errors)",
            loaded,
            config.catalogs.len(),
            registry.load_errors().len()
        );

        Self::from_registry(registry, config.search.clone())
    }

    /// Wraps an already populated registry and builds the search index.
    pub fn from_registry(registry: TypeRegistry, search: SearchConfig) -> Self {
        let registry = Arc::new(registry);
        let indexing = IndexingService::new(Arc::clone(&registry));
        indexing.build_index();

        Self {
            repository: MetadataRepository::new(registry),
            indexing,
            search,
        }
    }

    pub fn repository(&self) -> &MetadataRepository {
        &self.repository
    }

    pub fn indexing(&self) -> &IndexingService {
        &self.indexing
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.search
    }
}
