//! Keyword search service tying the type registry to the search index.

use crate::catalog::TypeRegistry;
use crate::search::{
    BuildSummary, IndexStatistics, IndexedDocument, KeywordSearchResult, QueryEngine, SearchIndex,
    documents_for_type,
};
use std::sync::Arc;
use std::time::Instant;

/// Owns the search index built from a registry snapshot.
#[derive(Debug)]
pub struct IndexingService {
    registry: Arc<TypeRegistry>,
    index: SearchIndex,
}

impl IndexingService {
    /// Creates the service with an empty index. Call [`build_index`](Self::build_index)
    /// before searching.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            index: SearchIndex::new(),
        }
    }

    /// Rebuilds the index from every type in the registry.
    pub fn build_index(&self) -> BuildSummary {
        let start = Instant::now();
        let documents = self.collect_documents();
        tracing::debug!(
            "Collected {} documents from {} types in {:?}",
            documents.len(),
            self.registry.len(),
            start.elapsed()
        );
        self.index.build(documents)
    }

    /// Equivalent to [`build_index`](Self::build_index); there is no incremental update.
    pub fn update_index(&self) -> BuildSummary {
        self.build_index()
    }

    pub fn clear_index(&self) {
        self.index.clear();
    }

    pub fn search_by_keywords(
        &self,
        keywords: &str,
        scope: &str,
        limit: usize,
        offset: usize,
    ) -> KeywordSearchResult {
        QueryEngine::new(&self.index).search(keywords, scope, limit, offset)
    }

    pub fn statistics(&self) -> IndexStatistics {
        self.index.statistics()
    }

    fn collect_documents(&self) -> Vec<IndexedDocument> {
        self.registry
            .all_types()
            .iter()
            .flat_map(documents_for_type)
            .collect()
    }
}
