//! Keyword search and index maintenance handlers.

use crate::state::CatalogState;
use rmcp::schemars;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct KeywordSearchRequest {
    /// Space-separated keywords; every keyword must match (e.g. "http response")
    pub keywords: String,
    /// Element kinds to search: all, types, methods, properties, fields or enums (default: all)
    #[serde(default)]
    pub scope: Option<String>,
    /// Maximum number of results to return (default from config, usually 100)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of results to skip for pagination (default: 0)
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Run a keyword search against the index.
pub fn handle_search_by_keywords(
    state: &CatalogState,
    request: KeywordSearchRequest,
) -> Result<String, String> {
    let limit = state.search_config().clamp_limit(request.limit);
    let result = state.indexing().search_by_keywords(
        &request.keywords,
        request.scope.as_deref().unwrap_or("all"),
        limit,
        request.offset.unwrap_or(0),
    );
    to_json(&result)
}

/// Report document and term counts for the current index.
pub fn handle_index_statistics(state: &CatalogState) -> Result<String, String> {
    to_json(&state.indexing().statistics())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RebuildReport {
    documents_indexed: usize,
    documents_skipped: usize,
    build_time_ms: f64,
}

/// Rebuild the index from the loaded catalog.
pub fn handle_rebuild_index(state: &CatalogState) -> Result<String, String> {
    let start = Instant::now();
    let summary = state.indexing().update_index();
    to_json(&RebuildReport {
        documents_indexed: summary.indexed,
        documents_skipped: summary.skipped,
        build_time_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize response: {}", e))
}
