//! Catalog browsing handlers: namespaces, type details and regex element search.

use crate::error::CatalogError;
use crate::state::CatalogState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

use super::search::to_json;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListNamespacesRequest {
    /// Namespaces to list; omit to list all of them
    #[serde(default)]
    pub namespaces: Option<Vec<String>>,
    /// Maximum number of namespaces to return (default from config)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of namespaces to skip (default: 0)
    #[serde(default)]
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetTypeDetailsRequest {
    /// Full names (Namespace.Type) or unambiguous simple names of the types to inspect
    pub type_names: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchElementsRequest {
    /// Case-insensitive regular expression matched against element names
    pub pattern: String,
    /// Element kinds to search: all, types, methods, properties, fields or enums (default: all)
    #[serde(default)]
    pub scope: Option<String>,
    /// Maximum number of results to return (default from config)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of results to skip (default: 0)
    #[serde(default)]
    pub offset: Option<usize>,
}

pub fn handle_list_namespaces(
    state: &CatalogState,
    request: ListNamespacesRequest,
) -> Result<String, String> {
    let limit = state.search_config().clamp_limit(request.limit);
    let listing = state
        .repository()
        .query_namespaces(
            request.namespaces.as_deref().unwrap_or_default(),
            limit,
            request.offset.unwrap_or(0),
        )
        .map_err(|e| describe_error(&e))?;
    to_json(&listing)
}

pub fn handle_get_type_details(
    state: &CatalogState,
    request: GetTypeDetailsRequest,
) -> Result<String, String> {
    let types = state
        .repository()
        .query_type_details(&request.type_names)
        .map_err(|e| describe_error(&e))?;
    to_json(&types)
}

pub fn handle_search_elements(
    state: &CatalogState,
    request: SearchElementsRequest,
) -> Result<String, String> {
    let limit = state.search_config().clamp_limit(request.limit);
    let result = state
        .repository()
        .search_elements(
            &request.pattern,
            request.scope.as_deref().unwrap_or("all"),
            limit,
            request.offset.unwrap_or(0),
        )
        .map_err(|e| describe_error(&e))?;
    to_json(&result)
}

/// Renders a catalog error for the caller, listing suggestions when there are any.
fn describe_error(error: &CatalogError) -> String {
    let mut message = error.to_string();
    if let CatalogError::TypeNotFound { suggestions, .. } = error
        && !suggestions.is_empty()
    {
        message.push_str("\n\nDid you mean:\n");
        for suggestion in suggestions {
            let _ = writeln!(message, "  • {}", suggestion);
        }
    }
    message
}
