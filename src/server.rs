//! MCP server exposing catalog browsing and keyword search tools.

use crate::state::CatalogState;
use crate::tools::catalog::{
    GetTypeDetailsRequest, ListNamespacesRequest, SearchElementsRequest, handle_get_type_details,
    handle_list_namespaces, handle_search_elements,
};
use crate::tools::search::{
    KeywordSearchRequest, handle_index_statistics, handle_rebuild_index,
    handle_search_by_keywords,
};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for .NET metadata catalog queries
#[derive(Clone)]
pub struct CatalogServer {
    /// Loaded catalog and search index
    state: Arc<CatalogState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for CatalogServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl CatalogServer {
    pub fn new(state: Arc<CatalogState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    pub fn state(&self) -> &Arc<CatalogState> {
        &self.state
    }

    #[tool(
        description = "List namespaces in the loaded assemblies with the types each one contains. Optionally restrict to specific namespaces. Results are sorted and paginated.",
        input_schema = inline_schema_for_type::<ListNamespacesRequest>()
    )]
    async fn list_namespaces(
        &self,
        Parameters(request): Parameters<ListNamespacesRequest>,
    ) -> std::result::Result<String, String> {
        handle_list_namespaces(&self.state, request)
    }

    #[tool(
        description = "Get full details (methods, properties, fields, enum values, struct layout) for one or more types by full name or unambiguous simple name. Suggests close matches for unknown names.",
        input_schema = inline_schema_for_type::<GetTypeDetailsRequest>()
    )]
    async fn get_type_details(
        &self,
        Parameters(request): Parameters<GetTypeDetailsRequest>,
    ) -> std::result::Result<String, String> {
        handle_get_type_details(&self.state, request)
    }

    #[tool(
        description = "Find types and members whose names match a case-insensitive regular expression. Optionally scoped to types, methods, properties, fields or enums.",
        input_schema = inline_schema_for_type::<SearchElementsRequest>()
    )]
    async fn search_elements(
        &self,
        Parameters(request): Parameters<SearchElementsRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_elements(&self.state, request)
    }

    #[tool(
        description = "Keyword search across type and member names, documentation and signatures. Every keyword must match somewhere (substring, case-insensitive). Returns ranked results with highlight positions and counts per element kind.",
        input_schema = inline_schema_for_type::<KeywordSearchRequest>()
    )]
    async fn search_by_keywords(
        &self,
        Parameters(request): Parameters<KeywordSearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search_by_keywords(&self.state, request)
    }

    #[tool(description = "Show search index statistics: document and term counts per element kind, approximate size and last build time.")]
    async fn index_statistics(&self) -> std::result::Result<String, String> {
        handle_index_statistics(&self.state)
    }

    #[tool(description = "Rebuild the keyword search index from the loaded catalog.")]
    async fn rebuild_index(&self) -> std::result::Result<String, String> {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || handle_rebuild_index(&state))
            .await
            .map_err(|e| format!("Index rebuild task failed: {}", e))?
    }
}

#[tool_handler]
impl ServerHandler for CatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "metadata-mcp: browse and search type metadata extracted from .NET assemblies. \
                 Start with list_namespaces or search_by_keywords, then use get_type_details \
                 for full member listings.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this sets `inline_subschemas = true`
/// so nested definitions are emitted in place instead of as `$ref`s.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();

    match serde_json::to_value(schema) {
        Ok(serde_json::Value::Object(object)) => Arc::new(object),
        other => {
            tracing::error!("Schema for tool input is not a JSON object: {:?}", other);
            Arc::new(JsonObject::new())
        }
    }
}
