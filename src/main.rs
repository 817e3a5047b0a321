use anyhow::Context;
use clap::Parser;
use metadata_mcp::cli::{Cli, Commands};
use metadata_mcp::config::Config;
use metadata_mcp::server::CatalogServer;
use metadata_mcp::state::CatalogState;
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).await?;
    metadata_mcp::tracing::init(&config.log);
    config.add_catalogs(cli.command.catalogs().iter().cloned());

    if config.catalogs.is_empty() {
        tracing::warn!("No catalogs configured; pass dump paths or set `catalogs` in the config file");
    }

    let state = tokio::task::spawn_blocking(move || CatalogState::load(&config))
        .await
        .context("Catalog loading task failed")?;
    let state = Arc::new(state);

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting metadata-mcp MCP server");

            let server = CatalogServer::new(state);
            let service = server.serve(stdio()).await.inspect_err(|e| {
                tracing::error!("Error serving MCP server: {:?}", e);
            })?;

            service.waiting().await?;
        }
        Commands::Search {
            keywords,
            scope,
            limit,
            offset,
            ..
        } => {
            let limit = state.search_config().clamp_limit(limit);
            let result = state
                .indexing()
                .search_by_keywords(&keywords, &scope, limit, offset);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Stats { .. } => {
            let stats = state.indexing().statistics();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
