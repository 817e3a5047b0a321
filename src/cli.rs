use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "metadata-mcp", version)]
#[command(about = "Browse and search .NET assembly metadata over MCP", long_about = None)]
pub struct Cli {
    /// Configuration file (default: platform config dir/metadata-mcp/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve MCP over stdio
    Serve {
        /// Catalog dumps or directories, added to the configured ones
        catalogs: Vec<PathBuf>,
    },
    /// Run one keyword search and print the result as JSON
    Search {
        keywords: String,
        #[arg(short, long, default_value = "all")]
        scope: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        #[arg(short, long, default_value = "0")]
        offset: usize,
        catalogs: Vec<PathBuf>,
    },
    /// Print index statistics as JSON
    Stats { catalogs: Vec<PathBuf> },
}

impl Commands {
    /// Catalog paths given on the command line.
    pub fn catalogs(&self) -> &[PathBuf] {
        match self {
            Self::Serve { catalogs } | Self::Search { catalogs, .. } | Self::Stats { catalogs } => {
                catalogs
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from([
            "metadata-mcp",
            "--config",
            "cfg.toml",
            "search",
            "http response",
            "--scope",
            "methods",
            "-n",
            "5",
            "dumps/app.json",
        ]);

        check!(cli.config == Some(PathBuf::from("cfg.toml")));
        let_assert!(Commands::Search { keywords, scope, limit, offset, .. } = &cli.command);
        check!(keywords == "http response");
        check!(scope == "methods");
        check!(*limit == Some(5));
        check!(*offset == 0);
        check!(cli.command.catalogs() == [PathBuf::from("dumps/app.json")]);
    }

    #[test]
    fn test_parse_serve_without_catalogs() {
        let cli = Cli::parse_from(["metadata-mcp", "serve"]);
        check!(cli.command.catalogs().is_empty());
    }
}
