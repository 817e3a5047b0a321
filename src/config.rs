//! Configuration file loading.

use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Directory under the platform config dir holding `config.toml`.
const APP_DIR: &str = "metadata-mcp";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration, read from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog dump files or directories to load at startup
    pub catalogs: Vec<PathBuf>,
    /// Optional external word list (one word per line) for the meaningfulness check
    pub dictionary: Option<PathBuf>,
    pub search: SearchConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Page size used when a request omits `limit`
    pub default_limit: usize,
    /// Upper bound applied to every requested `limit`
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

impl SearchConfig {
    /// Resolves a requested page size against the configured bounds.
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Default level directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// used when present, otherwise defaults apply.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(expand_tilde(path).into_owned()),
            None => default_path().filter(|p| p.is_file()),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path).await?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.normalize();
        Ok(config)
    }

    async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Appends catalog paths given on the command line.
    pub fn add_catalogs<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.catalogs
            .extend(paths.into_iter().map(|p| expand_tilde(&p).into_owned()));
    }

    fn normalize(&mut self) {
        for path in &mut self.catalogs {
            *path = expand_tilde(path).into_owned();
        }
        if let Some(path) = self.dictionary.as_mut() {
            *path = expand_tilde(path).into_owned();
        }
        if self.search.max_limit == 0 {
            self.search.max_limit = SearchConfig::default().max_limit;
        }
        self.search.default_limit = self.search.default_limit.min(self.search.max_limit);
    }
}

/// `$XDG_CONFIG_HOME/metadata-mcp/config.toml` or the platform equivalent.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &Path) -> Cow<'_, Path> {
    if let Ok(stripped) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.join(stripped));
    }
    Cow::Borrowed(path)
}
