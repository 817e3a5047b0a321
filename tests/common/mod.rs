//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `sample_catalog`: a temp directory holding one catalog dump (`app.json`)
//!   with a service class, a nested options class, an enum and an HTTP type
//! - `loaded_state`: a [`CatalogState`] built from `sample_catalog`
//!
//! # Shared Infrastructure
//!
//! [`TempCatalog`] provides a reusable temp directory for any test that needs
//! catalog dumps on disk.

use metadata_mcp::CatalogState;
use metadata_mcp::config::Config;
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Sample assembly dump. `TestService` has enough members mentioning "test"
/// to span more than one page of five results.
pub const SAMPLE_DUMP: &str = r#"{
  "name": "App",
  "types": [
    {
      "name": "TestService",
      "namespace": "App.Services",
      "typeKind": "class",
      "documentation": "Test service that runs background work",
      "methods": [
        {
          "name": "DoWork",
          "returnType": "System.Void",
          "documentation": "Does the test work",
          "parameters": [{ "name": "retryCount", "type": "System.Int32" }]
        },
        { "name": "DoWork", "returnType": "System.Void", "parameters": [] },
        { "name": "RunTest", "returnType": "System.Boolean" },
        { "name": "TestConnection", "returnType": "System.Boolean" },
        {
          "name": "GetHTTPResponse",
          "returnType": "App.Net.HttpResponse",
          "parameters": [{ "name": "url", "type": "System.String" }]
        },
        { "name": "a1b2c3d4", "returnType": "System.Void" }
      ],
      "properties": [{ "name": "TestCount", "type": "System.Int32" }],
      "fields": [
        { "name": "_testCache", "type": "System.Object", "offset": 8 },
        { "name": "xkcdqwrt", "type": "System.Int32" }
      ]
    },
    {
      "name": "TestService+TestOptions",
      "namespace": "App.Services",
      "typeKind": "nested class",
      "properties": [{ "name": "RetryLimit", "type": "System.Int32" }]
    },
    {
      "name": "Status",
      "namespace": "App.Models",
      "typeKind": "enum",
      "enumValues": [
        { "name": "Ready", "value": "0" },
        { "name": "Pending", "value": "1" },
        { "name": "TestFailed", "value": "2" }
      ]
    },
    {
      "name": "HttpResponse",
      "namespace": "App.Net",
      "typeKind": "sealed class",
      "documentation": "Response returned by an HTTP request",
      "properties": [{ "name": "StatusCode", "type": "System.Int32" }],
      "structLayout": { "kind": "Auto" }
    }
  ]
}"#;

/// A temporary directory for catalog dumps, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempCatalog {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempCatalog {
    /// Creates a new empty temporary directory.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this directory.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes a file (creating parent directories) and returns its full path.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }

    /// Config that loads every dump under this directory.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.add_catalogs([self.root.clone()]);
        config
    }
}

impl Default for TempCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Temp directory holding [`SAMPLE_DUMP`] as `app.json`.
#[fixture]
pub fn sample_catalog() -> TempCatalog {
    let catalog = TempCatalog::new();
    catalog.create_file("app.json", SAMPLE_DUMP);
    catalog
}

/// Catalog state loaded from [`sample_catalog`], with the index already built.
#[fixture]
pub fn loaded_state(sample_catalog: TempCatalog) -> CatalogState {
    CatalogState::load(&sample_catalog.config())
}
