//! In-memory registry of every type loaded from catalog dumps.

use crate::catalog::model::{AssemblyMetadata, TypeMetadata};
use crate::error::CatalogError;
use crate::search::meaning::is_meaningful;
use ahash::AHashMap;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Extension of catalog dump files picked up when walking a directory.
const CATALOG_EXTENSION: &str = "json";

/// Registry of loaded types with case-insensitive lookup tables.
///
/// Members whose names fail the meaningfulness check (compiler-generated
/// backing fields, obfuscated names) are dropped when a dump is registered, so
/// everything downstream (repository queries, the search index) only ever sees
/// the filtered catalog.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeMetadata>,
    /// Lowercased full name → index into `types`
    by_full_name: AHashMap<String, usize>,
    /// Lowercased simple name (and innermost nested name) → indices
    by_simple_name: AHashMap<String, Vec<usize>>,
    /// Lowercased namespace → indices
    by_namespace: AHashMap<String, Vec<usize>>,
    load_errors: Vec<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every path, walking directories for `*.json` dumps.
    ///
    /// Failures are recorded in [`load_errors`](Self::load_errors) and never abort
    /// the remaining paths. Returns the number of types registered.
    pub fn load_catalogs<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut loaded = 0;
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                for file in self.discover_dumps(path) {
                    loaded += self.load_catalog(&file);
                }
            } else {
                loaded += self.load_catalog(path);
            }
        }
        loaded
    }

    /// Loads a single dump file. Returns the number of types registered (zero on failure).
    pub fn load_catalog(&mut self, path: &Path) -> usize {
        match read_dump(path) {
            Ok(assembly) => {
                let name = assembly.name.clone();
                let count = self.register_assembly(assembly);
                tracing::info!(
                    "Loaded {} types from assembly '{}' ({})",
                    count,
                    name,
                    path.display()
                );
                count
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.load_errors
                    .push(format!("Failed to load {}: {}", path.display(), e));
                0
            }
        }
    }

    /// Registers an already-parsed assembly, filtering its members.
    pub fn register_assembly(&mut self, assembly: AssemblyMetadata) -> usize {
        let count = assembly.types.len();
        for ty in assembly.types {
            self.register_type(filter_members(ty));
        }
        count
    }

    fn register_type(&mut self, ty: TypeMetadata) {
        let index = self.types.len();

        self.by_full_name.insert(ty.full_name().to_lowercase(), index);

        let name_key = ty.name.to_lowercase();
        let simple_key = ty.simple_name().to_lowercase();
        self.by_simple_name
            .entry(name_key.clone())
            .or_default()
            .push(index);
        if simple_key != name_key {
            self.by_simple_name.entry(simple_key).or_default().push(index);
        }

        self.by_namespace
            .entry(ty.namespace.to_lowercase())
            .or_default()
            .push(index);

        self.types.push(ty);
    }

    fn discover_dumps(&mut self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in WalkBuilder::new(dir).build() {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| t.is_file());
                    let is_dump = entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(CATALOG_EXTENSION));
                    if is_file && is_dump {
                        files.push(entry.into_path());
                    }
                }
                Err(source) => {
                    let err = CatalogError::Walk {
                        path: dir.to_path_buf(),
                        source,
                    };
                    tracing::warn!("{}", err);
                    self.load_errors.push(err.to_string());
                }
            }
        }
        files.sort();
        tracing::debug!("Found {} catalog dumps under {}", files.len(), dir.display());
        files
    }

    pub fn all_types(&self) -> &[TypeMetadata] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_by_full_name(&self, full_name: &str) -> Option<&TypeMetadata> {
        self.by_full_name
            .get(&full_name.to_lowercase())
            .map(|&i| &self.types[i])
    }

    pub fn types_by_simple_name(&self, simple_name: &str) -> Vec<&TypeMetadata> {
        self.lookup(&self.by_simple_name, simple_name)
    }

    pub fn types_by_namespace(&self, namespace: &str) -> Vec<&TypeMetadata> {
        self.lookup(&self.by_namespace, namespace)
    }

    /// Distinct namespaces, sorted.
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self
            .by_namespace
            .values()
            .filter_map(|indices| indices.first())
            .map(|&i| self.types[i].namespace.as_str())
            .collect();
        namespaces.sort_unstable();
        namespaces
    }

    /// Resolves a full name, falling back to a simple name when it is unambiguous.
    pub fn try_get_type(&self, name: &str) -> Option<&TypeMetadata> {
        self.type_by_full_name(name).or_else(|| {
            match self.types_by_simple_name(name).as_slice() {
                [only] => Some(*only),
                _ => None,
            }
        })
    }

    pub fn load_errors(&self) -> &[String] {
        &self.load_errors
    }

    fn lookup(&self, map: &AHashMap<String, Vec<usize>>, key: &str) -> Vec<&TypeMetadata> {
        map.get(&key.to_lowercase())
            .map(|indices| indices.iter().map(|&i| &self.types[i]).collect())
            .unwrap_or_default()
    }
}

fn read_dump(path: &Path) -> Result<AssemblyMetadata, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Drops members with opaque names and orders the rest by name.
fn filter_members(mut ty: TypeMetadata) -> TypeMetadata {
    let before = ty.member_count();

    ty.methods.retain(|m| is_meaningful(&m.name));
    ty.methods.sort_by(|a, b| a.name.cmp(&b.name));
    ty.properties.retain(|p| is_meaningful(&p.name));
    ty.properties.sort_by(|a, b| a.name.cmp(&b.name));
    ty.fields.retain(|f| is_meaningful(&f.name));
    ty.fields.sort_by(|a, b| a.name.cmp(&b.name));
    ty.enum_values.retain(|v| is_meaningful(&v.name));

    let dropped = before - ty.member_count();
    if dropped > 0 {
        tracing::debug!(
            "Dropped {} members with opaque names from {}",
            dropped,
            ty.full_name()
        );
    }
    ty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{FieldMetadata, MethodMetadata};
    use assert2::check;

    fn sample_type(namespace: &str, name: &str) -> TypeMetadata {
        TypeMetadata {
            name: name.to_string(),
            namespace: namespace.to_string(),
            type_kind: "class".to_string(),
            ..Default::default()
        }
    }

    fn registry_with(types: Vec<TypeMetadata>) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register_assembly(AssemblyMetadata {
            name: "Sample".to_string(),
            types,
        });
        registry
    }

    #[test]
    fn test_lookups_are_case_insensitive() {
        let registry = registry_with(vec![
            sample_type("App.Core", "TestService"),
            sample_type("App.Core", "Outer+Inner"),
        ]);

        check!(registry.type_by_full_name("app.core.testservice").is_some());
        check!(registry.types_by_simple_name("INNER").len() == 1);
        check!(registry.types_by_simple_name("outer+inner").len() == 1);
        check!(registry.types_by_namespace("APP.CORE").len() == 2);
        check!(registry.namespaces() == vec!["App.Core"]);
    }

    #[test]
    fn test_try_get_type_requires_unambiguous_simple_name() {
        let registry = registry_with(vec![
            sample_type("A", "Widget"),
            sample_type("B", "Widget"),
            sample_type("B", "Gadget"),
        ]);

        check!(registry.try_get_type("Widget").is_none());
        check!(registry.try_get_type("A.Widget").is_some());
        check!(registry.try_get_type("gadget").map(|t| t.namespace.as_str()) == Some("B"));
    }

    #[test]
    fn test_opaque_members_are_filtered_and_sorted() {
        let mut ty = sample_type("App", "Worker");
        ty.methods = ["Stop", "a1b2c3d4", "Start"]
            .into_iter()
            .map(|name| MethodMetadata {
                name: name.to_string(),
                ..Default::default()
            })
            .collect();
        ty.fields = vec![FieldMetadata {
            name: "xkcdqwrt".to_string(),
            ..Default::default()
        }];

        let registry = registry_with(vec![ty]);
        let worker = &registry.all_types()[0];
        let names: Vec<&str> = worker.methods.iter().map(|m| m.name.as_str()).collect();
        check!(names == vec!["Start", "Stop"]);
        check!(worker.fields.is_empty());
    }

    #[test]
    fn test_load_errors_are_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("broken.json");
        std::fs::write(&bad, "{ not json").unwrap();

        let mut registry = TypeRegistry::new();
        let loaded = registry.load_catalogs([bad, dir.path().join("missing.json")]);

        check!(loaded == 0);
        check!(registry.load_errors().len() == 2);
        check!(registry.load_errors()[0].starts_with("Failed to load"));
    }

    #[test]
    fn test_directory_walk_finds_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            nested.join("lib.json"),
            r#"{ "name": "Lib", "types": [{ "name": "Widget", "namespace": "Lib" }] }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = TypeRegistry::new();
        check!(registry.load_catalogs([dir.path()]) == 1);
        check!(registry.load_errors().is_empty());
    }
}
