//! Read-side queries over the type registry: namespace listings, type details
//! and linear regex search over element names.

use crate::catalog::model::TypeMetadata;
use crate::catalog::registry::TypeRegistry;
use crate::error::CatalogError;
use crate::search::{ElementKind, Pagination, SearchScope};
use rapidfuzz::distance::jaro_winkler;
use regex::RegexBuilder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Number of "did you mean" suggestions attached to a missing type.
const MAX_SUGGESTIONS: usize = 5;

/// Suggestions scoring below this similarity are dropped.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    pub name: String,
    pub full_name: String,
    pub type_kind: String,
    pub member_count: usize,
}

impl From<&TypeMetadata> for TypeSummary {
    fn from(ty: &TypeMetadata) -> Self {
        Self {
            name: ty.name.clone(),
            full_name: ty.full_name(),
            type_kind: ty.type_kind.clone(),
            member_count: ty.member_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceEntry {
    pub name: String,
    pub type_count: usize,
    pub types: Vec<TypeSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceListing {
    pub namespaces: Vec<NamespaceEntry>,
    pub pagination: Pagination,
}

/// One element whose name matched a search pattern.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMatch {
    pub element_kind: ElementKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
    /// Return type of a method, or the declared type of a property or field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    /// Literal of an enum value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ElementMatch {
    fn member(kind: ElementKind, name: &str, parent: &TypeMetadata) -> Self {
        Self {
            element_kind: kind,
            name: name.to_string(),
            full_name: None,
            type_kind: None,
            parent_type: Some(parent.full_name()),
            value_type: None,
            parameters: None,
            value: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSearchResult {
    pub results: Vec<ElementMatch>,
    pub pagination: Pagination,
    pub summary: String,
}

/// Query facade over a shared [`TypeRegistry`].
#[derive(Debug, Clone)]
pub struct MetadataRepository {
    registry: Arc<TypeRegistry>,
}

impl MetadataRepository {
    pub const fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Lists namespaces with their types, optionally restricted to `filter`.
    ///
    /// Namespaces and the types within them are sorted by name.
    pub fn query_namespaces(
        &self,
        filter: &[String],
        limit: usize,
        offset: usize,
    ) -> Result<NamespaceListing, CatalogError> {
        self.ensure_loaded()?;

        let types: Vec<&TypeMetadata> = if filter.is_empty() {
            self.registry.all_types().iter().collect()
        } else {
            let missing: Vec<String> = filter
                .iter()
                .filter(|ns| self.registry.types_by_namespace(ns).is_empty())
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(CatalogError::NamespaceNotFound(missing));
            }
            filter
                .iter()
                .flat_map(|ns| self.registry.types_by_namespace(ns))
                .collect()
        };

        let mut grouped: BTreeMap<&str, Vec<&TypeMetadata>> = BTreeMap::new();
        for ty in types {
            grouped.entry(ty.namespace.as_str()).or_default().push(ty);
        }

        let total = grouped.len();
        let namespaces: Vec<NamespaceEntry> = grouped
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(name, mut types)| {
                types.sort_by(|a, b| a.name.cmp(&b.name));
                NamespaceEntry {
                    name: name.to_string(),
                    type_count: types.len(),
                    types: types.into_iter().map(TypeSummary::from).collect(),
                }
            })
            .collect();

        let pagination = Pagination::new(total, limit, offset, namespaces.len());
        Ok(NamespaceListing {
            namespaces,
            pagination,
        })
    }

    /// Resolves each name (full name, or an unambiguous simple name).
    ///
    /// Fails if any name is unknown; the error carries fuzzy suggestions for
    /// the missing names.
    pub fn query_type_details(&self, names: &[String]) -> Result<Vec<&TypeMetadata>, CatalogError> {
        if names.is_empty() {
            return Err(CatalogError::NoTypeNames);
        }
        self.ensure_loaded()?;

        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.registry.try_get_type(name) {
                Some(ty) => found.push(ty),
                None => missing.push(name.clone()),
            }
        }

        if !missing.is_empty() {
            let suggestions = self.suggest(&missing);
            return Err(CatalogError::TypeNotFound {
                missing,
                suggestions,
            });
        }

        found.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.namespace.cmp(&b.namespace)));
        Ok(found)
    }

    /// Scans every type and member, in namespace then type-name order, for
    /// names matching `pattern` (case-insensitive regex).
    pub fn search_elements(
        &self,
        pattern: &str,
        scope: &str,
        limit: usize,
        offset: usize,
    ) -> Result<ElementSearchResult, CatalogError> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        let scope = SearchScope::parse(scope);

        let mut types: Vec<&TypeMetadata> = self.registry.all_types().iter().collect();
        types.sort_by(|a, b| a.namespace.cmp(&b.namespace).then_with(|| a.name.cmp(&b.name)));

        let mut matches = Vec::new();
        for ty in types {
            collect_matches(ty, &regex, scope, &mut matches);
        }

        let total = matches.len();
        let results: Vec<ElementMatch> = matches.into_iter().skip(offset).take(limit).collect();
        let pagination = Pagination::new(total, limit, offset, results.len());

        Ok(ElementSearchResult {
            results,
            pagination,
            summary: format!(
                "Found {} result{} for pattern '{}'",
                total,
                if total == 1 { "" } else { "s" },
                pattern
            ),
        })
    }

    fn ensure_loaded(&self) -> Result<(), CatalogError> {
        if self.registry.is_empty() && !self.registry.load_errors().is_empty() {
            return Err(CatalogError::NothingLoaded(self.registry.load_errors().to_vec()));
        }
        Ok(())
    }

    /// Known full names closest to any of `missing`, best first.
    fn suggest(&self, missing: &[String]) -> Vec<String> {
        let mut scored: Vec<(String, f64)> = self
            .registry
            .all_types()
            .iter()
            .map(|ty| {
                let full_name = ty.full_name();
                let candidate = full_name.to_lowercase();
                let simple = ty.simple_name().to_lowercase();
                let score = missing
                    .iter()
                    .map(|name| {
                        let name = name.to_lowercase();
                        jaro_winkler::similarity(name.chars(), candidate.chars())
                            .max(jaro_winkler::similarity(name.chars(), simple.chars()))
                    })
                    .fold(0.0, f64::max);
                (full_name, score)
            })
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|(a_name, a), (b_name, b)| b.total_cmp(a).then_with(|| a_name.cmp(b_name)));
        scored.dedup_by(|a, b| a.0 == b.0);
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(name, _)| name)
            .collect()
    }
}

fn collect_matches(
    ty: &TypeMetadata,
    regex: &regex::Regex,
    scope: SearchScope,
    out: &mut Vec<ElementMatch>,
) {
    if scope.matches(ElementKind::Type) && regex.is_match(&ty.name) {
        out.push(ElementMatch {
            full_name: Some(ty.full_name()),
            type_kind: Some(ty.type_kind.clone()),
            parent_type: None,
            ..ElementMatch::member(ElementKind::Type, &ty.name, ty)
        });
    }

    if scope.matches(ElementKind::Method) {
        for method in ty.methods.iter().filter(|m| regex.is_match(&m.name)) {
            out.push(ElementMatch {
                value_type: Some(method.return_type.clone()),
                parameters: Some(method.parameters.iter().map(|p| p.r#type.clone()).collect()),
                ..ElementMatch::member(ElementKind::Method, &method.name, ty)
            });
        }
    }

    if scope.matches(ElementKind::Property) {
        for property in ty.properties.iter().filter(|p| regex.is_match(&p.name)) {
            out.push(ElementMatch {
                value_type: Some(property.r#type.clone()),
                ..ElementMatch::member(ElementKind::Property, &property.name, ty)
            });
        }
    }

    if scope.matches(ElementKind::Field) {
        for field in ty.fields.iter().filter(|f| regex.is_match(&f.name)) {
            out.push(ElementMatch {
                value_type: Some(field.r#type.clone()),
                ..ElementMatch::member(ElementKind::Field, &field.name, ty)
            });
        }
    }

    if scope.matches(ElementKind::EnumValue) {
        for value in ty.enum_values.iter().filter(|v| regex.is_match(&v.name)) {
            out.push(ElementMatch {
                value: value.value.clone(),
                ..ElementMatch::member(ElementKind::EnumValue, &value.name, ty)
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::{AssemblyMetadata, EnumValueMetadata, MethodMetadata, PropertyMetadata};
    use assert2::{check, let_assert};
    use rstest::{fixture, rstest};

    #[fixture]
    fn repository() -> MetadataRepository {
        let service = TypeMetadata {
            name: "TestService".to_string(),
            namespace: "App.Services".to_string(),
            type_kind: "class".to_string(),
            methods: vec![MethodMetadata {
                name: "DoWork".to_string(),
                return_type: "System.Void".to_string(),
                ..Default::default()
            }],
            properties: vec![PropertyMetadata {
                name: "WorkCount".to_string(),
                r#type: "System.Int32".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let color = TypeMetadata {
            name: "Color".to_string(),
            namespace: "App.Models".to_string(),
            type_kind: "enum".to_string(),
            enum_values: vec![EnumValueMetadata {
                name: "Red".to_string(),
                value: Some("0".to_string()),
            }],
            ..Default::default()
        };

        let mut registry = TypeRegistry::new();
        registry.register_assembly(AssemblyMetadata {
            name: "App".to_string(),
            types: vec![service, color],
        });
        MetadataRepository::new(Arc::new(registry))
    }

    #[rstest]
    fn test_namespaces_sorted_and_paged(repository: MetadataRepository) {
        let listing = repository.query_namespaces(&[], 1, 0).unwrap();
        check!(listing.pagination.total == 2);
        check!(listing.pagination.has_more);
        check!(listing.namespaces[0].name == "App.Models");
        check!(listing.namespaces[0].types[0].full_name == "App.Models.Color");
    }

    #[rstest]
    fn test_unknown_namespace(repository: MetadataRepository) {
        let result = repository.query_namespaces(&["Nope".to_string()], 10, 0);
        let_assert!(Err(CatalogError::NamespaceNotFound(missing)) = result);
        check!(missing == vec!["Nope".to_string()]);
    }

    #[rstest]
    fn test_type_details_with_suggestions(repository: MetadataRepository) {
        let found = repository
            .query_type_details(&["color".to_string(), "App.Services.TestService".to_string()])
            .unwrap();
        let names: Vec<&str> = found.iter().map(|t| t.name.as_str()).collect();
        check!(names == vec!["Color", "TestService"]);

        let result = repository.query_type_details(&["TestServise".to_string()]);
        let_assert!(Err(CatalogError::TypeNotFound { missing, suggestions }) = result);
        check!(missing == vec!["TestServise".to_string()]);
        check!(suggestions.first().map(String::as_str) == Some("App.Services.TestService"));
    }

    #[rstest]
    fn test_search_elements_scoped(repository: MetadataRepository) {
        let result = repository.search_elements("work", "all", 10, 0).unwrap();
        check!(result.pagination.total == 2);
        check!(result.summary == "Found 2 results for pattern 'work'");

        let props = repository.search_elements("WORK", "properties", 10, 0).unwrap();
        check!(props.results.len() == 1);
        check!(props.results[0].value_type.as_deref() == Some("System.Int32"));
    }

    #[rstest]
    fn test_invalid_pattern_is_an_error(repository: MetadataRepository) {
        let result = repository.search_elements("(unclosed", "all", 10, 0);
        check!(matches!(result, Err(CatalogError::InvalidPattern(_))));
    }

    #[test]
    fn test_nothing_loaded() {
        let mut registry = TypeRegistry::new();
        registry.load_catalogs(["/definitely/missing.json"]);
        let repository = MetadataRepository::new(Arc::new(registry));
        check!(matches!(
            repository.query_namespaces(&[], 10, 0),
            Err(CatalogError::NothingLoaded(_))
        ));
    }
}
