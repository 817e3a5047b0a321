//! Conversion of catalog elements into indexable documents.

use crate::catalog::model::{
    EnumValueMetadata, FieldMetadata, MethodMetadata, NESTED_TYPE_SEPARATOR, PropertyMetadata,
    TypeMetadata,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tokenize::tokenize_text;

/// Category of a catalogable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Type,
    Method,
    Property,
    Field,
    EnumValue,
}

impl ElementKind {
    pub const ALL: [Self; 5] = [
        Self::Type,
        Self::Method,
        Self::Property,
        Self::Field,
        Self::EnumValue,
    ];

    /// Display name, also used as the facet key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Field => "Field",
            Self::EnumValue => "EnumValue",
        }
    }

    /// Prefix of document ids for this kind.
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Method => "method",
            Self::Property => "property",
            Self::Field => "field",
            Self::EnumValue => "enum",
        }
    }

    /// Maps a scope keyword (`types`, `methods`, ...) to its kind, ignoring case.
    pub fn from_scope(scope: &str) -> Option<Self> {
        match scope.trim().to_ascii_lowercase().as_str() {
            "types" => Some(Self::Type),
            "methods" => Some(Self::Method),
            "properties" => Some(Self::Property),
            "fields" => Some(Self::Field),
            "enums" => Some(Self::EnumValue),
            _ => None,
        }
    }

    pub(crate) const fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of search: one catalog element flattened into text fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// `{kind}:{fully qualified name}`; unique within one index build
    pub id: String,
    pub kind: ElementKind,
    pub name: String,
    pub full_name: String,
    pub parent_type: Option<String>,
    pub return_type: Option<String>,
    pub documentation: Option<String>,
    pub namespace: Option<String>,
    /// `"name type"` pairs in declaration order
    pub parameters: Option<Vec<String>>,
    /// Raw field texts interleaved with their tokens
    pub content_tokens: Vec<String>,
}

/// A borrowed catalog element ready to be turned into a document.
#[derive(Debug, Clone, Copy)]
pub enum CatalogElement<'a> {
    Type(&'a TypeMetadata),
    Method(&'a MethodMetadata),
    Property(&'a PropertyMetadata),
    Field(&'a FieldMetadata),
    EnumValue(&'a EnumValueMetadata),
}

impl CatalogElement<'_> {
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Type(_) => ElementKind::Type,
            Self::Method(_) => ElementKind::Method,
            Self::Property(_) => ElementKind::Property,
            Self::Field(_) => ElementKind::Field,
            Self::EnumValue(_) => ElementKind::EnumValue,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Type(t) => &t.name,
            Self::Method(m) => &m.name,
            Self::Property(p) => &p.name,
            Self::Field(f) => &f.name,
            Self::EnumValue(v) => &v.name,
        }
    }
}

/// Builds the document for `element`.
///
/// Members are qualified with `parent`'s full name and inherit its namespace.
/// Method ids also carry the parameter types so overloads stay distinct.
pub fn build_document(element: CatalogElement<'_>, parent: Option<&TypeMetadata>) -> IndexedDocument {
    let kind = element.kind();
    let name = element.name().to_string();

    let (full_name, parent_type, namespace) = match (element, parent) {
        (CatalogElement::Type(ty), _) => (ty.full_name(), None, non_empty(&ty.namespace)),
        (_, Some(parent)) => {
            let parent_full = parent.full_name();
            (
                format!("{}.{}", parent_full, name),
                Some(parent_full),
                non_empty(&parent.namespace),
            )
        }
        (_, None) => (name.clone(), None, None),
    };

    let (return_type, documentation, parameters) = match element {
        CatalogElement::Type(ty) => (None, ty.documentation.clone(), None),
        CatalogElement::Method(m) => {
            let parameters: Vec<String> = m
                .parameters
                .iter()
                .map(|p| format!("{} {}", p.name, p.r#type))
                .collect();
            (
                non_empty(&m.return_type),
                m.documentation.clone(),
                (!parameters.is_empty()).then_some(parameters),
            )
        }
        CatalogElement::Property(p) => (non_empty(&p.r#type), p.documentation.clone(), None),
        CatalogElement::Field(f) => (non_empty(&f.r#type), f.documentation.clone(), None),
        CatalogElement::EnumValue(v) => (v.value.clone(), None, None),
    };

    let id = match element {
        CatalogElement::Method(m) => format!("{}:{}({})", kind.id_prefix(), full_name, m.signature()),
        _ => format!("{}:{}", kind.id_prefix(), full_name),
    };

    let joined_parameters = parameters.as_ref().map(|p| p.join(" "));
    let content_tokens = searchable_content(&[
        Some(name.as_str()),
        Some(full_name.as_str()),
        namespace.as_deref(),
        documentation.as_deref(),
        return_type.as_deref(),
        joined_parameters.as_deref(),
    ]);

    IndexedDocument {
        id,
        kind,
        name,
        full_name,
        parent_type,
        return_type,
        documentation,
        namespace,
        parameters,
        content_tokens,
    }
}

/// Builds the document for a type followed by one document per member.
pub fn documents_for_type(ty: &TypeMetadata) -> Vec<IndexedDocument> {
    let mut documents = Vec::with_capacity(1 + ty.member_count());
    documents.push(build_document(CatalogElement::Type(ty), None));

    let members = ty
        .methods
        .iter()
        .map(CatalogElement::Method)
        .chain(ty.properties.iter().map(CatalogElement::Property))
        .chain(ty.fields.iter().map(CatalogElement::Field))
        .chain(ty.enum_values.iter().map(CatalogElement::EnumValue));

    documents.extend(members.map(|member| build_document(member, Some(ty))));
    documents
}

/// Flattens field texts into content entries: each raw text followed by its tokens.
///
/// Nested type names (`Outer+Inner`) contribute every segment on its own plus the
/// whole name with separators turned into spaces.
fn searchable_content(parts: &[Option<&str>]) -> Vec<String> {
    let mut content = Vec::new();

    for part in parts.iter().flatten() {
        if part.trim().is_empty() {
            continue;
        }

        if part.contains(NESTED_TYPE_SEPARATOR) {
            for segment in part.split(NESTED_TYPE_SEPARATOR).filter(|s| !s.is_empty()) {
                content.push(segment.to_string());
                content.extend(tokenize_text(segment));
            }
            content.push(part.replace(NESTED_TYPE_SEPARATOR, " "));
        } else {
            content.push(part.to_string());
            content.extend(tokenize_text(part));
        }
    }

    content
}

fn non_empty(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_string())
}
