//! Catalog data model mirroring the metadata dumps produced by the module reader.

use serde::{Deserialize, Serialize};

/// Separator the metadata reader uses between an outer type and a nested type
/// (`Outer+Inner`).
pub const NESTED_TYPE_SEPARATOR: char = '+';

/// One loaded assembly and its public types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyMetadata {
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMetadata {
    /// Simple name; nested types carry their containers (`Outer+Inner`)
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// "class", "sealed class", "struct", "enum", "nested class", ...
    #[serde(default)]
    pub type_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValueMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struct_layout: Option<StructLayoutMetadata>,
}

impl TypeMetadata {
    /// `Namespace.Name`, or just the name for types in the global namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Innermost segment of a nested type name (`Inner` for `Outer+Inner`).
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(NESTED_TYPE_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    pub fn is_nested(&self) -> bool {
        self.name.contains(NESTED_TYPE_SEPARATOR)
    }

    pub fn member_count(&self) -> usize {
        self.methods.len() + self.properties.len() + self.fields.len() + self.enum_values.len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodMetadata {
    pub name: String,
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterMetadata>,
}

impl MethodMetadata {
    /// Parameter types joined with commas, used to tell overloads apart.
    pub fn signature(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.r#type.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterMetadata {
    pub name: String,
    #[serde(default)]
    pub r#type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyMetadata {
    pub name: String,
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    pub name: String,
    #[serde(default)]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLayoutMetadata {
    /// "Auto", "Sequential" or "Explicit"
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}
