//! Catalog of types loaded from metadata dumps.

pub mod model;
pub mod registry;
pub mod repository;

pub use model::{
    AssemblyMetadata, EnumValueMetadata, FieldMetadata, MethodMetadata, ParameterMetadata,
    PropertyMetadata, StructLayoutMetadata, TypeMetadata,
};
pub use registry::TypeRegistry;
pub use repository::{
    ElementMatch, ElementSearchResult, MetadataRepository, NamespaceEntry, NamespaceListing,
    TypeSummary,
};
