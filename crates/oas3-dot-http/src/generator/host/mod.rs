//! The narrow interface through which services reach the generator.

mod openapi;

pub use openapi::OpenApiSource;

use super::{
  descriptor::ServiceDescriptor,
  types::{TypeGraph, TypeId},
};

/// A discovered set of services and the type graph their bodies refer to.
pub trait ServiceSource {
  fn services(&self) -> &[ServiceDescriptor];

  fn types(&self) -> &TypeGraph;

  /// Pointer into the source document for a declared type, when it has one.
  fn schema_pointer(&self, _id: TypeId) -> Option<String> {
    None
  }
}

/// A source assembled in memory, used where no document is parsed.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
  pub services: Vec<ServiceDescriptor>,
  pub types: TypeGraph,
}

impl ServiceSource for StaticSource {
  fn services(&self) -> &[ServiceDescriptor] {
    &self.services
  }

  fn types(&self) -> &TypeGraph {
    &self.types
  }
}
