//! Host-independent metadata consumed by the document assembler.

use bon::Builder;
use http::Method;
use strum::Display;

use super::{naming::document_stem, types::TypeId};

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterLocation {
  Path,
  Query,
  Header,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
  pub name: String,
  pub location: ParameterLocation,
}

impl ParameterDescriptor {
  pub fn path(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      location: ParameterLocation::Path,
    }
  }

  pub fn query(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      location: ParameterLocation::Query,
    }
  }

  pub fn header(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      location: ParameterLocation::Header,
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum BodyKind {
  #[default]
  Single,
  Multipart,
  File,
}

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct BodyDescriptor {
  #[builder(default)]
  pub kind: BodyKind,
  #[builder(default)]
  pub content_types: Vec<String>,
  pub ty: TypeId,
}

impl BodyDescriptor {
  /// The first declared content type, `application/json` when none is declared.
  #[must_use]
  pub fn primary_content_type(&self) -> &str {
    self.content_types.first().map_or(DEFAULT_CONTENT_TYPE, String::as_str)
  }
}

/// Service-level authentication: absent, a bare flag, or a set of scheme names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthRequirement {
  #[default]
  None,
  Required,
  Schemes(Vec<String>),
}

impl AuthRequirement {
  #[must_use]
  pub fn is_required(&self) -> bool {
    match self {
      Self::None => false,
      Self::Required => true,
      Self::Schemes(schemes) => !schemes.is_empty(),
    }
  }
}

#[derive(Debug, Clone, Builder)]
pub struct OperationDescriptor {
  #[builder(into)]
  pub name: String,
  #[builder(into)]
  pub group: String,
  pub verb: Option<Method>,
  #[builder(into)]
  pub path: String,
  #[builder(default)]
  pub parameters: Vec<ParameterDescriptor>,
  pub body: Option<BodyDescriptor>,
  #[builder(default)]
  pub authentication: AuthRequirement,
}

impl OperationDescriptor {
  /// The verb used on the request line, `GET` when the host left it out.
  #[must_use]
  pub fn effective_verb(&self) -> Method {
    self.verb.clone().unwrap_or(Method::GET)
  }

  /// `<group>_<operation>_<verb>`, the document file name without extension.
  #[must_use]
  pub fn document_stem(&self) -> String {
    document_stem(&self.group, &self.name, self.effective_verb().as_str())
  }

  pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &ParameterDescriptor> {
    self.parameters.iter().filter(move |param| param.location == location)
  }
}

#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
  pub name: String,
  pub operations: Vec<OperationDescriptor>,
  pub authentication: AuthRequirement,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::types::TypeGraph;

  #[test]
  fn test_auth_requirement() {
    assert!(!AuthRequirement::None.is_required());
    assert!(AuthRequirement::Required.is_required());
    assert!(AuthRequirement::Schemes(vec!["bearer".into()]).is_required());
    assert!(!AuthRequirement::Schemes(vec![]).is_required());
  }

  #[test]
  fn test_primary_content_type_defaults_to_json() {
    let mut graph = TypeGraph::new();
    let ty = graph.scalar("string");
    let body = BodyDescriptor::builder().ty(ty).build();
    assert_eq!(body.primary_content_type(), "application/json");

    let body = BodyDescriptor::builder()
      .ty(ty)
      .content_types(vec!["text/plain".into(), "application/json".into()])
      .build();
    assert_eq!(body.primary_content_type(), "text/plain");
  }

  #[test]
  fn test_operation_defaults() {
    let op = OperationDescriptor::builder()
      .name("listPets")
      .group("pets")
      .path("/pets")
      .parameters(vec![ParameterDescriptor::query("limit"), ParameterDescriptor::path("id")])
      .build();

    assert_eq!(op.effective_verb(), Method::GET);
    assert_eq!(op.document_stem(), "pets_listPets_get");
    assert_eq!(op.authentication, AuthRequirement::None);
    assert_eq!(
      op.parameters_in(ParameterLocation::Query).map(|p| p.name.as_str()).collect::<Vec<_>>(),
      vec!["limit"]
    );
  }
}
