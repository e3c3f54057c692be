use std::{collections::HashSet, fmt};

use itertools::Itertools;
use serde_json::Value;

/// Identity of a node inside a [`TypeGraph`].
///
/// Two ids are the same type exactly when they are equal; structural equality of
/// the nodes they point at is irrelevant for deduplication and naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(usize);

impl fmt::Display for TypeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
  pub name: String,
  pub ty: TypeId,
}

impl Field {
  pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
    Self { name: name.into(), ty }
  }
}

/// The shape of a type as seen by example synthesis.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
  Scalar {
    name: String,
  },
  Literal(Value),
  Record {
    name: Option<String>,
    base: Option<TypeId>,
    fields: Vec<Field>,
  },
  Union {
    name: Option<String>,
    variants: Vec<TypeId>,
  },
  Array {
    element: TypeId,
  },
  Unknown {
    kind: String,
  },
}

impl TypeNode {
  #[must_use]
  pub fn declared_name(&self) -> Option<&str> {
    match self {
      Self::Record { name, .. } | Self::Union { name, .. } => name.as_deref(),
      _ => None,
    }
  }

  #[must_use]
  pub const fn is_record(&self) -> bool {
    matches!(self, Self::Record { .. })
  }

  #[must_use]
  pub const fn literal(&self) -> Option<&Value> {
    match self {
      Self::Literal(value) => Some(value),
      _ => None,
    }
  }
}

const PENDING_KIND: &str = "pending";

/// Arena owning every [`TypeNode`] discovered for a generation run.
///
/// Records refer to their fields, bases and elements through [`TypeId`]s, so
/// self-referential and mutually-referential schemas are representable without
/// cyclic ownership.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
  nodes: Vec<TypeNode>,
}

impl TypeGraph {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, node: TypeNode) -> TypeId {
    self.nodes.push(node);
    TypeId(self.nodes.len() - 1)
  }

  /// Allocates an id before its node is known. Used to close cycles while a
  /// referenced schema is still being lowered.
  pub fn reserve(&mut self) -> TypeId {
    self.add(TypeNode::Unknown {
      kind: PENDING_KIND.to_string(),
    })
  }

  pub fn replace(&mut self, id: TypeId, node: TypeNode) {
    *self.node_mut(id) = node;
  }

  /// # Panics
  ///
  /// Panics when `id` was minted by a different graph.
  #[must_use]
  pub fn get(&self, id: TypeId) -> &TypeNode {
    self
      .nodes
      .get(id.0)
      .unwrap_or_else(|| panic!("UNREACHABLE: type {id} does not belong to this graph"))
  }

  fn node_mut(&mut self, id: TypeId) -> &mut TypeNode {
    self
      .nodes
      .get_mut(id.0)
      .unwrap_or_else(|| panic!("UNREACHABLE: type {id} does not belong to this graph"))
  }

  pub fn scalar(&mut self, name: impl Into<String>) -> TypeId {
    self.add(TypeNode::Scalar { name: name.into() })
  }

  pub fn literal(&mut self, value: impl Into<Value>) -> TypeId {
    self.add(TypeNode::Literal(value.into()))
  }

  pub fn record<'a>(&mut self, name: Option<&str>, fields: impl IntoIterator<Item = (&'a str, TypeId)>) -> TypeId {
    self.add(TypeNode::Record {
      name: name.map(String::from),
      base: None,
      fields: fields.into_iter().map(|(name, ty)| Field::new(name, ty)).collect(),
    })
  }

  pub fn union(&mut self, variants: impl IntoIterator<Item = TypeId>) -> TypeId {
    self.add(TypeNode::Union {
      name: None,
      variants: variants.into_iter().collect(),
    })
  }

  pub fn array(&mut self, element: TypeId) -> TypeId {
    self.add(TypeNode::Array { element })
  }

  /// Every field of a record, inherited ones first in base-to-derived order.
  ///
  /// A base chain that loops back on itself is cut at the first repeat.
  /// Non-record ids yield no fields.
  #[must_use]
  pub fn all_fields(&self, id: TypeId) -> Vec<&Field> {
    let mut chain = vec![];
    let mut seen = HashSet::new();
    let mut cursor = Some(id);

    while let Some(current) = cursor
      && seen.insert(current)
    {
      let TypeNode::Record { base, fields, .. } = self.get(current) else {
        break;
      };
      chain.push(fields);
      cursor = *base;
    }

    chain.into_iter().rev().flatten().collect()
  }

  /// Records referenced by `id`'s fields, looking through arrays and unions.
  #[must_use]
  pub fn nested_records(&self, id: TypeId) -> Vec<TypeId> {
    let mut found = vec![];
    for field in self.all_fields(id) {
      self.collect_records(field.ty, &mut found, &mut HashSet::new());
    }
    found.into_iter().unique().filter(|nested| *nested != id).collect()
  }

  fn collect_records(&self, id: TypeId, found: &mut Vec<TypeId>, visiting: &mut HashSet<TypeId>) {
    if !visiting.insert(id) {
      return;
    }
    match self.get(id) {
      TypeNode::Record { .. } => found.push(id),
      TypeNode::Array { element } => self.collect_records(*element, found, visiting),
      TypeNode::Union { variants, .. } => {
        for variant in variants {
          self.collect_records(*variant, found, visiting);
        }
      }
      TypeNode::Scalar { .. } | TypeNode::Literal(_) | TypeNode::Unknown { .. } => {}
    }
  }

  /// Short human-readable description used in trailing annotations.
  #[must_use]
  pub fn describe(&self, id: TypeId) -> String {
    self.describe_bounded(id, &mut HashSet::new())
  }

  fn describe_bounded(&self, id: TypeId, visiting: &mut HashSet<TypeId>) -> String {
    if !visiting.insert(id) {
      return "...".to_string();
    }
    let description = match self.get(id) {
      TypeNode::Scalar { name } => name.clone(),
      TypeNode::Literal(Value::String(text)) => text.clone(),
      TypeNode::Literal(value) => value.to_string(),
      TypeNode::Record { name, .. } => name.clone().unwrap_or_else(|| "object".to_string()),
      TypeNode::Union { name: Some(name), .. } => name.clone(),
      TypeNode::Union { variants, .. } => variants
        .iter()
        .map(|variant| self.describe_bounded(*variant, visiting))
        .join(" | "),
      TypeNode::Array { element } => format!("{}[]", self.describe_bounded(*element, visiting)),
      TypeNode::Unknown { kind } => kind.clone(),
    };
    visiting.remove(&id);
    description
  }
}
