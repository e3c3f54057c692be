use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::{
  naming::{ensure_unique, to_type_name},
  types::{TypeGraph, TypeId},
};

/// Names handed out to types during one generation run.
///
/// Declared types keep their own name; anonymous types get the name derived
/// from the place they were first encountered. Either way a type is named once
/// and every later encounter reuses that name.
#[derive(Debug, Clone, Default)]
pub struct SyntheticRegistry {
  names: IndexMap<TypeId, String>,
  used: BTreeSet<String>,
}

impl SyntheticRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn name_of(&self, id: TypeId) -> Option<&str> {
    self.names.get(&id).map(String::as_str)
  }

  /// Returns the existing name of `id`, or assigns one.
  ///
  /// The declared name wins over `hint`; a collision with a name already handed
  /// to a different type gets a numeric suffix.
  pub fn name_for(&mut self, graph: &TypeGraph, id: TypeId, hint: &str) -> String {
    if let Some(existing) = self.names.get(&id) {
      return existing.clone();
    }

    let preferred = graph.get(id).declared_name().map_or_else(|| to_type_name(hint), to_type_name);
    let name = ensure_unique(&preferred, &self.used);
    self.used.insert(name.clone());
    self.names.insert(id, name.clone());
    name
  }

  #[must_use]
  pub fn is_synthetic(&self, graph: &TypeGraph, id: TypeId) -> bool {
    self.names.contains_key(&id) && graph.get(id).declared_name().is_none()
  }

  pub fn iter(&self) -> impl Iterator<Item = (TypeId, &str)> {
    self.names.iter().map(|(id, name)| (*id, name.as_str()))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.names.len()
  }
}
