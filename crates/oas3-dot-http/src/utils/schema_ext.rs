use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, SchemaType, SchemaTypeSet},
};

/// Shape queries over `ObjectSchema` used while lowering schemas into type nodes.
pub(crate) trait SchemaExt {
  /// Returns true if the schema is explicitly null type.
  fn is_null(&self) -> bool;

  /// Returns true for `{type: "null"}` and property-less `{type: ["object", "null"]}`.
  fn is_nullable_object(&self) -> bool;

  /// Returns the single `SchemaType` if exactly one is defined.
  fn single_type(&self) -> Option<SchemaType>;

  /// Every type of a multi-type set other than `null`.
  fn declared_types(&self) -> Vec<SchemaType>;

  fn has_union(&self) -> bool;

  /// `oneOf` variants followed by `anyOf` variants.
  fn union_variants(&self) -> impl Iterator<Item = &ObjectOrReference<ObjectSchema>>;

  /// Union variants that do not resolve to a null placeholder.
  fn non_null_variants<'a>(&'a self, spec: &Spec) -> Vec<&'a ObjectOrReference<ObjectSchema>>;

  /// The scalar name samples are looked up by, derived from type and format.
  fn scalar_name(&self, schema_type: SchemaType) -> Option<String>;
}

impl SchemaExt for ObjectSchema {
  fn is_null(&self) -> bool {
    self.single_type() == Some(SchemaType::Null)
  }

  fn is_nullable_object(&self) -> bool {
    if self.is_null() {
      return true;
    }
    if let Some(SchemaTypeSet::Multiple(types)) = &self.schema_type {
      types.contains(&SchemaType::Null) && types.contains(&SchemaType::Object) && self.properties.is_empty()
    } else {
      false
    }
  }

  fn single_type(&self) -> Option<SchemaType> {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(t)) => Some(*t),
      _ => None,
    }
  }

  fn declared_types(&self) -> Vec<SchemaType> {
    match &self.schema_type {
      Some(SchemaTypeSet::Single(t)) => vec![*t],
      Some(SchemaTypeSet::Multiple(types)) => types.iter().filter(|t| **t != SchemaType::Null).copied().collect(),
      None => vec![],
    }
  }

  fn has_union(&self) -> bool {
    !self.one_of.is_empty() || !self.any_of.is_empty()
  }

  fn union_variants(&self) -> impl Iterator<Item = &ObjectOrReference<ObjectSchema>> {
    self.one_of.iter().chain(&self.any_of)
  }

  fn non_null_variants<'a>(&'a self, spec: &Spec) -> Vec<&'a ObjectOrReference<ObjectSchema>> {
    self
      .union_variants()
      .filter(|variant| !variant.resolve(spec).is_ok_and(|schema| schema.is_nullable_object()))
      .collect()
  }

  fn scalar_name(&self, schema_type: SchemaType) -> Option<String> {
    let format = self.format.as_deref();
    let name = match (schema_type, format) {
      (SchemaType::String, Some("date")) => "date",
      (SchemaType::String, Some("date-time")) => "datetime",
      (SchemaType::String, Some("duration")) => "duration",
      (SchemaType::String, Some("uuid")) => "guid",
      (SchemaType::String, Some("byte" | "binary")) => "bytes",
      (SchemaType::String, _) => "string",
      (SchemaType::Boolean, _) => "boolean",
      (SchemaType::Integer, None) => "integer",
      (SchemaType::Number, None) => "number",
      (SchemaType::Number, Some("float")) => "float32",
      (SchemaType::Number, Some("double")) => "float64",
      (SchemaType::Integer | SchemaType::Number, Some(other)) => other,
      (SchemaType::Array | SchemaType::Object | SchemaType::Null, _) => return None,
    };
    Some(name.to_string())
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn schema(value: serde_json::Value) -> ObjectSchema {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn test_scalar_names() {
    let cases = [
      (json!({"type": "string"}), SchemaType::String, Some("string")),
      (json!({"type": "string", "format": "date-time"}), SchemaType::String, Some("datetime")),
      (json!({"type": "string", "format": "uuid"}), SchemaType::String, Some("guid")),
      (json!({"type": "string", "format": "email"}), SchemaType::String, Some("string")),
      (json!({"type": "integer", "format": "int64"}), SchemaType::Integer, Some("int64")),
      (json!({"type": "integer"}), SchemaType::Integer, Some("integer")),
      (json!({"type": "number", "format": "double"}), SchemaType::Number, Some("float64")),
      (json!({"type": "number", "format": "money"}), SchemaType::Number, Some("money")),
      (json!({"type": "array"}), SchemaType::Array, None),
    ];
    for (value, schema_type, expected) in cases {
      let schema = schema(value);
      assert_eq!(schema.scalar_name(schema_type).as_deref(), expected, "{schema:?}");
    }
  }

  #[test]
  fn test_nullable_types() {
    let nullable = schema(json!({"type": ["string", "null"]}));
    assert_eq!(nullable.declared_types(), vec![SchemaType::String]);
    assert!(schema(json!({"type": "null"})).is_nullable_object());
    assert!(schema(json!({"type": ["object", "null"]})).is_nullable_object());
    assert!(!schema(json!({"type": "string"})).is_nullable_object());
    assert!(schema(json!({})).declared_types().is_empty());
  }
}
