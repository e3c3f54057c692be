use oas3::spec::Ref;

/// Name of the component an internal `$ref` points at.
///
/// Only `#/components/...` pointers are followed; external documents and
/// malformed pointers yield `None`.
pub fn parse_schema_ref_path(ref_path: &str) -> Option<String> {
  if !ref_path.starts_with("#/components") {
    return None;
  }

  ref_path.parse::<Ref>().ok().map(|component| component.name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_schema_ref_path() {
    assert_eq!(parse_schema_ref_path("#/components/schemas/Pet"), Some("Pet".to_string()));
    assert_eq!(parse_schema_ref_path("other.yaml#/components/schemas/Pet"), None);
    assert_eq!(parse_schema_ref_path("#/definitions/Pet"), None);
  }
}
