use std::{collections::BTreeSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

const UNNAMED: &str = "Unnamed";

/// Transliterates to ASCII, replaces invalid characters with underscores,
/// collapses runs of underscores and trims them from both ends.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// PascalCase name for models, services and synthetic types.
pub(crate) fn to_type_name(input: &str) -> String {
  let sanitized = sanitize(input);
  if sanitized.is_empty() {
    return UNNAMED.to_string();
  }

  let pascal = if sanitized.contains('_') || sanitized.chars().all(|c| !c.is_lowercase()) {
    sanitized.to_snake_case().to_pascal_case()
  } else {
    let mut chars = sanitized.chars();
    chars
      .next()
      .map(|first| first.to_uppercase().chain(chars).collect())
      .unwrap_or_default()
  };

  if pascal.starts_with(|c: char| c.is_ascii_digit()) {
    format!("T{pascal}")
  } else {
    pascal
  }
}

/// Splits an identifier into words at underscores and case changes, keeping
/// acronyms together (`HTTPStatus` is `HTTP` + `Status`).
fn split_words(input: &str) -> Vec<String> {
  let mut words = vec![];
  for chunk in sanitize(input).split('_').filter(|chunk| !chunk.is_empty()) {
    let chars: Vec<char> = chunk.chars().collect();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
      if i > 0 && c.is_uppercase() {
        let prev = chars[i - 1];
        let next_is_lower = chars.get(i + 1).is_some_and(|next| next.is_lowercase());
        if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
          words.push(std::mem::take(&mut current));
        }
      }
      current.push(c);
    }
    words.push(current);
  }
  words
}

/// The key under which a record field appears in a synthesized JSON body.
pub(crate) fn to_body_field_name(name: &str) -> String {
  let words = split_words(name);
  if words.is_empty() {
    return name.to_string();
  }

  words
    .iter()
    .enumerate()
    .map(|(i, word)| {
      let lower = word.to_lowercase();
      if i == 0 {
        return lower;
      }
      let mut chars = lower.chars();
      chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
    })
    .collect()
}

/// Appends the smallest numeric suffix (starting at 2) that makes `base_name` unused.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// Operation name for operations that carry no `operationId`.
pub(crate) fn generate_operation_id(method: &str, path: &str) -> String {
  let path_parts: Vec<&str> = path
    .split('/')
    .filter(|s| !s.is_empty())
    .map(|s| if s.starts_with('{') && s.ends_with('}') { "by_id" } else { s })
    .collect();

  let method_lower = method.to_lowercase();
  let raw = if path_parts.is_empty() {
    method_lower
  } else {
    format!("{}_{}", method_lower, path_parts.join("_"))
  };
  sanitize(&raw)
}

/// `<group>_<operation>_<verb>` with the group lower-cased, without extension.
pub(crate) fn document_stem(group: &str, operation: &str, verb: &str) -> String {
  format!("{}_{operation}_{}", group.to_lowercase(), verb.to_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_type_names() {
    let cases = [
      ("pet", "Pet"),
      ("PetStore", "PetStore"),
      ("petStore", "PetStore"),
      ("Swagger Petstore", "SwaggerPetstore"),
      ("pet_store-api", "PetStoreApi"),
      ("HTTP_URL", "HttpUrl"),
      ("XMLHttpRequest", "XMLHttpRequest"),
      ("123Response", "T123Response"),
      ("", "Unnamed"),
      ("  ", "Unnamed"),
    ];
    for (input, expected) in cases {
      assert_eq!(to_type_name(input), expected, "failed for input {input:?}");
    }
  }

  #[test]
  fn test_body_field_names_are_camel_case() {
    let cases = [
      ("first_name", "firstName"),
      ("FirstName", "firstName"),
      ("first-name", "firstName"),
      ("id", "id"),
      ("a", "a"),
    ];
    for (input, expected) in cases {
      assert_eq!(to_body_field_name(input), expected, "failed for input {input:?}");
    }
  }

  #[test]
  fn test_body_field_names_keep_acronyms_together() {
    let cases = [
      ("HTTPStatus", "httpStatus"),
      ("XMLHttpRequest", "xmlHttpRequest"),
      ("ETag", "eTag"),
      ("petID", "petId"),
      ("_id", "id"),
      ("v2Name", "v2Name"),
      ("$", "$"),
    ];
    for (input, expected) in cases {
      assert_eq!(to_body_field_name(input), expected, "failed for input {input:?}");
    }
  }

  #[test]
  fn test_ensure_unique() {
    let used: BTreeSet<String> = ["Pet", "Pet2"].into_iter().map(String::from).collect();
    assert_eq!(ensure_unique("Owner", &used), "Owner");
    assert_eq!(ensure_unique("Pet", &used), "Pet3");
  }

  #[test]
  fn test_generate_operation_id() {
    assert_eq!(generate_operation_id("GET", "/pets/{petId}"), "get_pets_by_id");
    assert_eq!(generate_operation_id("POST", "/"), "post");
    assert_eq!(generate_operation_id("DELETE", "/store/order-items"), "delete_store_order_items");
  }

  #[test]
  fn test_document_stem() {
    assert_eq!(document_stem("Pets", "listPets", "GET"), "pets_listPets_get");
  }
}
