use itertools::Itertools;
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PathTemplateError {
  #[strum(to_string = "unclosed '{{' at position {position} in segment '{segment}'")]
  UnclosedBrace { segment: String, position: usize },
  #[strum(to_string = "empty parameter '{{}}' in segment '{segment}'")]
  EmptyParameter { segment: String },
  #[strum(to_string = "unmatched '}}' at position {position} in segment '{segment}'")]
  UnmatchedClosingBrace { segment: String, position: usize },
  #[strum(to_string = "nested '{{' at position {position} in segment '{segment}'")]
  NestedBraces { segment: String, position: usize },
}

impl std::error::Error for PathTemplateError {}

/// `{name}` tokens of a path template, left to right, repeats included.
///
/// Empty `{}` tokens and a trailing unclosed `{` are skipped.
pub fn template_params(path: &str) -> impl Iterator<Item = &str> {
  TemplateParamIter { rest: path }
}

/// Distinct template parameter names in first-occurrence order.
#[must_use]
pub fn unique_template_params(path: &str) -> Vec<&str> {
  template_params(path).unique().collect()
}

struct TemplateParamIter<'a> {
  rest: &'a str,
}

impl<'a> Iterator for TemplateParamIter<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let open_pos = self.rest.find('{')?;
      let after_open = &self.rest[open_pos + 1..];
      let close_pos = after_open.find('}')?;
      let param = &after_open[..close_pos];
      self.rest = &after_open[close_pos + 1..];

      if !param.is_empty() {
        return Some(param);
      }
    }
  }
}

/// Rewrites every `{name}` token into the `{{name}}` variable reference.
///
/// Text outside tokens is copied verbatim, so an already substituted template
/// is never rewritten twice in one pass.
#[must_use]
pub fn substitute_variables(path: &str) -> String {
  let mut output = String::with_capacity(path.len() + 8);
  let mut rest = path;

  while let Some(open_pos) = rest.find('{') {
    let after_open = &rest[open_pos + 1..];
    let Some(close_pos) = after_open.find('}') else {
      break;
    };
    let param = &after_open[..close_pos];
    output.push_str(&rest[..open_pos]);
    if param.is_empty() {
      output.push_str("{}");
    } else {
      output.push_str("{{");
      output.push_str(param);
      output.push_str("}}");
    }
    rest = &after_open[close_pos + 1..];
  }

  output.push_str(rest);
  output
}

/// Checks that every segment has balanced, non-nested, non-empty braces.
///
/// Generation never depends on this; malformed templates are still rendered
/// and only reported.
pub fn validate(path: &str) -> Result<(), PathTemplateError> {
  for segment in path.split('/') {
    validate_segment(segment)?;
  }
  Ok(())
}

fn validate_segment(segment: &str) -> Result<(), PathTemplateError> {
  let mut open: Option<usize> = None;

  for (position, ch) in segment.char_indices() {
    match (ch, open) {
      ('{', Some(_)) => {
        return Err(PathTemplateError::NestedBraces {
          segment: segment.to_string(),
          position,
        });
      }
      ('{', None) => open = Some(position),
      ('}', None) => {
        return Err(PathTemplateError::UnmatchedClosingBrace {
          segment: segment.to_string(),
          position,
        });
      }
      ('}', Some(start)) => {
        if position == start + 1 {
          return Err(PathTemplateError::EmptyParameter {
            segment: segment.to_string(),
          });
        }
        open = None;
      }
      _ => {}
    }
  }

  match open {
    Some(position) => Err(PathTemplateError::UnclosedBrace {
      segment: segment.to_string(),
      position,
    }),
    None => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_template_params() {
    let cases: [(&str, &[&str]); 6] = [
      ("/projects/{projectKey}/repos/{repositorySlug}", &["projectKey", "repositorySlug"]),
      ("/api/v1/status", &[]),
      ("/{a}{b}/{c}", &["a", "b", "c"]),
      ("/foo/{}/bar/{id}", &["id"]),
      ("/foo/{unclosed", &[]),
      ("/{id}/copy/{id}", &["id", "id"]),
    ];
    for (path, expected) in cases {
      assert_eq!(template_params(path).collect::<Vec<_>>(), expected, "{path}");
    }
  }

  #[test]
  fn test_unique_template_params() {
    assert_eq!(unique_template_params("/{id}/copy/{id}/{to}"), vec!["id", "to"]);
  }

  #[test]
  fn test_substitute_variables() {
    let cases = [
      ("/pets/{petId}", "/pets/{{petId}}"),
      ("/{a}{b}/{c}", "/{{a}}{{b}}/{{c}}"),
      ("/{id}/copy/{id}", "/{{id}}/copy/{{id}}"),
      ("/files/{name}.{ext}", "/files/{{name}}.{{ext}}"),
      ("/static", "/static"),
      ("/foo/{}", "/foo/{}"),
      ("/foo/{unclosed", "/foo/{unclosed"),
    ];
    for (path, expected) in cases {
      assert_eq!(substitute_variables(path), expected, "{path}");
    }
  }

  #[test]
  fn test_substitution_keeps_token_order() {
    let path = "/orgs/{org}/teams/{team}/members/{user}";
    let line = substitute_variables(path);
    let positions: Vec<usize> = template_params(path)
      .map(|param| line.find(&format!("{{{{{param}}}}}")).unwrap())
      .collect();
    assert!(positions.is_sorted());
  }

  #[test]
  fn test_validate() {
    assert!(validate("/pets/{petId}/photos").is_ok());
    assert!(validate("/files/{name}.{ext}").is_ok());
    assert!(matches!(
      validate("/pets/{petId"),
      Err(PathTemplateError::UnclosedBrace { position: 0, .. })
    ));
    assert!(matches!(validate("/pets/{}"), Err(PathTemplateError::EmptyParameter { .. })));
    assert!(matches!(
      validate("/pets/id}"),
      Err(PathTemplateError::UnmatchedClosingBrace { position: 2, .. })
    ));
    assert!(matches!(
      validate("/{outer{inner}}"),
      Err(PathTemplateError::NestedBraces { position: 6, .. })
    ));
  }

  #[test]
  fn test_error_display() {
    let err = PathTemplateError::EmptyParameter {
      segment: "{}".to_string(),
    };
    assert_eq!(err.to_string(), "empty parameter '{}' in segment '{}'");
  }
}
