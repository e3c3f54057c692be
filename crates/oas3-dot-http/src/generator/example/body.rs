use mediatype::MediaType;

use super::{ExampleSynthesizer, SynthesisContext};
use crate::generator::descriptor::{BodyDescriptor, BodyKind};

pub const NO_BODY_MODEL: &str = "// No body model found for this request";
pub const UNSUPPORTED_BODY: &str = "// File body or multipart body found, not supported yet";

/// How the body section of a document was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyStatus {
  /// The verb does not carry a payload.
  NotApplicable,
  Missing,
  Unsupported(BodyKind),
  NonJson(String),
  Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyOutcome {
  pub lines: Vec<String>,
  pub status: BodyStatus,
}

impl BodyOutcome {
  fn placeholder(line: impl Into<String>, status: BodyStatus) -> Self {
    Self {
      lines: vec![line.into()],
      status,
    }
  }
}

/// `application/json` and `application/merge-patch+json`, parameters ignored.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
  let essence = content_type.split(';').next().unwrap_or(content_type).trim();
  let Ok(media) = MediaType::parse(essence) else {
    return false;
  };
  if !media.ty.as_str().eq_ignore_ascii_case("application") {
    return false;
  }
  let subtype = media.subty.as_str();
  match media.suffix.as_ref().map(mediatype::Name::as_str) {
    None => subtype.eq_ignore_ascii_case("json"),
    Some(suffix) => subtype.eq_ignore_ascii_case("merge-patch") && suffix.eq_ignore_ascii_case("json"),
  }
}

/// Body lines for a payload-carrying request.
///
/// Multipart and file bodies are checked before the content type; only a
/// JSON-family primary content type reaches the synthesizer.
pub fn synthesize_body(
  synthesizer: &ExampleSynthesizer<'_>,
  body: Option<&BodyDescriptor>,
  hint: &str,
  ctx: &mut SynthesisContext<'_>,
) -> BodyOutcome {
  let Some(body) = body else {
    return BodyOutcome::placeholder(NO_BODY_MODEL, BodyStatus::Missing);
  };

  if body.kind != BodyKind::Single {
    return BodyOutcome::placeholder(UNSUPPORTED_BODY, BodyStatus::Unsupported(body.kind));
  }

  let content_type = body.primary_content_type();
  if !is_json_content_type(content_type) {
    return BodyOutcome::placeholder(
      format!("// Non-JSON body ({content_type}), provide the payload manually"),
      BodyStatus::NonJson(content_type.to_string()),
    );
  }

  BodyOutcome {
    lines: synthesizer.synthesize(body.ty, hint, ctx),
    status: BodyStatus::Synthesized,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::generator::{queue::VisitationQueue, synthetics::SyntheticRegistry, types::TypeGraph};

  #[test]
  fn test_json_family() {
    assert!(is_json_content_type("application/json"));
    assert!(is_json_content_type("application/json; charset=utf-8"));
    assert!(is_json_content_type("application/merge-patch+json"));
    assert!(!is_json_content_type("application/problem+json"));
    assert!(!is_json_content_type("application/xml"));
    assert!(!is_json_content_type("text/plain"));
    assert!(!is_json_content_type("not a media type"));
  }

  #[test]
  fn test_placeholders() {
    let mut graph = TypeGraph::new();
    let string = graph.scalar("string");
    let record = graph.record(None, [("name", string)]);
    let mut registry = SyntheticRegistry::new();
    let mut queue = VisitationQueue::new();
    let mut ctx = SynthesisContext::new(&mut registry, &mut queue);
    let synthesizer = ExampleSynthesizer::new(&graph);

    let missing = synthesize_body(&synthesizer, None, "Body", &mut ctx);
    assert_eq!(missing.lines, vec![NO_BODY_MODEL]);
    assert_eq!(missing.status, BodyStatus::Missing);

    let multipart = BodyDescriptor::builder()
      .kind(BodyKind::Multipart)
      .content_types(vec!["application/json".into()])
      .ty(record)
      .build();
    let outcome = synthesize_body(&synthesizer, Some(&multipart), "Body", &mut ctx);
    assert_eq!(outcome.lines, vec![UNSUPPORTED_BODY]);

    let xml = BodyDescriptor::builder()
      .content_types(vec!["application/xml".into()])
      .ty(record)
      .build();
    let outcome = synthesize_body(&synthesizer, Some(&xml), "Body", &mut ctx);
    assert_eq!(
      outcome.lines,
      vec!["// Non-JSON body (application/xml), provide the payload manually"]
    );
    assert_eq!(outcome.status, BodyStatus::NonJson("application/xml".into()));
  }

  #[test]
  fn test_json_body_is_synthesized() {
    let mut graph = TypeGraph::new();
    let string = graph.scalar("string");
    let record = graph.record(None, [("name", string)]);
    let mut registry = SyntheticRegistry::new();
    let mut queue = VisitationQueue::new();
    let mut ctx = SynthesisContext::new(&mut registry, &mut queue);
    let synthesizer = ExampleSynthesizer::new(&graph);

    let patch = BodyDescriptor::builder()
      .content_types(vec!["application/merge-patch+json".into()])
      .ty(record)
      .build();
    let outcome = synthesize_body(&synthesizer, Some(&patch), "PatchBody", &mut ctx);
    assert_eq!(outcome.status, BodyStatus::Synthesized);
    assert_eq!(outcome.lines, vec!["{", " \"name\": \"example\", // Scalar string", "}"]);
  }
}
