use http::Method;
use oas3::Spec;

use crate::generator::{
  descriptor::{AuthRequirement, BodyDescriptor, OperationDescriptor, ParameterDescriptor, ServiceDescriptor},
  document::{DocumentAssembler, DocumentOptions, RequestDocument},
  example::{ExampleSynthesizer, SynthesisContext},
  queue::VisitationQueue,
  synthetics::SyntheticRegistry,
  types::{TypeGraph, TypeId},
};

pub(super) fn parse_spec(json: &str) -> Spec {
  oas3::from_json(json).expect("failed to parse test spec")
}

pub(super) fn operation(name: &str, verb: Method, path: &str) -> OperationDescriptor {
  OperationDescriptor::builder()
    .name(name)
    .group("pets")
    .verb(verb)
    .path(path)
    .build()
}

pub(super) fn operation_with(
  name: &str,
  verb: Method,
  path: &str,
  parameters: Vec<ParameterDescriptor>,
  body: Option<BodyDescriptor>,
  authentication: AuthRequirement,
) -> OperationDescriptor {
  OperationDescriptor::builder()
    .name(name)
    .group("pets")
    .verb(verb)
    .path(path)
    .parameters(parameters)
    .maybe_body(body)
    .authentication(authentication)
    .build()
}

pub(super) fn json_body(ty: TypeId) -> BodyDescriptor {
  BodyDescriptor::builder()
    .content_types(vec!["application/json".to_string()])
    .ty(ty)
    .build()
}

pub(super) fn service(name: &str, operations: Vec<OperationDescriptor>) -> ServiceDescriptor {
  ServiceDescriptor {
    name: name.to_string(),
    operations,
    authentication: AuthRequirement::None,
  }
}

/// Assembles with default options and a fresh queue, returning the queue as well.
pub(super) fn assemble(graph: &TypeGraph, operation: &OperationDescriptor) -> (RequestDocument, VisitationQueue<TypeId>) {
  let options = DocumentOptions::default();
  let assembler = DocumentAssembler::new(ExampleSynthesizer::new(graph), &options);
  let mut registry = SyntheticRegistry::new();
  let mut queue = VisitationQueue::new();
  let document = {
    let mut ctx = SynthesisContext::new(&mut registry, &mut queue);
    assembler.assemble(operation, &mut ctx)
  };
  (document, queue)
}

pub(super) fn lines(document: &RequestDocument) -> Vec<&str> {
  document.contents.lines().collect()
}
