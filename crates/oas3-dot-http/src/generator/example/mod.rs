//! Representative sample values for type trees.
//!
//! The synthesizer walks a [`TypeGraph`] from a root and produces the lines of a
//! JSON-like text block. Every value line carries a trailing `// ...` comment
//! describing the type it was synthesized from. Records nested in the body are
//! named through the run's [`SyntheticRegistry`] and queued in the run's
//! [`VisitationQueue`] so a multi-file layout can emit them on their own.

mod body;
mod scalars;

pub use body::{BodyStatus, synthesize_body};
use itertools::Itertools;
use scalars::{FALLBACK_NUMBER_SAMPLE, ScalarSample};
use strum::Display;

use super::{
  naming::{to_body_field_name, to_type_name},
  queue::VisitationQueue,
  synthetics::SyntheticRegistry,
  types::{TypeGraph, TypeId, TypeNode},
};

pub const DEFAULT_MAX_DEPTH: usize = 3;

/// A degradation hit while synthesizing; the output stays well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SynthesisIssue {
  #[strum(to_string = "'{path}' is a union without a literal variant ({variants})")]
  UnrepresentableUnion { path: String, variants: String },
  #[strum(to_string = "'{path}' uses scalar '{scalar}' which has no sample value")]
  UnmappedScalar { path: String, scalar: String },
}

/// Run-scoped state threaded through synthesis.
pub struct SynthesisContext<'r> {
  registry: &'r mut SyntheticRegistry,
  queue: &'r mut VisitationQueue<TypeId>,
  issues: Vec<SynthesisIssue>,
}

impl<'r> SynthesisContext<'r> {
  pub fn new(registry: &'r mut SyntheticRegistry, queue: &'r mut VisitationQueue<TypeId>) -> Self {
    Self {
      registry,
      queue,
      issues: vec![],
    }
  }

  pub fn take_issues(&mut self) -> Vec<SynthesisIssue> {
    std::mem::take(&mut self.issues)
  }

  fn discover(&mut self, graph: &TypeGraph, id: TypeId, hint: &str) -> String {
    let name = self.registry.name_for(graph, id, hint);
    self.queue.enqueue(id);
    name
  }
}

enum Sample {
  Inline { value: String, annotation: String },
  Nested { annotation: String, lines: Vec<String> },
}

#[derive(Debug, Clone, Copy)]
pub struct ExampleSynthesizer<'g> {
  graph: &'g TypeGraph,
  max_depth: usize,
}

impl<'g> ExampleSynthesizer<'g> {
  #[must_use]
  pub const fn new(graph: &'g TypeGraph) -> Self {
    Self {
      graph,
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }

  /// Bounds how many records deep the output nests. Values below one are
  /// raised to one so the root record always expands.
  #[must_use]
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth.max(1);
    self
  }

  #[must_use]
  pub const fn graph(&self) -> &'g TypeGraph {
    self.graph
  }

  /// Lines for the value of `root`.
  ///
  /// A record renders as a brace-delimited block; anything else renders as a
  /// single annotated value line. `hint` names the root when it is anonymous.
  pub fn synthesize(&self, root: TypeId, hint: &str, ctx: &mut SynthesisContext<'_>) -> Vec<String> {
    match self.sample(root, hint, hint, 0, &mut vec![], ctx) {
      Sample::Nested { lines, .. } => std::iter::once("{".to_string())
        .chain(lines)
        .chain(std::iter::once("}".to_string()))
        .collect(),
      Sample::Inline { value, annotation } => vec![format!("{value} // {annotation}")],
    }
  }

  fn sample(
    &self,
    id: TypeId,
    hint: &str,
    path: &str,
    depth: usize,
    stack: &mut Vec<TypeId>,
    ctx: &mut SynthesisContext<'_>,
  ) -> Sample {
    match self.graph.get(id) {
      TypeNode::Scalar { name } => self.scalar_sample(name, path, ctx),
      TypeNode::Literal(value) => Sample::Inline {
        value: value.to_string(),
        annotation: format!("Literal {value}"),
      },
      TypeNode::Record { .. } => {
        let name = ctx.discover(self.graph, id, hint);
        if stack.contains(&id) {
          return Sample::Inline {
            value: "{}".to_string(),
            annotation: format!("Model {name} (recursive reference)"),
          };
        }
        if stack.len() >= self.max_depth {
          return Sample::Inline {
            value: "{}".to_string(),
            annotation: format!("Model {name} (depth limit reached)"),
          };
        }
        stack.push(id);
        let lines = self.field_lines(id, &name, depth + 1, stack, ctx);
        stack.pop();
        Sample::Nested {
          annotation: format!("Model {name}"),
          lines,
        }
      }
      TypeNode::Union { variants, .. } => self.union_sample(variants, hint, path, ctx),
      TypeNode::Array { element } => {
        if self.graph.get(*element).is_record() {
          ctx.discover(self.graph, *element, &format!("{hint}Item"));
        }
        Sample::Inline {
          value: "[]".to_string(),
          annotation: format!("Array of {}", self.label(*element, ctx)),
        }
      }
      TypeNode::Unknown { kind } => Sample::Inline {
        value: "null".to_string(),
        annotation: format!("Unknown type: {kind}"),
      },
    }
  }

  fn scalar_sample(&self, name: &str, path: &str, ctx: &mut SynthesisContext<'_>) -> Sample {
    let value = if let Some(sample) = ScalarSample::lookup(name) {
      sample.json()
    } else {
      ctx.issues.push(SynthesisIssue::UnmappedScalar {
        path: path.to_string(),
        scalar: name.to_string(),
      });
      FALLBACK_NUMBER_SAMPLE
    };
    Sample::Inline {
      value: value.to_string(),
      annotation: format!("Scalar {name}"),
    }
  }

  fn union_sample(&self, variants: &[TypeId], hint: &str, path: &str, ctx: &mut SynthesisContext<'_>) -> Sample {
    for (index, variant) in variants.iter().enumerate() {
      if self.graph.get(*variant).is_record() {
        ctx.discover(self.graph, *variant, &format!("{hint}Variant{}", index + 1));
      }
    }

    let description = variants.iter().map(|variant| self.label(*variant, ctx)).join(" | ");

    if let Some(literal) = variants.iter().find_map(|variant| self.graph.get(*variant).literal()) {
      return Sample::Inline {
        value: literal.to_string(),
        annotation: format!("Union type: {description}"),
      };
    }

    ctx.issues.push(SynthesisIssue::UnrepresentableUnion {
      path: path.to_string(),
      variants: description.clone(),
    });
    Sample::Inline {
      value: "null".to_string(),
      annotation: format!("Union type: {description} (no literal variant)"),
    }
  }

  fn field_lines(
    &self,
    id: TypeId,
    owner: &str,
    depth: usize,
    stack: &mut Vec<TypeId>,
    ctx: &mut SynthesisContext<'_>,
  ) -> Vec<String> {
    let indent = " ".repeat(depth);
    let mut lines = vec![];

    for field in self.graph.all_fields(id) {
      let key = to_body_field_name(&field.name);
      let hint = format!("{owner}{}", to_type_name(&field.name));
      let path = format!("{owner}.{}", field.name);

      match self.sample(field.ty, &hint, &path, depth, stack, ctx) {
        Sample::Inline { value, annotation } => lines.push(format!("{indent}\"{key}\": {value}, // {annotation}")),
        Sample::Nested {
          annotation,
          lines: nested,
        } => {
          lines.push(format!("{indent}\"{key}\": {{ // {annotation}"));
          lines.extend(nested);
          lines.push(format!("{indent}}},"));
        }
      }
    }
    lines
  }

  /// Records are labelled with their run name once they have one.
  fn label(&self, id: TypeId, ctx: &SynthesisContext<'_>) -> String {
    match ctx.registry.name_of(id) {
      Some(name) if self.graph.get(id).is_record() => name.to_string(),
      _ => self.graph.describe(id),
    }
  }
}
