use strum::Display;

use super::{
  descriptor::BodyKind,
  document::{RequestDocument, path_template::PathTemplateError},
  example::{BodyStatus, SynthesisIssue},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub services: usize,
  pub operations_seen: usize,
  pub documents_generated: usize,
  pub bodies_synthesized: usize,
  pub models_generated: usize,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_service(&mut self) {
    self.services += 1;
  }

  pub fn record_skipped(&mut self, operation: &str, reason: &str) {
    self.operations_seen += 1;
    self.record_warning(GenerationWarning::SkippedOperation {
      operation: operation.to_string(),
      reason: reason.to_string(),
    });
  }

  /// Counts the document and turns its degradations into warnings.
  pub fn record_document(&mut self, document: &RequestDocument, path: &str) {
    self.operations_seen += 1;
    self.documents_generated += 1;

    let operation = document.operation.clone();
    match &document.body_status {
      BodyStatus::Synthesized => self.bodies_synthesized += 1,
      BodyStatus::Missing => self.record_warning(GenerationWarning::MissingBodyModel { operation }),
      BodyStatus::Unsupported(kind) => self.record_warning(GenerationWarning::UnsupportedBody {
        operation,
        kind: *kind,
      }),
      BodyStatus::NonJson(content_type) => self.record_warning(GenerationWarning::NonJsonBody {
        operation,
        content_type: content_type.clone(),
      }),
      BodyStatus::NotApplicable => {}
    }

    if let Some(error) = &document.path_template_error {
      self.record_warning(GenerationWarning::MalformedPathTemplate {
        path: path.to_string(),
        error: error.clone(),
      });
    }
  }

  pub fn record_issues(&mut self, operation: &str, issues: impl IntoIterator<Item = SynthesisIssue>) {
    for issue in issues {
      let warning = match issue {
        SynthesisIssue::UnrepresentableUnion { path, variants } => GenerationWarning::UnrepresentableUnion {
          operation: operation.to_string(),
          field: path,
          variants,
        },
        SynthesisIssue::UnmappedScalar { path, scalar } => GenerationWarning::UnmappedScalar {
          operation: operation.to_string(),
          field: path,
          scalar,
        },
      };
      self.record_warning(warning);
    }
  }

  pub fn record_models(&mut self, count: usize) {
    self.models_generated += count;
  }

  pub fn record_write_failure(&mut self, path: String, error: String) {
    self.record_warning(GenerationWarning::WriteFailed { path, error });
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  #[must_use]
  pub fn write_failures(&self) -> Vec<&GenerationWarning> {
    self
      .warnings
      .iter()
      .filter(|warning| matches!(warning, GenerationWarning::WriteFailed { .. }))
      .collect()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "[{operation}] {kind} body is not supported, wrote a placeholder")]
  UnsupportedBody { operation: String, kind: BodyKind },
  #[strum(to_string = "[{operation}] body content type '{content_type}' is not JSON, wrote a placeholder")]
  NonJsonBody { operation: String, content_type: String },
  #[strum(to_string = "[{operation}] payload method without a body model")]
  MissingBodyModel { operation: String },
  #[strum(to_string = "[{operation}] '{field}' has no literal variant ({variants}), used null")]
  UnrepresentableUnion {
    operation: String,
    field: String,
    variants: String,
  },
  #[strum(to_string = "[{operation}] '{field}' uses unmapped scalar '{scalar}', used a generic number")]
  UnmappedScalar {
    operation: String,
    field: String,
    scalar: String,
  },
  #[strum(to_string = "Path template '{path}': {error}")]
  MalformedPathTemplate { path: String, error: PathTemplateError },
  #[strum(to_string = "Operation '{operation}': {reason}")]
  SkippedOperation { operation: String, reason: String },
  #[strum(to_string = "Failed to write '{path}': {error}")]
  WriteFailed { path: String, error: String },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::SkippedOperation { .. } | Self::WriteFailed { .. })
  }
}
