use std::collections::{BTreeSet, HashSet};

use bon::Builder;

use super::{
  descriptor::{OperationDescriptor, ServiceDescriptor},
  document::{DocumentAssembler, DocumentOptions},
  example::{DEFAULT_MAX_DEPTH, ExampleSynthesizer},
  host::ServiceSource,
  layout::{OutputLayout, ServiceOutput},
  metrics::GenerationStats,
  modules::RenderedFile,
  naming::ensure_unique,
  run::GenerationRun,
};

#[derive(Debug, Clone, Builder)]
pub struct GenerateOptions {
  #[builder(default)]
  pub document: DocumentOptions,
  #[builder(default = DEFAULT_MAX_DEPTH)]
  pub max_depth: usize,
  /// Also write one `models/<Name>.jsonc` file per record reached from a body.
  #[builder(default)]
  pub emit_models: bool,
  pub only: Option<HashSet<String>>,
  pub exclude: Option<HashSet<String>>,
  /// Prefix for literal schema imports in model files.
  #[builder(default)]
  pub source_label: String,
}

impl Default for GenerateOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl GenerateOptions {
  /// Why `name` is left out, or `None` when it is generated.
  fn exclusion_reason(&self, name: &str) -> Option<&'static str> {
    if let Some(only) = &self.only
      && !only.contains(name)
    {
      return Some("not selected by --only");
    }
    if let Some(exclude) = &self.exclude
      && exclude.contains(name)
    {
      return Some("excluded by --exclude");
    }
    None
  }
}

#[derive(Debug, Clone)]
pub struct GeneratedOutput {
  /// Paths are relative to the output directory.
  pub files: Vec<RenderedFile>,
  pub stats: GenerationStats,
}

pub struct Orchestrator<S: ServiceSource> {
  source: S,
  options: GenerateOptions,
}

impl<S: ServiceSource> Orchestrator<S> {
  pub fn new(source: S, options: GenerateOptions) -> Self {
    Self { source, options }
  }

  /// Generates every service of the source.
  ///
  /// Each service runs with its own queue and name registry, so names handed
  /// out for one service never leak into another.
  pub fn generate(&self) -> anyhow::Result<GeneratedOutput> {
    let mut stats = GenerationStats::default();
    let mut layout = OutputLayout::new(&self.options.source_label);

    for service in self.source.services() {
      let output = self.generate_service(service, &mut stats);
      layout.add_service(&output)?;
    }

    Ok(GeneratedOutput {
      files: layout.render()?,
      stats,
    })
  }

  fn generate_service(&self, service: &ServiceDescriptor, stats: &mut GenerationStats) -> ServiceOutput {
    stats.record_service();

    let synthesizer = ExampleSynthesizer::new(self.source.types()).with_max_depth(self.options.max_depth);
    let assembler = DocumentAssembler::new(synthesizer, &self.options.document);
    let mut run = GenerationRun::new(stats);
    let mut used_stems = BTreeSet::new();
    let mut documents = vec![];

    for operation in &service.operations {
      if let Some(reason) = self.options.exclusion_reason(&operation.name) {
        run.skip(operation, reason);
        continue;
      }
      let mut document = run.assemble(&assembler, &with_service_auth(operation, service));
      document.file_stem = ensure_unique(&document.file_stem, &used_stems);
      used_stems.insert(document.file_stem.clone());
      documents.push(document);
    }

    let models = if self.options.emit_models {
      run.drain_models(&synthesizer)
    } else {
      vec![]
    };

    let pointers = models
      .iter()
      .filter_map(|model| Some((model.name.clone(), self.source.schema_pointer(model.id)?)))
      .collect();

    ServiceOutput {
      name: service.name.clone(),
      documents,
      models,
      pointers,
    }
  }
}

/// Operations inherit the service requirement unless they carry their own.
fn with_service_auth(operation: &OperationDescriptor, service: &ServiceDescriptor) -> OperationDescriptor {
  let mut operation = operation.clone();
  if !operation.authentication.is_required() {
    operation.authentication = service.authentication.clone();
  }
  operation
}
