use super::{
  descriptor::OperationDescriptor,
  document::{DocumentAssembler, RequestDocument},
  example::{ExampleSynthesizer, SynthesisContext},
  metrics::GenerationStats,
  queue::VisitationQueue,
  synthetics::SyntheticRegistry,
  types::TypeId,
};

/// A record drained from the run's queue, ready to be written as a model file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
  pub id: TypeId,
  pub name: String,
  pub lines: Vec<String>,
  /// Names of the records this model nests directly.
  pub dependencies: Vec<String>,
}

/// Run-scoped generation state.
///
/// The queue and registry live exactly as long as one run: every document of a
/// service is assembled through the same run, models are drained from it, and
/// the run is dropped afterwards.
pub struct GenerationRun<'s> {
  queue: VisitationQueue<TypeId>,
  registry: SyntheticRegistry,
  stats: &'s mut GenerationStats,
}

impl<'s> GenerationRun<'s> {
  pub fn new(stats: &'s mut GenerationStats) -> Self {
    Self {
      queue: VisitationQueue::new(),
      registry: SyntheticRegistry::new(),
      stats,
    }
  }

  pub fn assemble(&mut self, assembler: &DocumentAssembler<'_>, operation: &OperationDescriptor) -> RequestDocument {
    let mut ctx = SynthesisContext::new(&mut self.registry, &mut self.queue);
    let document = assembler.assemble(operation, &mut ctx);
    let issues = ctx.take_issues();

    self.stats.record_document(&document, &operation.path);
    self.stats.record_issues(&operation.name, issues);
    document
  }

  pub fn skip(&mut self, operation: &OperationDescriptor, reason: &str) {
    self.stats.record_skipped(&operation.name, reason);
  }

  /// Drains the queue, synthesizing every record once.
  ///
  /// Synthesizing a model may discover further records; they join the queue
  /// and are drained in the same loop.
  pub fn drain_models(&mut self, synthesizer: &ExampleSynthesizer<'_>) -> Vec<ModelArtifact> {
    let graph = synthesizer.graph();
    let mut models = vec![];

    while let Some(id) = self.queue.dequeue() {
      let name = self.registry.name_for(graph, id, "Model");
      let mut ctx = SynthesisContext::new(&mut self.registry, &mut self.queue);
      let lines = synthesizer.synthesize(id, &name, &mut ctx);
      let issues = ctx.take_issues();
      self.stats.record_issues(&name, issues);

      let dependencies = graph
        .nested_records(id)
        .into_iter()
        .map(|nested| {
          let nested_name = self.registry.name_for(graph, nested, &format!("{name}Item"));
          self.queue.enqueue(nested);
          nested_name
        })
        .collect();

      models.push(ModelArtifact {
        id,
        name,
        lines,
        dependencies,
      });
    }

    self.stats.record_models(models.len());
    models
  }
}
