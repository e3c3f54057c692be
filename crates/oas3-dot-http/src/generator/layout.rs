//! Places documents and models into the output [`ModuleGraph`].
//!
//! ```text
//! <Service>/
//!   <group>_<operation>_<verb>.http
//!   models/
//!     <Model>.jsonc
//! ```

use std::collections::HashMap;

use super::{
  document::{DOCUMENT_EXTENSION, RequestDocument},
  modules::{Declaration, Import, ImportBinder, ImportSource, ModuleGraph, ModuleGraphError, ModuleId, RenderedFile},
  run::ModelArtifact,
};

pub const MODELS_DIRECTORY: &str = "models";
pub const MODEL_EXTENSION: &str = "jsonc";

/// Everything generated for one service.
#[derive(Debug, Clone, Default)]
pub struct ServiceOutput {
  pub name: String,
  pub documents: Vec<RequestDocument>,
  pub models: Vec<ModelArtifact>,
  /// Source pointers keyed by model name, e.g. `#/components/schemas/Pet`.
  pub pointers: HashMap<String, String>,
}

#[derive(Debug)]
pub struct OutputLayout {
  graph: ModuleGraph,
  source_label: String,
}

impl OutputLayout {
  /// `source_label` prefixes literal schema imports, usually the input file name.
  pub fn new(source_label: impl Into<String>) -> Self {
    Self {
      graph: ModuleGraph::new(),
      source_label: source_label.into(),
    }
  }

  pub fn add_service(&mut self, service: &ServiceOutput) -> Result<ModuleId, ModuleGraphError> {
    let root = self.graph.root();
    let module = self.graph.create_module(&service.name, root, Some(&service.name))?;

    for document in &service.documents {
      let file = self.graph.create_file_module(&document.file_stem, DOCUMENT_EXTENSION, module)?;
      self.graph.declare(file, Declaration::Line(document.contents.clone()))?;
    }

    if !service.models.is_empty() {
      self.add_models(module, service)?;
    }
    Ok(module)
  }

  fn add_models(&mut self, service_module: ModuleId, service: &ServiceOutput) -> Result<(), ModuleGraphError> {
    let directory = self
      .graph
      .create_module(MODELS_DIRECTORY, service_module, Some(&service.name))?;

    let mut modules = HashMap::new();
    for model in &service.models {
      let id = self.graph.create_file_module(&model.name, MODEL_EXTENSION, directory)?;
      modules.insert(model.name.as_str(), id);
    }

    for model in &service.models {
      let Some(&module) = modules.get(model.name.as_str()) else {
        continue;
      };

      for dependency in &model.dependencies {
        if let Some(&target) = modules.get(dependency.as_str())
          && target != module
        {
          self.graph.add_import(
            module,
            Import {
              binder: ImportBinder::Default(dependency.clone()),
              from: ImportSource::Module(target),
            },
          )?;
        }
      }

      if let Some(pointer) = service.pointers.get(&model.name) {
        self.graph.add_import(
          module,
          Import {
            binder: ImportBinder::Named(vec![model.name.clone()]),
            from: ImportSource::Literal(format!("{}{pointer}", self.source_label)),
          },
        )?;
      }

      self.graph.declare(module, Declaration::Block(model.lines.clone()))?;
    }
    Ok(())
  }

  pub fn render(&self) -> Result<Vec<RenderedFile>, ModuleGraphError> {
    self.graph.render()
  }
}
