//! Output module tree.
//!
//! Every generated artifact is a [`Module`] owned by a [`ModuleGraph`] arena.
//! A module is a file (when it has imports or line declarations) and, when it
//! declares nested modules, also the directory holding them. Cross-references
//! between modules are [`Import`]s that resolve to cursor-relative paths when
//! the tree is rendered.

use std::{fmt, path::PathBuf, sync::LazyLock};

use itertools::Itertools;

use super::cursor::{PARENT_SEGMENT, PathCursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(usize);

impl ModuleId {
  /// Sentinel for analysis that needs a module but never emits one.
  pub const NONE: Self = Self(usize::MAX);

  #[must_use]
  pub const fn is_none(self) -> bool {
    self.0 == usize::MAX
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleGraphError {
  #[error("cannot {action} the detached sentinel module")]
  Detached { action: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBinder {
  Default(String),
  Namespace(String),
  Named(Vec<String>),
}

impl fmt::Display for ImportBinder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Default(name) => f.write_str(name),
      Self::Namespace(name) => write!(f, "* as {name}"),
      Self::Named(names) => write!(f, "{{ {} }}", names.iter().join(", ")),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSource {
  Module(ModuleId),
  /// Used verbatim.
  Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
  pub binder: ImportBinder,
  pub from: ImportSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
  Line(String),
  Block(Vec<String>),
  Module(ModuleId),
}

#[derive(Debug, Clone)]
pub struct Module {
  pub name: String,
  pub cursor: PathCursor,
  /// Grouping tag only; never dereferenced.
  pub namespace: Option<String>,
  pub extension: Option<String>,
  pub imports: Vec<Import>,
  pub declarations: Vec<Declaration>,
}

impl Module {
  fn new(name: &str, cursor: PathCursor, namespace: Option<&str>, extension: Option<&str>) -> Self {
    Self {
      name: name.to_string(),
      cursor,
      namespace: namespace.map(String::from),
      extension: extension.map(String::from),
      imports: vec![],
      declarations: vec![],
    }
  }

  fn has_own_content(&self) -> bool {
    !self.imports.is_empty()
      || self
        .declarations
        .iter()
        .any(|decl| !matches!(decl, Declaration::Module(_)))
  }

  fn file_name(&self) -> String {
    match &self.extension {
      Some(ext) => format!("{}.{ext}", self.name),
      None => self.name.clone(),
    }
  }
}

static NO_MODULE: LazyLock<Module> = LazyLock::new(|| Module::new("", PathCursor::root(), None, None));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
  pub path: PathBuf,
  pub contents: String,
}

#[derive(Debug, Clone)]
pub struct ModuleGraph {
  modules: Vec<Module>,
}

impl Default for ModuleGraph {
  fn default() -> Self {
    Self::new()
  }
}

impl ModuleGraph {
  #[must_use]
  pub fn new() -> Self {
    Self {
      modules: vec![Module::new("", PathCursor::root(), None, None)],
    }
  }

  #[must_use]
  pub const fn root(&self) -> ModuleId {
    ModuleId(0)
  }

  /// The sentinel resolves to an empty module rooted at the top of the tree.
  ///
  /// # Panics
  ///
  /// Panics when `id` was minted by a different graph.
  #[must_use]
  pub fn module(&self, id: ModuleId) -> &Module {
    if id.is_none() {
      return &NO_MODULE;
    }
    self
      .modules
      .get(id.0)
      .unwrap_or_else(|| panic!("UNREACHABLE: module {} does not belong to this graph", id.0))
  }

  fn module_mut(&mut self, id: ModuleId, action: &'static str) -> Result<&mut Module, ModuleGraphError> {
    if id.is_none() {
      return Err(ModuleGraphError::Detached { action });
    }
    Ok(
      self
        .modules
        .get_mut(id.0)
        .unwrap_or_else(|| panic!("UNREACHABLE: module {} does not belong to this graph", id.0)),
    )
  }

  /// Creates a directory-like module and appends it to `parent`'s declarations.
  pub fn create_module(
    &mut self,
    name: &str,
    parent: ModuleId,
    namespace: Option<&str>,
  ) -> Result<ModuleId, ModuleGraphError> {
    self.attach(name, parent, namespace, None)
  }

  /// Creates a module rendered as `<name>.<extension>`.
  pub fn create_file_module(
    &mut self,
    name: &str,
    extension: &str,
    parent: ModuleId,
  ) -> Result<ModuleId, ModuleGraphError> {
    let namespace = self.module(parent).namespace.clone();
    self.attach(name, parent, namespace.as_deref(), Some(extension))
  }

  fn attach(
    &mut self,
    name: &str,
    parent: ModuleId,
    namespace: Option<&str>,
    extension: Option<&str>,
  ) -> Result<ModuleId, ModuleGraphError> {
    let id = ModuleId(self.modules.len());
    let parent_module = self.module_mut(parent, "attach a module to")?;
    let cursor = parent_module.cursor.enter([name]);
    parent_module.declarations.push(Declaration::Module(id));
    self.modules.push(Module::new(name, cursor, namespace, extension));
    Ok(id)
  }

  pub fn declare(&mut self, id: ModuleId, declaration: Declaration) -> Result<(), ModuleGraphError> {
    self.module_mut(id, "declare into")?.declarations.push(declaration);
    Ok(())
  }

  pub fn add_import(&mut self, id: ModuleId, import: Import) -> Result<(), ModuleGraphError> {
    if let ImportSource::Module(target) = import.from
      && target.is_none()
    {
      return Err(ModuleGraphError::Detached { action: "import from" });
    }
    self.module_mut(id, "import into")?.imports.push(import);
    Ok(())
  }

  /// Segments leading from the directory that holds `from` to `to`.
  pub fn relative_path(&self, from: ModuleId, to: ModuleId) -> Result<Vec<String>, ModuleGraphError> {
    if from.is_none() || to.is_none() {
      return Err(ModuleGraphError::Detached {
        action: "resolve a path through",
      });
    }
    let source = &self.module(from).cursor;
    let directory = source.parent().unwrap_or_else(PathCursor::root);
    Ok(directory.relative_path(&self.module(to).cursor, PARENT_SEGMENT))
  }

  /// A `./`- or `../`-prefixed specifier for importing `to` from `from`.
  pub fn import_specifier(&self, from: ModuleId, to: ModuleId) -> Result<String, ModuleGraphError> {
    let mut segments = self.relative_path(from, to)?;
    let target = self.module(to);
    if let Some(last) = segments.last_mut() {
      *last = target.file_name();
    }
    let joined = segments.join("/");
    if joined.starts_with(PARENT_SEGMENT) {
      Ok(joined)
    } else {
      Ok(format!("./{joined}"))
    }
  }

  pub fn modules_in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = ModuleId> + 'a {
    self
      .modules
      .iter()
      .enumerate()
      .filter(move |(_, module)| module.namespace.as_deref() == Some(namespace))
      .map(|(index, _)| ModuleId(index))
  }

  /// Renders every module that has content of its own, depth-first in
  /// declaration order. Paths are relative to the root module.
  pub fn render(&self) -> Result<Vec<RenderedFile>, ModuleGraphError> {
    let mut files = vec![];
    self.render_into(self.root(), &mut files)?;
    Ok(files)
  }

  fn render_into(&self, id: ModuleId, files: &mut Vec<RenderedFile>) -> Result<(), ModuleGraphError> {
    let module = self.module(id);

    if id != self.root() && module.has_own_content() {
      files.push(RenderedFile {
        path: self.file_path(module),
        contents: self.render_contents(id)?,
      });
    }

    for declaration in &module.declarations {
      if let Declaration::Module(child) = declaration {
        self.render_into(*child, files)?;
      }
    }
    Ok(())
  }

  fn file_path(&self, module: &Module) -> PathBuf {
    let mut path: PathBuf = module.cursor.parent().unwrap_or_default().path().iter().collect();
    path.push(module.file_name());
    path
  }

  fn render_contents(&self, id: ModuleId) -> Result<String, ModuleGraphError> {
    let module = self.module(id);
    let mut lines = vec![];

    for import in &module.imports {
      let source = match &import.from {
        ImportSource::Module(target) => self.import_specifier(id, *target)?,
        ImportSource::Literal(text) => text.clone(),
      };
      lines.push(format!("// import {} from \"{source}\"", import.binder));
    }

    for declaration in &module.declarations {
      match declaration {
        Declaration::Line(line) => lines.push(line.clone()),
        Declaration::Block(block) => lines.extend(block.iter().cloned()),
        Declaration::Module(_) => {}
      }
    }

    Ok(lines.join("\n"))
  }
}
