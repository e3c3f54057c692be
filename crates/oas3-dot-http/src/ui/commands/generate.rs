use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    document::DocumentOptions,
    host::OpenApiSource,
    metrics::GenerationStats,
    modules::RenderedFile,
    orchestrator::{GenerateOptions, GeneratedOutput, Orchestrator},
  },
  ui::{Colors, GenerateCommand},
  utils::spec::SpecLoader,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub document: DocumentOptions,
  pub emit_models: bool,
  pub max_depth: usize,
  pub verbose: bool,
  pub quiet: bool,
  pub only_operations: Option<HashSet<String>>,
  pub excluded_operations: Option<HashSet<String>>,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      models,
      max_depth,
      host,
      port,
      only,
      exclude,
      verbose,
      quiet,
    } = command;

    if verbose && quiet {
      anyhow::bail!("--verbose and --quiet cannot be used together");
    }
    if max_depth == 0 {
      anyhow::bail!("--max-depth must be at least 1");
    }
    if host.trim().is_empty() {
      anyhow::bail!("--host must not be empty");
    }

    Ok(Self {
      input,
      output,
      document: DocumentOptions { host, port },
      emit_models: models,
      max_depth,
      verbose,
      quiet,
      only_operations: only.map(|ops| ops.into_iter().collect()),
      excluded_operations: exclude.map(|ops| ops.into_iter().collect()),
    })
  }

  async fn load_spec(&self) -> anyhow::Result<oas3::Spec> {
    SpecLoader::open(&self.input).await?.parse()
  }

  /// Model files point back at the input by file name only.
  fn source_label(&self) -> String {
    self
      .input
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  fn create_orchestrator(&self, spec: &oas3::Spec) -> Orchestrator<OpenApiSource> {
    let options = GenerateOptions::builder()
      .document(self.document.clone())
      .max_depth(self.max_depth)
      .emit_models(self.emit_models)
      .maybe_only(self.only_operations.clone())
      .maybe_exclude(self.excluded_operations.clone())
      .source_label(self.source_label())
      .build();
    Orchestrator::new(OpenApiSource::new(spec), options)
  }

  /// Writes every file, recording a warning for each one that fails instead of
  /// stopping at the first failure.
  async fn write_files(&self, files: &[RenderedFile], stats: &mut GenerationStats) -> anyhow::Result<usize> {
    tokio::fs::create_dir_all(&self.output).await?;

    let mut written = 0;
    for file in files {
      let path = self.output.join(&file.path);
      match write_file(&path, &file.contents).await {
        Ok(()) => written += 1,
        Err(error) => stats.record_write_failure(path.display().to_string(), error.to_string()),
      }
    }
    Ok(written)
  }
}

async fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
  if let Some(parent) = path.parent() {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(path, contents).await
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI spec from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    self.info(&"Generating request documents...".with(self.colors.primary()).to_string());
  }

  fn log_writing(&self, count: usize) {
    self.info(
      &format!("Writing {count} files to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Services:", stats.services.to_string());
    self.stat("Documents generated:", stats.documents_generated.to_string());
    self.stat("", format!("{} with a synthesized body", stats.bodies_synthesized));
    let skipped = stats.operations_seen - stats.documents_generated;
    if skipped > 0 {
      self.stat("", format!("{skipped} operations skipped"));
    }
    if self.config.emit_models {
      self.stat("Models generated:", stats.models_generated.to_string());
    }
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    if stats.warnings.is_empty() || self.config.quiet {
      return;
    }

    let mut printed_header = false;
    for warning in &stats.warnings {
      let should_print = warning.is_skipped_item() || self.config.verbose;
      if !should_print {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        format!("{warning}").with(self.colors.primary())
      );
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated request documents".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_documents(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let spec = config.load_spec().await?;

  logger.log_generating();
  let GeneratedOutput { files, mut stats } = config.create_orchestrator(&spec).generate()?;

  logger.log_writing(files.len());
  config.write_files(&files, &mut stats).await?;

  logger.print_statistics(&stats);
  logger.print_warnings(&stats);

  let failures = stats.write_failures();
  if !failures.is_empty() {
    let summary = failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n  ");
    anyhow::bail!("{} of {} files could not be written:\n  {summary}", failures.len(), files.len());
  }

  logger.log_success();
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::colors::Theme;

  const SPEC: &str = r#"{
    "openapi": "3.0.3",
    "info": { "title": "Pets", "version": "1" },
    "paths": {
      "/pets": {
        "get": { "operationId": "listPets", "tags": ["pets"], "responses": { "200": { "description": "ok" } } },
        "post": {
          "operationId": "createPet",
          "tags": ["pets"],
          "requestBody": {
            "content": {
              "application/json": {
                "schema": { "type": "object", "properties": { "name": { "type": "string" } } }
              }
            }
          },
          "responses": { "201": { "description": "created" } }
        }
      }
    }
  }"#;

  fn command(input: PathBuf, output: PathBuf) -> GenerateCommand {
    GenerateCommand {
      input,
      output,
      models: false,
      max_depth: 3,
      host: "localhost".to_string(),
      port: 8080,
      only: None,
      exclude: None,
      verbose: false,
      quiet: true,
    }
  }

  #[test]
  fn test_from_command_converts_flags() {
    let mut cmd = command(PathBuf::from("api.json"), PathBuf::from("out"));
    cmd.only = Some(vec!["a".to_string(), "b".to_string(), "a".to_string()]);
    cmd.port = 3000;

    let config = GenerateConfig::from_command(cmd).unwrap();

    assert_eq!(config.document.port, 3000);
    assert_eq!(config.only_operations.as_ref().map(HashSet::len), Some(2));
    assert!(config.excluded_operations.is_none());
    assert_eq!(config.source_label(), "api.json");
  }

  #[test]
  fn test_from_command_rejects_conflicts() {
    let mut both = command(PathBuf::from("api.json"), PathBuf::from("out"));
    both.verbose = true;
    let err = GenerateConfig::from_command(both).unwrap_err();
    assert!(err.to_string().contains("--verbose and --quiet"));

    let mut zero = command(PathBuf::from("api.json"), PathBuf::from("out"));
    zero.max_depth = 0;
    assert!(GenerateConfig::from_command(zero).is_err());
  }

  #[tokio::test]
  async fn test_generate_writes_documents() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pets.json");
    let output = dir.path().join("out");
    tokio::fs::write(&input, SPEC).await.unwrap();

    let config = GenerateConfig::from_command(command(input, output.clone())).unwrap();
    generate_documents(config, &Colors::new(false, Theme::Dark)).await.unwrap();

    let list = tokio::fs::read_to_string(output.join("Pets/pets_listPets_get.http"))
      .await
      .unwrap();
    assert!(list.starts_with("### listPets\n"));

    let create = tokio::fs::read_to_string(output.join("Pets/pets_createPet_post.http"))
      .await
      .unwrap();
    assert!(create.ends_with("{\n \"name\": \"example\", // Scalar string\n}"));
  }

  #[tokio::test]
  async fn test_write_failures_are_collected() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    tokio::fs::create_dir_all(output.join("Blocked")).await.unwrap();
    // A directory where a file should go makes that single write fail.
    tokio::fs::create_dir_all(output.join("Blocked/taken.http")).await.unwrap();

    let config = GenerateConfig::from_command(command(dir.path().join("unused.json"), output.clone())).unwrap();
    let files = vec![
      RenderedFile {
        path: PathBuf::from("Blocked/taken.http"),
        contents: "### taken".to_string(),
      },
      RenderedFile {
        path: PathBuf::from("Blocked/free.http"),
        contents: "### free".to_string(),
      },
    ];
    let mut stats = GenerationStats::default();

    let written = config.write_files(&files, &mut stats).await.unwrap();

    assert_eq!(written, 1);
    assert_eq!(stats.write_failures().len(), 1);
    assert!(output.join("Blocked/free.http").is_file());
  }
}
