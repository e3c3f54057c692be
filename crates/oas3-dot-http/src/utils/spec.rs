use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use oas3::OpenApiV3Spec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext.to_ascii_lowercase().as_str() {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }
}

/// Memory-maps an OpenAPI document and parses it by extension.
pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("Failed to open {}", path.display()))?;

    Ok(Self {
      file,
      format: SpecFormat::from_path(path),
    })
  }

  pub fn parse(&self) -> anyhow::Result<oas3::Spec> {
    match self.format {
      SpecFormat::Json => {
        serde_json::from_slice::<OpenApiV3Spec>(self.file.as_slice()).context("Failed to parse JSON specification")
      }
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(self.file.as_slice()).context("Specification is not valid UTF-8")?;
        oas3::from_yaml(content).context("Failed to parse YAML specification")
      }
    }
  }
}
