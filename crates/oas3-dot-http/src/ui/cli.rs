use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-dot-http")]
#[command(
  author,
  version,
  about = "Generate .http request documents from an OpenAPI specification",
  styles = Colors::clap_styles()
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI specification
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Write one .http document per operation
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to the OpenAPI specification (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory the per-service document folders are written to
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Also write a models/<Name>.jsonc file for every record reached from a body
  #[arg(long, default_value_t = false)]
  pub models: bool,

  /// How many records deep a synthesized body nests before it is cut off
  #[arg(long, value_name = "N", default_value_t = 3)]
  pub max_depth: usize,

  /// Value of the @host variable
  #[arg(long, default_value = "localhost")]
  pub host: String,

  /// Value of the @port variable
  #[arg(long, default_value_t = 8080)]
  pub port: u16,

  /// Generate only these operations (comma-separated operation names)
  #[arg(long, value_name = "NAMES", value_delimiter = ',')]
  pub only: Option<Vec<String>>,

  /// Skip these operations (comma-separated operation names)
  #[arg(long, value_name = "NAMES", value_delimiter = ',')]
  pub exclude: Option<Vec<String>>,

  /// Print every warning, not only skipped operations and failed writes
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every operation with the document it generates
  Operations {
    /// Path to the OpenAPI specification (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
