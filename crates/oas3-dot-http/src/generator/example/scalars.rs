use std::str::FromStr;

use strum::EnumString;

/// Sample for scalar kinds missing from the table.
pub(crate) const FALLBACK_NUMBER_SAMPLE: &str = "123";

/// Scalar kinds that have a fixed representative sample, keyed by scalar name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub(crate) enum ScalarSample {
  #[strum(serialize = "string")]
  String,
  #[strum(serialize = "boolean")]
  Boolean,
  #[strum(serialize = "number")]
  Number,
  #[strum(
    serialize = "integer",
    serialize = "int8",
    serialize = "int16",
    serialize = "int32",
    serialize = "int64",
    serialize = "uint8",
    serialize = "uint16",
    serialize = "uint32",
    serialize = "uint64"
  )]
  Integer,
  #[strum(serialize = "float32", serialize = "float")]
  Float32,
  #[strum(serialize = "float64", serialize = "double")]
  Float64,
  #[strum(serialize = "decimal")]
  Decimal,
  #[strum(serialize = "safeint")]
  SafeInt,
  #[strum(serialize = "bytes")]
  Bytes,
  #[strum(serialize = "date", serialize = "plainDate")]
  Date,
  #[strum(serialize = "datetime", serialize = "utcDateTime", serialize = "offsetDateTime")]
  DateTime,
  #[strum(serialize = "duration")]
  Duration,
  #[strum(serialize = "guid", serialize = "uuid")]
  Guid,
}

impl ScalarSample {
  /// The sample as JSON text.
  pub(crate) const fn json(self) -> &'static str {
    match self {
      Self::String => "\"example\"",
      Self::Boolean => "true",
      Self::Number => "123",
      Self::Integer => "42",
      Self::Float32 => "3.14",
      Self::Float64 => "3.14159",
      Self::Decimal => "99.99",
      Self::SafeInt => "9007199254740991",
      Self::Bytes => "\"aGVsbG8=\"",
      Self::Date => "\"2024-01-01\"",
      Self::DateTime => "\"2024-01-01T12:00:00Z\"",
      Self::Duration => "\"P1DT2H3M4S\"",
      Self::Guid => "\"123e4567-e89b-12d3-a456-426614174000\"",
    }
  }

  pub(crate) fn lookup(name: &str) -> Option<Self> {
    Self::from_str(name).ok()
  }
}
