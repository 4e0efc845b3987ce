//! Error types shared by every layer of the mapping engine.
//!
//! Absence of a value is never an error. Only structural misconfiguration
//! (`ConfigurationError`) and failing user converters (`MappingError::Conversion`)
//! are surfaced to the caller.
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// The original error returned by a failing converter, kept intact for `source()`.
pub type ConversionFailure = Arc<dyn StdError + Send + Sync>;

/// Structural problems detected while building paths, registering rules,
/// instantiating destinations or loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Type '{type_name}' has no field '{field}' (path '{path}')")]
    UnknownField { type_name: String, field: String, path: String },
    #[error("Field '{field}' of '{type_name}' is not a nested record (path '{path}')")]
    NotNested { type_name: String, field: String, path: String },
    #[error("Path '{path}' resolves to '{found}', expected '{expected}'")]
    TypeMismatch { path: String, expected: String, found: String },
    #[error("Field '{field}' of '{type_name}' is read-only")]
    ReadOnlyField { type_name: String, field: String },
    #[error("Invalid property path '{0}'")]
    InvalidPath(String),
    #[error("Type '{0}' has no no-argument constructor; pass an instance or a constructor")]
    NotInstantiable(String),
    #[error("Invalid mapper configuration: {0}")]
    InvalidConfig(String),
}

/// Failure of a single `map` invocation.
#[derive(Error, Debug, Clone)]
pub enum MappingError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Converter '{converter}' failed while mapping '{destination}': {source}")]
    Conversion {
        converter: String,
        destination: String,
        source: ConversionFailure,
    },
}

impl From<std::io::Error> for ConfigurationError {
    fn from(err: std::io::Error) -> Self {
        ConfigurationError::InvalidConfig(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        ConfigurationError::InvalidConfig(err.to_string())
    }
}
