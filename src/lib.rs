//! Declarative object-to-object mapping.
//!
//! Records describe themselves through [`Shape`]; a [`TypeMap`] holds the
//! rules that copy one record type into another, and a [`Registry`] keeps one
//! type map per (source, destination) pair.
//!
//! ```ignore
//! let mut registry = Registry::new();
//! registry
//!     .create_type_map::<Person, PersonDto>()
//!     .add_path_mapping::<String>("name", "first_name")?
//!     .add_path_mapping::<String>("address.city", "city")?;
//!
//! // `age` flows by convention; an absent address leaves `city` unset.
//! let dto: PersonDto = registry.map(&person)?;
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod path;
pub mod registry;
pub mod rule;
pub mod shape;
pub mod type_map;
pub mod validation;

#[cfg(test)]
mod testing;

pub use config::{MapperConfig, NameMatching};
pub use display::plan::format_plan;
pub use error::{ConfigurationError, ConversionFailure, MappingError};
pub use path::{DestinationPath, NestedTarget, PropertyPath};
pub use registry::{Registry, TypeMapEntry};
pub use rule::{Converter, Extractor, MappingRule, RuleOrigin, Setter};
pub use shape::{Field, Shape};
pub use type_map::{MappingGroup, TypeMap};
pub use validation::{ValidationError, ValidationErrorType, Validator};
