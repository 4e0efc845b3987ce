//! Mapping rules: a source extractor bound to a destination setter.
pub use self::converter::Converter;
pub use self::strategy::{Extractor, Setter};

mod converter;
mod strategy;

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{ConfigurationError, MappingError};
use crate::shape::Field;

/// Where a rule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleOrigin {
    /// Generated for a same-named, same-typed field pair.
    Convention,
    /// Registered through `add_mapping` / `add_mappings`.
    Explicit,
}

/// Type-erased execution of one rule, split in two phases so that every
/// fallible read happens before the first write.
pub(crate) trait Binding<S, D>: Send + Sync {
    fn extract(&self, source: &S) -> Result<Option<Box<dyn Any>>, MappingError>;
    fn apply(&self, destination: &mut D, value: Box<dyn Any>) -> Result<(), MappingError>;
}

/// A single immutable binding from a source-derived value to a destination field.
pub struct MappingRule<S, D> {
    origin: RuleOrigin,
    source: String,
    destination: Option<String>,
    binding: Arc<dyn Binding<S, D>>,
}

impl<S, D> Clone for MappingRule<S, D> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin,
            source: self.source.clone(),
            destination: self.destination.clone(),
            binding: Arc::clone(&self.binding),
        }
    }
}

impl<S: 'static, D: 'static> MappingRule<S, D> {
    pub(crate) fn explicit<V: Clone + 'static>(
        extractor: Extractor<S, V>,
        setter: Setter<D, V>,
    ) -> Self {
        Self {
            origin: RuleOrigin::Explicit,
            source: extractor.describe(),
            destination: setter.destination(),
            binding: Arc::new(ExplicitBinding { extractor, setter }),
        }
    }

    /// Identity rule between two fields already checked to hold the same type.
    pub(crate) fn convention(source: Field, destination: Field) -> Self {
        Self {
            origin: RuleOrigin::Convention,
            source: source.name().to_string(),
            destination: Some(destination.name().to_string()),
            binding: Arc::new(ConventionBinding {
                source,
                destination,
                _types: PhantomData,
            }),
        }
    }
}

impl<S, D> MappingRule<S, D> {
    pub fn origin(&self) -> RuleOrigin {
        self.origin
    }

    /// The source path or converter name.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The destination path, when the setter names one.
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// The top-level destination field this rule writes, if known.
    pub(crate) fn destination_root(&self) -> Option<&str> {
        self.destination().and_then(|d| d.split('.').next())
    }

    pub(crate) fn extract(&self, source: &S) -> Result<Option<Box<dyn Any>>, MappingError> {
        self.binding.extract(source)
    }

    pub(crate) fn apply(
        &self,
        destination: &mut D,
        value: Box<dyn Any>,
    ) -> Result<(), MappingError> {
        self.binding.apply(destination, value)
    }
}

impl<S, D> fmt::Debug for MappingRule<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappingRule")
            .field("origin", &self.origin)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .finish()
    }
}

struct ExplicitBinding<S, D, V> {
    extractor: Extractor<S, V>,
    setter: Setter<D, V>,
}

impl<S: 'static, D: 'static, V: Clone + 'static> Binding<S, D> for ExplicitBinding<S, D, V> {
    fn extract(&self, source: &S) -> Result<Option<Box<dyn Any>>, MappingError> {
        let value = self
            .extractor
            .extract(source)
            .map_err(|e| MappingError::Conversion {
                converter: self.extractor.describe(),
                destination: self.setter.destination().unwrap_or_else(|| "<function>".into()),
                source: e,
            })?;
        Ok(value.map(|v| Box::new(v) as Box<dyn Any>))
    }

    fn apply(&self, destination: &mut D, value: Box<dyn Any>) -> Result<(), MappingError> {
        let value = value.downcast::<V>().map_err(|_| ConfigurationError::TypeMismatch {
            path: self.setter.destination().unwrap_or_else(|| "<function>".into()),
            expected: std::any::type_name::<V>().to_string(),
            found: "<staged value>".to_string(),
        })?;
        self.setter.apply(destination, *value)?;
        Ok(())
    }
}

struct ConventionBinding<S, D> {
    source: Field,
    destination: Field,
    // Erased fields carry no type parameters; pin the pair they were matched for.
    _types: PhantomData<fn(&S, &mut D)>,
}

impl<S: 'static, D: 'static> Binding<S, D> for ConventionBinding<S, D> {
    fn extract(&self, source: &S) -> Result<Option<Box<dyn Any>>, MappingError> {
        Ok(self.source.copy_from(source))
    }

    fn apply(&self, destination: &mut D, value: Box<dyn Any>) -> Result<(), MappingError> {
        let read_only = || ConfigurationError::ReadOnlyField {
            type_name: std::any::type_name::<D>().to_string(),
            field: self.destination.name().to_string(),
        };
        let write = self.destination.write.as_ref().ok_or_else(read_only)?;
        if write(destination, value) {
            Ok(())
        } else {
            Err(ConfigurationError::TypeMismatch {
                path: self.destination.name().to_string(),
                expected: self.destination.value_type_name().to_string(),
                found: self.source.value_type_name().to_string(),
            }
            .into())
        }
    }
}
