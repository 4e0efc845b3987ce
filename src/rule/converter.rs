//! Converters: pure functions of the whole source instance.
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::error::ConversionFailure;

type ConvertFn<S, V> = Arc<dyn Fn(&S) -> Result<Option<V>, ConversionFailure> + Send + Sync>;

/// Derives a value, possibly a composite record, from an entire source.
///
/// Unlike a property path a converter may read any number of source fields,
/// which is how a destination sub-record is assembled from several sources
/// in one step.
pub struct Converter<S, V> {
    name: String,
    convert: ConvertFn<S, V>,
}

impl<S, V> Clone for Converter<S, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            convert: Arc::clone(&self.convert),
        }
    }
}

impl<S: 'static, V: 'static> Converter<S, V> {
    /// A converter that always produces a value.
    pub fn new<F>(name: impl Into<String>, convert: F) -> Self
    where
        F: Fn(&S) -> V + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            convert: Arc::new(move |source: &S| Ok(Some(convert(source)))),
        }
    }

    /// A converter that may find nothing to produce; `None` leaves the
    /// destination untouched.
    pub fn optional<F>(name: impl Into<String>, convert: F) -> Self
    where
        F: Fn(&S) -> Option<V> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            convert: Arc::new(move |source: &S| Ok(convert(source))),
        }
    }

    /// A converter that can fail. The error reaches the caller of `map`
    /// unchanged as the `source()` of a `MappingError::Conversion`.
    pub fn fallible<E, F>(name: impl Into<String>, convert: F) -> Self
    where
        E: StdError + Send + Sync + 'static,
        F: Fn(&S) -> Result<V, E> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            convert: Arc::new(move |source: &S| match convert(source) {
                Ok(value) => Ok(Some(value)),
                Err(e) => Err(Arc::new(e) as ConversionFailure),
            }),
        }
    }

    pub fn convert(&self, source: &S) -> Result<Option<V>, ConversionFailure> {
        (self.convert)(source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<S, V> fmt::Debug for Converter<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Converter").field(&self.name).finish()
    }
}
