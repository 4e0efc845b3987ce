//! Writable paths into a destination, creating nested records lazily.
use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::{join_segments, split_path, Segments};
use crate::error::ConfigurationError;
use crate::shape::field::{self, open_slot, SlotFn};
use crate::shape::{short_name, Shape};

type WriteFn<D, V> = Arc<dyn Fn(&mut D, V) -> Result<(), ConfigurationError> + Send + Sync>;
type OpenFn<D, U> =
    Arc<dyn for<'a> Fn(&'a mut D) -> Result<&'a mut U, ConfigurationError> + Send + Sync>;

fn opener<D, U, F>(f: F) -> OpenFn<D, U>
where
    F: for<'a> Fn(&'a mut D) -> Result<&'a mut U, ConfigurationError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A named location in a destination `D` that accepts a value of type `V`.
pub struct DestinationPath<D, V> {
    segments: Segments,
    write: WriteFn<D, V>,
}

impl<D, V> Clone for DestinationPath<D, V> {
    fn clone(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            write: Arc::clone(&self.write),
        }
    }
}

impl<D: 'static, V: 'static> DestinationPath<D, V> {
    /// A top-level destination field.
    pub fn field<F>(name: &'static str, set: F) -> Self
    where
        F: Fn(&mut D, V) + Send + Sync + 'static,
    {
        let mut segments = SmallVec::new();
        segments.push(name);
        Self {
            segments,
            write: Arc::new(move |destination: &mut D, value: V| {
                set(destination, value);
                Ok(())
            }),
        }
    }

    pub(crate) fn write(&self, destination: &mut D, value: V) -> Result<(), ConfigurationError> {
        (self.write)(destination, value)
    }

    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    pub fn name(&self) -> String {
        join_segments(&self.segments)
    }
}

impl<D: Shape, V: 'static> DestinationPath<D, V> {
    /// Builds a writable path from a dotted string using the field tables of
    /// `D` and its nested records. Every non-final segment must be a nested
    /// record field and the final one must be writable and hold a `V`.
    pub fn parse(path: &str) -> Result<Self, ConfigurationError> {
        let names = split_path(path)?;
        let mut fields = D::fields();
        let mut owner = D::type_name();
        let mut segments: Segments = SmallVec::new();
        let mut slots: Vec<SlotFn> = Vec::with_capacity(names.len() - 1);

        let (last, parents) = names
            .split_last()
            .ok_or_else(|| ConfigurationError::InvalidPath(path.to_string()))?;

        for name in parents {
            let field = field::find(&fields, name).ok_or_else(|| ConfigurationError::UnknownField {
                type_name: short_name(owner).to_string(),
                field: name.to_string(),
                path: path.to_string(),
            })?;
            let nested = field.nested.clone().ok_or_else(|| ConfigurationError::NotNested {
                type_name: short_name(owner).to_string(),
                field: name.to_string(),
                path: path.to_string(),
            })?;
            segments.push(field.name());
            slots.push(nested.slot);
            fields = (nested.fields)();
            owner = nested.type_name;
        }

        let leaf = field::find(&fields, last).ok_or_else(|| ConfigurationError::UnknownField {
            type_name: short_name(owner).to_string(),
            field: last.to_string(),
            path: path.to_string(),
        })?;
        if leaf.value_type() != TypeId::of::<V>() {
            return Err(ConfigurationError::TypeMismatch {
                path: path.to_string(),
                expected: std::any::type_name::<V>().to_string(),
                found: leaf.value_type_name().to_string(),
            });
        }
        let assign = leaf.write.clone().ok_or_else(|| ConfigurationError::ReadOnlyField {
            type_name: short_name(owner).to_string(),
            field: last.to_string(),
        })?;
        segments.push(leaf.name());

        let mismatch = ConfigurationError::TypeMismatch {
            path: path.to_string(),
            expected: std::any::type_name::<V>().to_string(),
            found: leaf.value_type_name().to_string(),
        };
        Ok(Self {
            segments,
            write: Arc::new(move |destination: &mut D, value: V| {
                let mut current: &mut dyn Any = destination;
                for slot in &slots {
                    current = match slot(current)? {
                        Some(next) => next,
                        None => return Err(mismatch.clone()),
                    };
                }
                if assign(current, Box::new(value)) {
                    Ok(())
                } else {
                    Err(mismatch.clone())
                }
            }),
        })
    }
}

impl<D, V> fmt::Debug for DestinationPath<D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DestinationPath")
            .field(&join_segments(&self.segments))
            .finish()
    }
}

/// A nested record inside a destination, reached through one or more
/// `Option` slots that are filled on first write.
///
/// ```ignore
/// let email = NestedTarget::new("contact", |d: &mut PersonDto| &mut d.contact)
///     .field("email", |c: &mut Contact, v: String| c.email = Some(v));
/// ```
pub struct NestedTarget<D, U> {
    segments: Segments,
    open: OpenFn<D, U>,
}

impl<D: 'static, U: Shape> NestedTarget<D, U> {
    pub fn new<F>(name: &'static str, slot: F) -> Self
    where
        F: for<'a> Fn(&'a mut D) -> &'a mut Option<U> + Send + Sync + 'static,
    {
        let mut segments = SmallVec::new();
        segments.push(name);
        Self {
            segments,
            open: opener(move |destination: &mut D| open_slot(slot(destination))),
        }
    }

    /// Descends into a record nested inside `U`.
    pub fn nested<W, F>(self, name: &'static str, slot: F) -> NestedTarget<D, W>
    where
        W: Shape,
        F: for<'a> Fn(&'a mut U) -> &'a mut Option<W> + Send + Sync + 'static,
    {
        let mut segments = self.segments;
        segments.push(name);
        let parent = self.open;
        NestedTarget {
            segments,
            open: opener(move |destination: &mut D| {
                parent(destination).and_then(|record| open_slot(slot(record)))
            }),
        }
    }

    /// Finishes the path with a field of the nested record.
    pub fn field<V, F>(self, name: &'static str, set: F) -> DestinationPath<D, V>
    where
        V: 'static,
        F: Fn(&mut U, V) + Send + Sync + 'static,
    {
        let mut segments = self.segments;
        segments.push(name);
        let open = self.open;
        DestinationPath {
            segments,
            write: Arc::new(move |destination: &mut D, value: V| {
                set(open(destination)?, value);
                Ok(())
            }),
        }
    }
}
