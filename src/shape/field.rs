//! Type-erased field accessors declared by a record's `Shape` implementation.
//!
//! A `Field` is built from ordinary typed closures. Erasure through `Any` only
//! happens so that fields of different value types can live in one table; every
//! downcast is guarded by the `TypeId` recorded at construction.
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::Shape;
use crate::error::ConfigurationError;

pub(crate) type ReadFn = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;
pub(crate) type WriteFn = Arc<dyn Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync>;
pub(crate) type SlotFn = Arc<
    dyn for<'a> Fn(&'a mut dyn Any) -> Result<Option<&'a mut dyn Any>, ConfigurationError>
        + Send
        + Sync,
>;
type CopyFn = fn(&dyn Any) -> Option<Box<dyn Any>>;

// Pin the higher-ranked signatures so closure lifetimes are inferred from the bound.
fn reader<F>(f: F) -> ReadFn
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn slotter<F>(f: F) -> SlotFn
where
    F: for<'a> Fn(&'a mut dyn Any) -> Result<Option<&'a mut dyn Any>, ConfigurationError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Returns the value in `slot`, instantiating it through `U::construct()` first if it is empty.
pub(crate) fn open_slot<U: Shape>(slot: &mut Option<U>) -> Result<&mut U, ConfigurationError> {
    if slot.is_none() {
        let fresh = U::construct()
            .ok_or_else(|| ConfigurationError::NotInstantiable(U::type_name().to_string()))?;
        *slot = Some(fresh);
    }
    slot.as_mut()
        .ok_or_else(|| ConfigurationError::NotInstantiable(U::type_name().to_string()))
}

/// Access to a field holding an optional sub-record.
#[derive(Clone)]
pub(crate) struct Nested {
    pub(crate) fields: fn() -> Vec<Field>,
    pub(crate) type_name: &'static str,
    pub(crate) instantiable: fn() -> bool,
    /// Get-or-create access to the sub-record.
    pub(crate) slot: SlotFn,
}

/// A single named field of a record.
#[derive(Clone)]
pub struct Field {
    name: &'static str,
    value_type: TypeId,
    value_type_name: &'static str,
    pub(crate) read: ReadFn,
    copy: CopyFn,
    pub(crate) write: Option<WriteFn>,
    pub(crate) nested: Option<Nested>,
}

impl Field {
    /// A readable and writable field of type `V`.
    ///
    /// `get` returns `None` when the field is absent (e.g. an empty `Option`).
    pub fn new<T, V, G, S>(name: &'static str, get: G, set: S) -> Self
    where
        T: 'static,
        V: Clone + 'static,
        G: for<'a> Fn(&'a T) -> Option<&'a V> + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let write: WriteFn = Arc::new(move |target: &mut dyn Any, value: Box<dyn Any>| {
            match (target.downcast_mut::<T>(), value.downcast::<V>()) {
                (Some(owner), Ok(value)) => {
                    set(owner, *value);
                    true
                }
                _ => false,
            }
        });
        Self {
            write: Some(write),
            ..Self::read_only(name, get)
        }
    }

    /// A field that can be read but is never written by the engine.
    pub fn read_only<T, V, G>(name: &'static str, get: G) -> Self
    where
        T: 'static,
        V: Clone + 'static,
        G: for<'a> Fn(&'a T) -> Option<&'a V> + Send + Sync + 'static,
    {
        Self {
            name,
            value_type: TypeId::of::<V>(),
            value_type_name: std::any::type_name::<V>(),
            read: reader(move |target| {
                let owner = target.downcast_ref::<T>()?;
                get(owner).map(|value| value as &dyn Any)
            }),
            copy: |value| {
                value
                    .downcast_ref::<V>()
                    .map(|value| Box::new(value.clone()) as Box<dyn Any>)
            },
            write: None,
            nested: None,
        }
    }

    /// A field holding an optional sub-record `U`.
    ///
    /// Writes through a path that traverses this field create the sub-record
    /// with `U::construct()` the first time and reuse it afterwards.
    pub fn nested<T, U, G, P>(name: &'static str, get: G, slot: P) -> Self
    where
        T: 'static,
        U: Shape + Clone,
        G: for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
        P: for<'a> Fn(&'a mut T) -> &'a mut Option<U> + Send + Sync + 'static,
    {
        let slot = Arc::new(slot);
        let assign = Arc::clone(&slot);
        let base = Self::new(name, get, move |owner: &mut T, value: U| {
            *assign(owner) = Some(value);
        });
        Self {
            nested: Some(Nested {
                fields: U::fields,
                type_name: U::type_name(),
                instantiable: || U::construct().is_some(),
                slot: slotter(move |target| {
                    let Some(owner) = target.downcast_mut::<T>() else {
                        return Ok(None);
                    };
                    let value = open_slot(slot(owner))?;
                    Ok(Some(value as &mut dyn Any))
                }),
            }),
            ..base
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    pub fn is_writable(&self) -> bool {
        self.write.is_some()
    }

    pub fn is_nested(&self) -> bool {
        self.nested.is_some()
    }

    /// Reads and clones the field's value out of `owner`.
    pub(crate) fn copy_from(&self, owner: &dyn Any) -> Option<Box<dyn Any>> {
        (self.read)(owner).and_then(self.copy)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("value_type", &self.value_type_name)
            .field("writable", &self.is_writable())
            .field("nested", &self.nested.as_ref().map(|n| n.type_name))
            .finish()
    }
}

pub(crate) fn find<'f>(fields: &'f [Field], name: &str) -> Option<&'f Field> {
    fields.iter().find(|field| field.name == name)
}

/// The first nested record on the way to the leaf of `path` that a write
/// would have to create but cannot.
///
/// `owner` is the instance about to be written; records it already holds are
/// reused and need no constructor. With `None` every slot counts as empty.
/// Segments missing from the field tables end the walk with `None`.
pub(crate) fn uncreatable_record(
    mut fields: Vec<Field>,
    mut owner: Option<&dyn Any>,
    path: &str,
) -> Option<&'static str> {
    let segments: Vec<&str> = path.split('.').collect();
    let (_, parents) = segments.split_last()?;
    for name in parents {
        let field = find(&fields, name)?.clone();
        let nested = field.nested.as_ref()?;
        owner = owner.and_then(|record| (field.read)(record));
        if owner.is_none() && !(nested.instantiable)() {
            return Some(nested.type_name);
        }
        fields = (nested.fields)();
    }
    None
}
