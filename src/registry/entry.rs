use std::ops::Deref;

use crate::error::ConfigurationError;
use crate::rule::{Extractor, MappingRule, Setter};
use crate::shape::Shape;
use crate::type_map::{MappingGroup, TypeMap};

/// An owned handle to a type map stored in a `Registry`.
///
/// Offers the same by-value fluent registration as `TypeMap` so chains read
/// the same whether the map is standalone or registered; derefs to the map
/// for everything else.
pub struct TypeMapEntry<'r, S, D> {
    map: &'r mut TypeMap<S, D>,
}

impl<'r, S: Shape, D: Shape> TypeMapEntry<'r, S, D> {
    pub(crate) fn new(map: &'r mut TypeMap<S, D>) -> Self {
        Self { map }
    }

    pub fn add_mapping<V: Clone + 'static>(
        self,
        extractor: impl Into<Extractor<S, V>>,
        setter: impl Into<Setter<D, V>>,
    ) -> Self {
        self.map
            .push_rule(MappingRule::explicit(extractor.into(), setter.into()));
        self
    }

    pub fn add_path_mapping<V: Clone + 'static>(
        self,
        source: &str,
        destination: &str,
    ) -> Result<Self, ConfigurationError> {
        self.map.push_path_mapping::<V>(source, destination)?;
        Ok(self)
    }

    pub fn add_mappings<F>(self, group: F) -> Self
    where
        F: FnOnce(&mut MappingGroup<S, D>),
    {
        self.map.push_group(group);
        self
    }

    pub fn skip(self, field: impl Into<String>) -> Self {
        self.map.push_skip(field.into());
        self
    }

    pub fn with_constructor<F>(self, constructor: F) -> Self
    where
        F: Fn() -> D + Send + Sync + 'static,
    {
        self.map.set_constructor(constructor);
        self
    }

    /// Releases the handle, keeping the borrow of the stored map.
    pub fn into_inner(self) -> &'r mut TypeMap<S, D> {
        self.map
    }
}

impl<S, D> Deref for TypeMapEntry<'_, S, D> {
    type Target = TypeMap<S, D>;

    fn deref(&self) -> &Self::Target {
        self.map
    }
}
