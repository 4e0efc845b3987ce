use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::entry::TypeMapEntry;
use crate::config::MapperConfig;
use crate::display::plan::format_plan;
use crate::error::MappingError;
use crate::shape::{short_name, Shape};
use crate::type_map::TypeMap;
use crate::validation::ValidationError;

type PairKey = (TypeId, TypeId);

fn pair_key<S: 'static, D: 'static>() -> PairKey {
    (TypeId::of::<S>(), TypeId::of::<D>())
}

/// Object-safe view of a stored `TypeMap<S, D>`.
trait RegisteredMap: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_pair(&self) -> String;
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
    fn plan(&self) -> String;
}

impl<S: Shape, D: Shape> RegisteredMap for TypeMap<S, D> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_pair(&self) -> String {
        format!("{} -> {}", short_name(S::type_name()), short_name(D::type_name()))
    }

    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        TypeMap::validate(self)
    }

    fn plan(&self) -> String {
        format_plan(self)
    }
}

/// The mapping context. Holds at most one type map per (source, destination)
/// pair and the configuration every new map is created with.
///
/// Registration needs `&mut self`; mapping needs only `&self`, so a registry
/// that is fully configured can be shared by reference across threads.
pub struct Registry {
    config: MapperConfig,
    maps: HashMap<PairKey, Box<dyn RegisteredMap>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(MapperConfig::default())
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            maps: HashMap::new(),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Returns the type map for `S -> D`, creating it with convention rules on
    /// first use. Calling it again extends the same map.
    pub fn create_type_map<S: Shape, D: Shape>(&mut self) -> TypeMapEntry<'_, S, D> {
        let config = &self.config;
        let stored = self.maps.entry(pair_key::<S, D>()).or_insert_with(|| {
            tracing::debug!(
                source = S::type_name(),
                destination = D::type_name(),
                "registering type map"
            );
            Box::new(TypeMap::<S, D>::with_config(config)) as Box<dyn RegisteredMap>
        });
        let map = stored
            .as_any_mut()
            .downcast_mut::<TypeMap<S, D>>()
            .expect("BUG: type map stored under another type pair");
        TypeMapEntry::new(map)
    }

    pub fn type_map<S: Shape, D: Shape>(&self) -> Option<&TypeMap<S, D>> {
        self.maps.get(&pair_key::<S, D>()).map(|stored| {
            stored
                .as_any()
                .downcast_ref::<TypeMap<S, D>>()
                .expect("BUG: type map stored under another type pair")
        })
    }

    /// Maps with the registered type map, or with a convention-only map when
    /// the pair was never registered. The fallback map is not kept.
    pub fn map<S: Shape, D: Shape>(&self, source: &S) -> Result<D, MappingError> {
        match self.type_map::<S, D>() {
            Some(map) => map.map(source),
            None => self.transient::<S, D>().map(source),
        }
    }

    pub fn map_into<'d, S: Shape, D: Shape>(
        &self,
        source: &S,
        destination: &'d mut D,
    ) -> Result<&'d mut D, MappingError> {
        match self.type_map::<S, D>() {
            Some(map) => map.map_into(source, destination),
            None => self.transient::<S, D>().map_into(source, destination),
        }
    }

    fn transient<S: Shape, D: Shape>(&self) -> TypeMap<S, D> {
        tracing::debug!(
            source = S::type_name(),
            destination = D::type_name(),
            "no registered type map, mapping by convention"
        );
        TypeMap::with_config(&self.config)
    }

    /// Validates every registered map and reports all findings together,
    /// ordered by type pair.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors: Vec<ValidationError> = self
            .maps
            .values()
            .filter_map(|map| map.validate().err())
            .flatten()
            .collect();
        if errors.is_empty() {
            return Ok(());
        }
        errors.sort_by(|a, b| a.type_pair.cmp(&b.type_pair));
        for error in &errors {
            tracing::warn!(type_pair = %error.type_pair, field = %error.field, "{}", error.message);
        }
        Err(errors)
    }

    /// The plans of every registered map, ordered by type pair.
    pub fn plans(&self) -> String {
        let mut maps: Vec<_> = self.maps.values().collect();
        maps.sort_by_key(|map| map.type_pair());
        maps.iter()
            .map(|map| map.plan())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<_> = self.maps.values().map(|map| map.type_pair()).collect();
        pairs.sort();
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("type_maps", &pairs)
            .finish()
    }
}
