//! The ordered rule set for one (source, destination) pair, and its execution.
use rayon::prelude::*;
use std::any::Any;
use std::sync::Arc;

use super::group::MappingGroup;
use crate::config::{MapperConfig, NameMatching};
use crate::error::{ConfigurationError, MappingError};
use crate::path::{DestinationPath, PropertyPath};
use crate::rule::{Extractor, MappingRule, Setter};
use crate::shape::field;
use crate::shape::{Field, Shape};
use crate::validation::{ValidationError, Validator};

type ConstructFn<D> = Arc<dyn Fn() -> D + Send + Sync>;

/// Mapping rules from `S` to `D`.
///
/// Execution order is deterministic: convention rules first, then explicit
/// rules in registration order. Registration needs `&mut` / ownership while
/// `map` only needs `&self`, so a fully registered map can be shared across
/// threads without locking.
pub struct TypeMap<S, D> {
    convention: Vec<MappingRule<S, D>>,
    explicit: Vec<MappingRule<S, D>>,
    skipped: Vec<String>,
    constructor: Option<ConstructFn<D>>,
}

impl<S: Shape, D: Shape> Default for TypeMap<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Shape, D: Shape> TypeMap<S, D> {
    pub fn new() -> Self {
        Self::with_config(&MapperConfig::default())
    }

    pub fn with_config(config: &MapperConfig) -> Self {
        let convention = if config.implicit_mapping {
            convention_rules::<S, D>(config.name_matching)
        } else {
            Vec::new()
        };
        tracing::debug!(
            source = S::type_name(),
            destination = D::type_name(),
            convention_rules = convention.len(),
            "created type map"
        );
        Self {
            convention,
            explicit: Vec::new(),
            skipped: Vec::new(),
            constructor: None,
        }
    }

    // --- Fluent registration ---

    /// Appends an explicit rule. A previous explicit rule or convention rule
    /// for the same destination field is replaced, and a skip of that field
    /// (or of the record holding it) is lifted.
    pub fn add_mapping<V: Clone + 'static>(
        mut self,
        extractor: impl Into<Extractor<S, V>>,
        setter: impl Into<Setter<D, V>>,
    ) -> Self {
        self.push_rule(MappingRule::explicit(extractor.into(), setter.into()));
        self
    }

    /// Appends a rule between two dotted paths, both checked against the
    /// records' field tables now rather than at `map` time.
    pub fn add_path_mapping<V: Clone + 'static>(
        mut self,
        source: &str,
        destination: &str,
    ) -> Result<Self, ConfigurationError> {
        self.push_path_mapping::<V>(source, destination)?;
        Ok(self)
    }

    pub fn add_mappings<F>(mut self, group: F) -> Self
    where
        F: FnOnce(&mut MappingGroup<S, D>),
    {
        self.push_group(group);
        self
    }

    /// Excludes a destination field, and every path below it, from the
    /// convention and explicit rules registered so far.
    ///
    /// Rules whose setter is an unnamed `Setter::function` do not name a
    /// destination and are never affected; use `Setter::function_named` for
    /// a function setter that `skip` should be able to remove.
    pub fn skip(mut self, field: impl Into<String>) -> Self {
        self.push_skip(field.into());
        self
    }

    /// Provides the destination instance for `map` when `D` has no
    /// `Shape::construct`.
    pub fn with_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> D + Send + Sync + 'static,
    {
        self.set_constructor(constructor);
        self
    }

    // --- In-place registration (shared with `TypeMapEntry`) ---

    pub(crate) fn push_rule(&mut self, rule: MappingRule<S, D>) {
        if let Some(target) = rule.destination().map(str::to_string) {
            self.convention.retain(|r| r.destination() != Some(target.as_str()));
            if let Some(pos) = self
                .explicit
                .iter()
                .position(|r| r.destination() == Some(target.as_str()))
            {
                let replaced = self.explicit.remove(pos);
                tracing::debug!(
                    destination = %target,
                    replaced = replaced.source(),
                    by = rule.source(),
                    "explicit rule overrides earlier registration"
                );
            }
            let root = rule.destination_root().unwrap_or(target.as_str());
            let below = format!("{}.", target);
            self.skipped
                .retain(|s| *s != target && s != root && !s.starts_with(&below));
        }
        self.explicit.push(rule);
    }

    pub(crate) fn push_path_mapping<V: Clone + 'static>(
        &mut self,
        source: &str,
        destination: &str,
    ) -> Result<(), ConfigurationError> {
        let extractor = PropertyPath::<S, V>::parse(source)?;
        let setter = DestinationPath::<D, V>::parse(destination)?;
        self.push_rule(MappingRule::explicit(extractor.into(), setter.into()));
        Ok(())
    }

    pub(crate) fn push_group<F>(&mut self, group: F)
    where
        F: FnOnce(&mut MappingGroup<S, D>),
    {
        let mut collected = MappingGroup::new();
        group(&mut collected);
        for rule in collected.rules {
            self.push_rule(rule);
        }
        for field in collected.skipped {
            self.push_skip(field);
        }
    }

    pub(crate) fn push_skip(&mut self, field: String) {
        let targets = |rule: &MappingRule<S, D>| {
            let name = Some(field.as_str());
            rule.destination() == name || rule.destination_root() == name
        };
        self.convention.retain(|r| !targets(r));
        self.explicit.retain(|r| !targets(r));
        tracing::debug!(field = %field, "destination field skipped");
        if !self.skipped.contains(&field) {
            self.skipped.push(field);
        }
    }

    pub(crate) fn set_constructor<F>(&mut self, constructor: F)
    where
        F: Fn() -> D + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
    }

    // --- Execution ---

    /// Maps into a freshly constructed destination.
    pub fn map(&self, source: &S) -> Result<D, MappingError> {
        let mut destination = self.instantiate()?;
        self.map_into(source, &mut destination)?;
        Ok(destination)
    }

    /// Maps into a caller-supplied destination and hands the same instance back.
    ///
    /// Every extraction runs before the first write, and so does the check
    /// that each nested record a staged write needs either exists already or
    /// can be constructed. A failing converter or a missing constructor
    /// therefore leaves `destination` exactly as it was.
    pub fn map_into<'d>(
        &self,
        source: &S,
        destination: &'d mut D,
    ) -> Result<&'d mut D, MappingError> {
        let mut staged = Vec::with_capacity(self.rule_count());
        for rule in self.rules() {
            if let Some(value) = rule.extract(source)? {
                staged.push((rule, value));
            }
        }

        let current: &dyn Any = &*destination;
        let nested_paths = staged
            .iter()
            .filter_map(|(rule, _)| rule.destination())
            .filter(|path| path.contains('.'));
        for path in nested_paths {
            if let Some(record) = field::uncreatable_record(D::fields(), Some(current), path) {
                return Err(ConfigurationError::NotInstantiable(record.to_string()).into());
            }
        }

        let written = staged.len();
        for (rule, value) in staged {
            rule.apply(destination, value)?;
        }
        tracing::trace!(
            source = S::type_name(),
            destination = D::type_name(),
            rules = self.rule_count(),
            written,
            "mapped instance"
        );
        Ok(destination)
    }

    /// Maps independent sources concurrently against this shared map.
    pub fn map_par(&self, sources: &[S]) -> Result<Vec<D>, MappingError>
    where
        S: Sync,
        D: Send,
    {
        sources.par_iter().map(|source| self.map(source)).collect()
    }

    fn instantiate(&self) -> Result<D, ConfigurationError> {
        match &self.constructor {
            Some(construct) => Ok(construct()),
            None => D::construct()
                .ok_or_else(|| ConfigurationError::NotInstantiable(D::type_name().to_string())),
        }
    }

    // --- Inspection ---

    /// Effective rules in execution order.
    pub fn rules(&self) -> impl Iterator<Item = &MappingRule<S, D>> + '_ {
        self.convention.iter().chain(self.explicit.iter())
    }

    pub fn rule_count(&self) -> usize {
        self.convention.len() + self.explicit.len()
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Checks destination coverage; see `Validator`.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::new(self).validate()
    }
}

/// One identity rule per writable destination field whose name matches a
/// source field holding the same type.
fn convention_rules<S: Shape, D: Shape>(matching: NameMatching) -> Vec<MappingRule<S, D>> {
    let sources = S::fields();
    D::fields()
        .into_iter()
        .filter(Field::is_writable)
        .filter_map(|destination| {
            let source = sources
                .iter()
                .find(|s| matching.matches(s.name(), destination.name()))?;
            if source.value_type() != destination.value_type() {
                tracing::debug!(
                    field = destination.name(),
                    source_type = source.value_type_name(),
                    destination_type = destination.value_type_name(),
                    "same-named fields differ in type; no convention rule"
                );
                return None;
            }
            Some(MappingRule::convention(source.clone(), destination))
        })
        .collect()
}
