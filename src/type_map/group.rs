use crate::rule::{Extractor, MappingRule, Setter};

/// A bundle of rules registered together through `TypeMap::add_mappings`.
///
/// The group is filled by a plain closure; its rules are appended to the type
/// map in the order they were added to the group.
pub struct MappingGroup<S, D> {
    pub(crate) rules: Vec<MappingRule<S, D>>,
    pub(crate) skipped: Vec<String>,
}

impl<S: 'static, D: 'static> MappingGroup<S, D> {
    pub(crate) fn new() -> Self {
        Self {
            rules: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn map<V: Clone + 'static>(
        &mut self,
        extractor: impl Into<Extractor<S, V>>,
        setter: impl Into<Setter<D, V>>,
    ) -> &mut Self {
        self.rules
            .push(MappingRule::explicit(extractor.into(), setter.into()));
        self
    }

    pub fn skip(&mut self, field: impl Into<String>) -> &mut Self {
        self.skipped.push(field.into());
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.skipped.is_empty()
    }
}
