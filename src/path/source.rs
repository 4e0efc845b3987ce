//! Null-safe resolution of accessor chains on the source side.
use smallvec::SmallVec;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use super::{join_segments, split_path, Segments};
use crate::error::ConfigurationError;
use crate::shape::field::{self, ReadFn};
use crate::shape::{short_name, Shape};

type ResolveFn<S, V> = Arc<dyn for<'a> Fn(&'a S) -> Option<&'a V> + Send + Sync>;

fn resolver<S, V, F>(f: F) -> ResolveFn<S, V>
where
    F: for<'a> Fn(&'a S) -> Option<&'a V> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An ordered chain of field accessors from a source `S` to a value `V`,
/// e.g. `address.city`.
///
/// Resolution walks the chain left to right and yields `None` as soon as a
/// link is absent. Absence is never an error.
pub struct PropertyPath<S, V> {
    segments: Segments,
    resolve: ResolveFn<S, V>,
}

impl<S, V> Clone for PropertyPath<S, V> {
    fn clone(&self) -> Self {
        Self {
            segments: self.segments.clone(),
            resolve: Arc::clone(&self.resolve),
        }
    }
}

impl<S: 'static, V: 'static> PropertyPath<S, V> {
    /// Starts a path with a single accessor.
    pub fn new<F>(name: &'static str, get: F) -> Self
    where
        F: for<'a> Fn(&'a S) -> Option<&'a V> + Send + Sync + 'static,
    {
        let mut segments = SmallVec::new();
        segments.push(name);
        Self {
            segments,
            resolve: resolver(get),
        }
    }

    /// Extends the path by one accessor on the current value.
    pub fn then<W, F>(self, name: &'static str, get: F) -> PropertyPath<S, W>
    where
        W: 'static,
        F: for<'a> Fn(&'a V) -> Option<&'a W> + Send + Sync + 'static,
    {
        let mut segments = self.segments;
        segments.push(name);
        let previous = self.resolve;
        PropertyPath {
            segments,
            resolve: resolver(move |source: &S| previous(source).and_then(|value| get(value))),
        }
    }

    pub fn resolve<'a>(&self, source: &'a S) -> Option<&'a V> {
        (self.resolve)(source)
    }

    /// Resolves and clones the value at the end of the path.
    pub fn get(&self, source: &S) -> Option<V>
    where
        V: Clone,
    {
        self.resolve(source).cloned()
    }

    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    pub fn name(&self) -> String {
        join_segments(&self.segments)
    }
}

impl<S: Shape, V: 'static> PropertyPath<S, V> {
    /// Builds a path from a dotted string using the field tables of `S` and
    /// every nested record along the way.
    ///
    /// All structural problems are reported here, once, rather than on each
    /// resolution.
    pub fn parse(path: &str) -> Result<Self, ConfigurationError> {
        let names = split_path(path)?;
        let mut fields = S::fields();
        let mut owner = S::type_name();
        let mut segments: Segments = SmallVec::new();
        let mut readers: Vec<ReadFn> = Vec::with_capacity(names.len());
        let mut leaf_type = (TypeId::of::<S>(), owner);

        for (i, name) in names.iter().enumerate() {
            let field = field::find(&fields, name).cloned().ok_or_else(|| {
                ConfigurationError::UnknownField {
                    type_name: short_name(owner).to_string(),
                    field: name.to_string(),
                    path: path.to_string(),
                }
            })?;
            segments.push(field.name());
            readers.push(field.read.clone());
            leaf_type = (field.value_type(), field.value_type_name());

            if i + 1 < names.len() {
                let nested = field.nested.as_ref().ok_or_else(|| ConfigurationError::NotNested {
                    type_name: short_name(owner).to_string(),
                    field: name.to_string(),
                    path: path.to_string(),
                })?;
                fields = (nested.fields)();
                owner = nested.type_name;
            }
        }

        if leaf_type.0 != TypeId::of::<V>() {
            return Err(ConfigurationError::TypeMismatch {
                path: path.to_string(),
                expected: std::any::type_name::<V>().to_string(),
                found: leaf_type.1.to_string(),
            });
        }

        Ok(Self {
            segments,
            resolve: resolver(move |source: &S| {
                let mut current: &dyn Any = source;
                for read in &readers {
                    current = read(current)?;
                }
                current.downcast_ref::<V>()
            }),
        })
    }
}

impl<S, V> fmt::Debug for PropertyPath<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyPath")
            .field(&join_segments(&self.segments))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Address, Person};
    use rstest::rstest;

    fn city() -> PropertyPath<Person, String> {
        PropertyPath::new("address", |p: &Person| p.address.as_ref())
            .then("city", |a: &Address| a.city.as_ref())
    }

    #[test]
    fn test_typed_path_resolves_leaf() {
        let person = Person::michal();
        assert_eq!(city().get(&person).as_deref(), Some("Warsaw"));
        assert_eq!(city().segments(), &["address", "city"]);
        assert_eq!(city().name(), "address.city");
    }

    #[test]
    fn test_absent_intermediate_short_circuits() {
        let person = Person { address: None, ..Person::michal() };
        assert_eq!(city().resolve(&person), None);
    }

    #[test]
    fn test_absent_leaf_is_absent() {
        let person = Person {
            address: Some(Address { city: None, street: Some("Nowy Swiat".into()) }),
            ..Person::michal()
        };
        assert_eq!(city().get(&person), None);
    }

    #[test]
    fn test_parsed_path_matches_typed_path() {
        let parsed = PropertyPath::<Person, String>::parse("address.street").unwrap();
        assert_eq!(parsed.segments(), &["address", "street"]);

        let person = Person::michal();
        assert_eq!(parsed.get(&person).as_deref(), Some("Nowy Swiat"));

        let homeless = Person { address: None, ..Person::michal() };
        assert_eq!(parsed.get(&homeless), None);
    }

    #[test]
    fn test_parsed_single_segment_path() {
        let age = PropertyPath::<Person, u32>::parse("age").unwrap();
        assert_eq!(age.get(&Person::michal()), Some(15));
    }

    #[rstest]
    #[case("address.zip", unknown("Address", "zip", "address.zip"))]
    #[case("nickname", unknown("Person", "nickname", "nickname"))]
    #[case("name.city", not_nested("Person", "name", "name.city"))]
    #[case("address..city", ConfigurationError::InvalidPath("address..city".into()))]
    #[case("", ConfigurationError::InvalidPath("".into()))]
    fn test_parse_rejects_bad_paths(#[case] path: &str, #[case] expected: ConfigurationError) {
        let err = PropertyPath::<Person, String>::parse(path).unwrap_err();
        assert_eq!(err, expected);
    }

    #[test]
    fn test_parse_rejects_wrong_leaf_type() {
        let err = PropertyPath::<Person, String>::parse("age").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::TypeMismatch { ref found, .. } if found == "u32"
        ));
    }

    fn unknown(type_name: &str, field: &str, path: &str) -> ConfigurationError {
        ConfigurationError::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
            path: path.into(),
        }
    }

    fn not_nested(type_name: &str, field: &str, path: &str) -> ConfigurationError {
        ConfigurationError::NotNested {
            type_name: type_name.into(),
            field: field.into(),
            path: path.into(),
        }
    }
}
