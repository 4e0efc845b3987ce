//! The two sides of a mapping rule. Each side is either a named path or an
//! arbitrary function, never both.
use std::sync::Arc;

use super::converter::Converter;
use crate::error::{ConfigurationError, ConversionFailure};
use crate::path::{DestinationPath, PropertyPath};

/// How a rule obtains its value from the source.
pub enum Extractor<S, V> {
    Path(PropertyPath<S, V>),
    Function(Converter<S, V>),
}

impl<S: 'static, V: Clone + 'static> Extractor<S, V> {
    /// An arbitrary read of the source; `None` means nothing to write.
    pub fn function<F>(read: F) -> Self
    where
        F: Fn(&S) -> Option<V> + Send + Sync + 'static,
    {
        Extractor::Function(Converter::optional("<function>", read))
    }

    pub(crate) fn extract(&self, source: &S) -> Result<Option<V>, ConversionFailure> {
        match self {
            Extractor::Path(path) => Ok(path.get(source)),
            Extractor::Function(converter) => converter.convert(source),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Extractor::Path(path) => path.name(),
            Extractor::Function(converter) => converter.name().to_string(),
        }
    }
}

impl<S, V> Clone for Extractor<S, V> {
    fn clone(&self) -> Self {
        match self {
            Extractor::Path(path) => Extractor::Path(path.clone()),
            Extractor::Function(converter) => Extractor::Function(converter.clone()),
        }
    }
}

impl<S, V> From<PropertyPath<S, V>> for Extractor<S, V> {
    fn from(path: PropertyPath<S, V>) -> Self {
        Extractor::Path(path)
    }
}

impl<S, V> From<Converter<S, V>> for Extractor<S, V> {
    fn from(converter: Converter<S, V>) -> Self {
        Extractor::Function(converter)
    }
}

type SetFn<D, V> = Arc<dyn Fn(&mut D, V) + Send + Sync>;

/// How a rule writes its value into the destination.
pub enum Setter<D, V> {
    Path(DestinationPath<D, V>),
    /// An arbitrary write. The optional name identifies the destination field
    /// for override precedence and validation coverage.
    Function { name: Option<String>, set: SetFn<D, V> },
}

impl<D: 'static, V: 'static> Setter<D, V> {
    /// An unnamed write. It may create intermediate records itself, e.g. with
    /// `Option::get_or_insert_with`.
    pub fn function<F>(set: F) -> Self
    where
        F: Fn(&mut D, V) + Send + Sync + 'static,
    {
        Setter::Function { name: None, set: Arc::new(set) }
    }

    /// A write that targets the named destination field.
    pub fn function_named<F>(name: impl Into<String>, set: F) -> Self
    where
        F: Fn(&mut D, V) + Send + Sync + 'static,
    {
        Setter::Function { name: Some(name.into()), set: Arc::new(set) }
    }

    pub(crate) fn apply(&self, destination: &mut D, value: V) -> Result<(), ConfigurationError> {
        match self {
            Setter::Path(path) => path.write(destination, value),
            Setter::Function { set, .. } => {
                set(destination, value);
                Ok(())
            }
        }
    }

    /// The destination field this setter targets, when known.
    pub fn destination(&self) -> Option<String> {
        match self {
            Setter::Path(path) => Some(path.name()),
            Setter::Function { name, .. } => name.clone(),
        }
    }
}

impl<D, V> Clone for Setter<D, V> {
    fn clone(&self) -> Self {
        match self {
            Setter::Path(path) => Setter::Path(path.clone()),
            Setter::Function { name, set } => Setter::Function {
                name: name.clone(),
                set: Arc::clone(set),
            },
        }
    }
}

impl<D, V> From<DestinationPath<D, V>> for Setter<D, V> {
    fn from(path: DestinationPath<D, V>) -> Self {
        Setter::Path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Address, Contact, Person, PersonDto};

    #[test]
    fn test_path_extractor_is_null_safe() {
        let city: Extractor<Person, String> =
            PropertyPath::new("address", |p: &Person| p.address.as_ref())
                .then("city", |a: &Address| a.city.as_ref())
                .into();

        assert_eq!(city.extract(&Person::michal()).unwrap().as_deref(), Some("Warsaw"));
        let homeless = Person { address: None, ..Person::michal() };
        assert_eq!(city.extract(&homeless).unwrap(), None);
        assert_eq!(city.describe(), "address.city");
    }

    #[test]
    fn test_function_setter_creates_nested_record_lazily() {
        let email = Setter::function(|d: &mut PersonDto, v: String| {
            d.contact.get_or_insert_with(Contact::default).email = Some(v)
        });
        let phone = Setter::function(|d: &mut PersonDto, v: String| {
            d.contact.get_or_insert_with(Contact::default).phone = Some(v)
        });

        let mut dto = PersonDto::default();
        email.apply(&mut dto, "michal@gmail.com".into()).unwrap();
        phone.apply(&mut dto, "123".into()).unwrap();

        let contact = dto.contact.unwrap();
        assert_eq!(contact.email.as_deref(), Some("michal@gmail.com"));
        assert_eq!(contact.phone.as_deref(), Some("123"));
        assert_eq!(email.destination(), None);
    }

    #[test]
    fn test_setter_destination_names() {
        let named: Setter<PersonDto, String> =
            Setter::function_named("first_name", |d: &mut PersonDto, v: String| {
                d.first_name = Some(v)
            });
        let path: Setter<PersonDto, String> =
            DestinationPath::field("city", |d: &mut PersonDto, v: String| d.city = Some(v)).into();

        assert_eq!(named.destination().as_deref(), Some("first_name"));
        assert_eq!(path.destination().as_deref(), Some("city"));
    }
}
