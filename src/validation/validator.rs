//! Static coverage checks over a single type map.
use std::collections::HashSet;

use super::error::{ValidationError, ValidationErrorType};
use crate::shape::field;
use crate::shape::{short_name, Shape};
use crate::type_map::TypeMap;

/// Checks a type map without running it.
///
/// Like a linter, it collects every finding instead of stopping at the first,
/// so one call reports all unmapped fields and unreachable nested records.
pub struct Validator<'a, S, D> {
    map: &'a TypeMap<S, D>,
}

impl<'a, S: Shape, D: Shape> Validator<'a, S, D> {
    pub fn new(map: &'a TypeMap<S, D>) -> Self {
        Self { map }
    }

    /// # Returns
    /// - `Ok(())` if every writable destination field is covered or skipped
    ///   and every nested record on a written path can be created.
    /// - `Err(Vec<ValidationError>)` with all findings otherwise.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let type_pair =
            format!("{} -> {}", short_name(S::type_name()), short_name(D::type_name()));
        let mut errors = Vec::new();

        let covered: HashSet<&str> = self
            .map
            .rules()
            .filter_map(|rule| rule.destination_root())
            .collect();
        let skipped: HashSet<&str> = self.map.skipped().iter().map(String::as_str).collect();

        for destination in D::fields().iter().filter(|f| f.is_writable()) {
            let name = destination.name();
            if covered.contains(name) || skipped.contains(name) {
                continue;
            }
            errors.push(ValidationError {
                type_pair: type_pair.clone(),
                field: name.to_string(),
                error_type: ValidationErrorType::UnmappedField,
                message: format!("Destination field '{}' is not written by any rule.", name),
            });
        }

        for path in self.map.rules().filter_map(|rule| rule.destination()) {
            let unreachable = field::uncreatable_record(D::fields(), None, path).map(short_name);
            if let Some(record) = unreachable {
                errors.push(ValidationError {
                    type_pair: type_pair.clone(),
                    field: path.to_string(),
                    error_type: ValidationErrorType::NotInstantiable,
                    message: format!(
                        "Writing '{}' needs a new '{}', which has no constructor.",
                        path, record
                    ),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{DestinationPath, PropertyPath};
    use crate::rule::{Extractor, Setter};
    use crate::testing::{Person, PersonDto, PersonSummary};

    #[test]
    fn test_reports_every_unmapped_field() {
        let map = TypeMap::<Person, PersonDto>::new();
        let errors = map.validate().unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "city", "street", "contact"]);
        assert!(errors.iter().all(|e| e.error_type == ValidationErrorType::UnmappedField));
        assert_eq!(errors[0].type_pair, "Person -> PersonDto");
    }

    #[test]
    fn test_skips_and_nested_rules_count_as_covered() {
        let map = TypeMap::<Person, PersonDto>::new()
            .add_path_mapping::<String>("name", "first_name")
            .and_then(|m| m.add_path_mapping::<String>("address.city", "city"))
            .and_then(|m| m.add_path_mapping::<String>("email", "contact.email"))
            .unwrap()
            .skip("street");

        assert_eq!(Validator::new(&map).validate(), Ok(()));
    }

    #[test]
    fn test_unnamed_function_setter_leaves_field_unmapped() {
        let map = TypeMap::<Person, PersonSummary>::new();
        assert_eq!(map.validate(), Ok(()));

        let named = TypeMap::<Person, PersonDto>::new()
            .add_mapping(
                Extractor::function(|p: &Person| Some(p.name.clone())),
                Setter::function(|d: &mut PersonDto, v: String| d.first_name = Some(v)),
            )
            .skip("city")
            .skip("street")
            .skip("contact");
        let errors = named.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "first_name");
    }

    #[test]
    fn test_reports_nested_record_without_constructor() {
        let map = TypeMap::<PersonDto, Person>::new()
            .add_mapping(
                PropertyPath::new("city", |d: &PersonDto| d.city.as_ref()),
                DestinationPath::<Person, String>::parse("address.city").unwrap(),
            )
            .skip("name")
            .skip("email")
            .skip("phone");

        let errors = map.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        let error = &errors[0];
        assert_eq!(error.error_type, ValidationErrorType::NotInstantiable);
        assert_eq!(error.field, "address.city");
        assert!(error.message.contains("Address"));
    }
}
