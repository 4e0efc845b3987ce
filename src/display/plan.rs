use crate::rule::RuleOrigin;
use crate::shape::{short_name, Shape};
use crate::type_map::TypeMap;
use std::fmt::{self, Write};

/// Lists a type map's effective rules in the order `map` runs them.
///
/// ```text
/// TypeMap Person -> PersonDto
/// --------------------------------------------------
///   [convention] age -> age
///   [explicit]   address.city -> city
///   [skipped]    contact
/// ```
pub fn format_plan<S: Shape, D: Shape>(map: &TypeMap<S, D>) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "TypeMap {} -> {}",
        short_name(S::type_name()),
        short_name(D::type_name())
    );
    let _ = writeln!(output, "--------------------------------------------------");

    if map.rule_count() == 0 && map.skipped().is_empty() {
        let _ = writeln!(output, "  (no rules)");
        return output;
    }

    for rule in map.rules() {
        let tag = match rule.origin() {
            RuleOrigin::Convention => "[convention]",
            RuleOrigin::Explicit => "[explicit]",
        };
        let _ = writeln!(
            output,
            "  {:<12} {} -> {}",
            tag,
            rule.source(),
            rule.destination().unwrap_or("<function>")
        );
    }
    for field in map.skipped() {
        let _ = writeln!(output, "  {:<12} {}", "[skipped]", field);
    }
    output
}

impl<S: Shape, D: Shape> fmt::Display for TypeMap<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_plan(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperConfig;
    use crate::path::{DestinationPath, PropertyPath};
    use crate::rule::{Extractor, Setter};
    use crate::testing::{Address, Person, PersonDto, PersonSummary};

    #[test]
    fn test_plan_lists_rules_in_execution_order() {
        let map = TypeMap::<Person, PersonDto>::new()
            .add_mapping(
                PropertyPath::new("address", |p: &Person| p.address.as_ref())
                    .then("city", |a: &Address| a.city.as_ref()),
                DestinationPath::field("city", |d: &mut PersonDto, v: String| d.city = Some(v)),
            )
            .add_mapping(
                Extractor::function(|p: &Person| p.email.clone()),
                Setter::function(|d: &mut PersonDto, v: String| d.street = Some(v)),
            )
            .skip("contact");

        let expected = "\
TypeMap Person -> PersonDto
--------------------------------------------------
  [convention] age -> age
  [explicit]   address.city -> city
  [explicit]   <function> -> <function>
  [skipped]    contact
";
        assert_eq!(format_plan(&map), expected);
        assert_eq!(map.to_string(), expected);
    }

    #[test]
    fn test_empty_plan() {
        let map = TypeMap::<Person, PersonSummary>::with_config(&MapperConfig::explicit_only());
        assert!(format_plan(&map).ends_with("  (no rules)\n"));
        assert!(format_plan(&map).starts_with("TypeMap Person -> PersonSummary\n"));
    }
}
