//! Ordering of parameters for display
//!
//! Each level is ordered by key (map keys by byte order, list indices
//! numerically) and then grouped by kind: booleans, strings, numbers, null,
//! opaque values and finally nested structures. Grouping is stable, so keys
//! stay ordered within a group.

use cmdwire_di::{ParameterValue, Parameters};

/// Entries of one level in display order
pub type SortedParameters<'a> = Vec<(String, SortedValue<'a>)>;

/// A parameter value ready for display
#[derive(Debug, Clone, PartialEq)]
pub enum SortedValue<'a> {
    Scalar(&'a ParameterValue),
    Nested(SortedParameters<'a>),
}

impl SortedValue<'_> {
    pub fn is_nested(&self) -> bool {
        matches!(self, SortedValue::Nested(_))
    }

    fn group(&self) -> Group {
        match self {
            SortedValue::Nested(_) => Group::Nested,
            SortedValue::Scalar(ParameterValue::Bool(_)) => Group::Bool,
            SortedValue::Scalar(ParameterValue::String(_)) => Group::String,
            SortedValue::Scalar(ParameterValue::Int(_) | ParameterValue::Float(_)) => Group::Number,
            SortedValue::Scalar(ParameterValue::Null) => Group::Null,
            SortedValue::Scalar(_) => Group::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Bool,
    String,
    Number,
    Null,
    Other,
    Nested,
}

/// Order parameters for display, recursively
pub fn sort_by_type(parameters: &Parameters) -> SortedParameters<'_> {
    sort_entries(parameters.iter().map(|(key, value)| (key.clone(), value)))
}

fn sort_entries<'a>(
    entries: impl Iterator<Item = (String, &'a ParameterValue)>,
) -> SortedParameters<'a> {
    let mut sorted: SortedParameters<'a> = entries
        .map(|(key, value)| (key, sort_value(value)))
        .collect();
    sorted.sort_by_key(|(_, value)| value.group());
    sorted
}

fn sort_value(value: &ParameterValue) -> SortedValue<'_> {
    match value {
        // BTreeMap iteration is already in key order
        ParameterValue::Map(entries) => SortedValue::Nested(sort_entries(
            entries.iter().map(|(key, value)| (key.clone(), value)),
        )),
        ParameterValue::List(items) => SortedValue::Nested(sort_entries(
            items
                .iter()
                .enumerate()
                .map(|(index, value)| (index.to_string(), value)),
        )),
        scalar => SortedValue::Scalar(scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(sorted: &SortedParameters<'_>) -> Vec<String> {
        sorted.iter().map(|(key, _)| key.clone()).collect()
    }

    #[test]
    fn test_groups_in_order() {
        let mut parameters = Parameters::new();
        parameters.insert("b".into(), true.into());
        parameters.insert("a".into(), "x".into());
        parameters.insert("n".into(), 5.into());
        parameters.insert("z".into(), ParameterValue::Null);
        parameters.insert("nested".into(), ParameterValue::map([("q", 1)]));

        let sorted = sort_by_type(&parameters);
        assert_eq!(keys(&sorted), vec!["b", "a", "n", "z", "nested"]);
    }

    #[test]
    fn test_opaque_before_nested() {
        let mut parameters = Parameters::new();
        parameters.insert("a_list".into(), ParameterValue::list([1]));
        parameters.insert("b_object".into(), ParameterValue::opaque::<std::fs::File>());
        parameters.insert("c_float".into(), 1.5.into());

        let sorted = sort_by_type(&parameters);
        assert_eq!(keys(&sorted), vec!["c_float", "b_object", "a_list"]);
    }

    #[test]
    fn test_nested_levels_are_sorted() {
        let mut parameters = Parameters::new();
        parameters.insert(
            "app".into(),
            ParameterValue::map([
                ("zeta", ParameterValue::from("last string")),
                ("build", ParameterValue::map([("stable", false)])),
                ("alpha", ParameterValue::from(false)),
            ]),
        );

        let sorted = sort_by_type(&parameters);
        match &sorted[0].1 {
            SortedValue::Nested(level) => {
                assert_eq!(keys(level), vec!["alpha", "zeta", "build"]);
            }
            other => panic!("expected nested value, got {:?}", other),
        }
    }

    #[test]
    fn test_list_indices_stay_numeric() {
        let items: Vec<ParameterValue> = (0..12).map(|i| ParameterValue::Int(i)).collect();
        let mut parameters = Parameters::new();
        parameters.insert("list".into(), ParameterValue::List(items));

        let sorted = sort_by_type(&parameters);
        match &sorted[0].1 {
            SortedValue::Nested(level) => {
                let expected: Vec<String> = (0..12).map(|i| i.to_string()).collect();
                assert_eq!(keys(level), expected);
            }
            other => panic!("expected nested value, got {:?}", other),
        }
    }
}
