//! Property tests for name splitting and parameter ordering

use cmdwire_di::{ParameterValue, Parameters};
use cmdwire_extension::{sort_by_type, split_name, SortedValue};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9:-]{0,8}"
}

fn scalar() -> impl Strategy<Value = ParameterValue> {
    prop_oneof![
        Just(ParameterValue::Null),
        any::<bool>().prop_map(ParameterValue::Bool),
        any::<i64>().prop_map(ParameterValue::Int),
        "[a-z]{0,6}".prop_map(ParameterValue::String),
        Just(ParameterValue::List(Vec::new())),
        prop::collection::vec(any::<bool>(), 1..3)
            .prop_map(|items| ParameterValue::list(items)),
    ]
}

fn rank(value: &SortedValue<'_>) -> u8 {
    match value {
        SortedValue::Scalar(ParameterValue::Bool(_)) => 0,
        SortedValue::Scalar(ParameterValue::String(_)) => 1,
        SortedValue::Scalar(ParameterValue::Int(_) | ParameterValue::Float(_)) => 2,
        SortedValue::Scalar(ParameterValue::Null) => 3,
        SortedValue::Scalar(_) => 4,
        SortedValue::Nested(_) => 5,
    }
}

proptest! {
    #[test]
    fn test_split_name_parts(
        name in segment(),
        aliases in prop::collection::vec(segment(), 0..4),
        hidden in any::<bool>(),
    ) {
        let mut raw = if hidden { format!("|{}", name) } else { name.clone() };
        for alias in &aliases {
            raw.push('|');
            raw.push_str(alias);
        }

        let split = split_name(&raw).unwrap();
        prop_assert_eq!(split.name, name);
        prop_assert_eq!(split.aliases, aliases);
        prop_assert_eq!(split.hidden, hidden);
    }

    #[test]
    fn test_sorted_groups_are_ordered(
        entries in prop::collection::btree_map("[a-z]{1,6}", scalar(), 0..12),
    ) {
        let parameters: Parameters = entries;
        let sorted = sort_by_type(&parameters);

        prop_assert_eq!(sorted.len(), parameters.len());
        let ranks: Vec<u8> = sorted.iter().map(|(_, value)| rank(value)).collect();
        prop_assert!(ranks.windows(2).all(|pair| pair[0] <= pair[1]));

        // keys stay ordered within a group
        for pair in sorted.windows(2) {
            if rank(&pair[0].1) == rank(&pair[1].1) {
                prop_assert!(pair[0].0 < pair[1].0);
            }
        }
    }
}
