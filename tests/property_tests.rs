//! Property-based tests for number generation, TAG validation and list paging.
//!
//! These tests use proptest to verify invariants across a wide range of inputs,
//! helping to catch edge cases that unit tests might miss.

use chrono::Utc;
use maintenance_api::models::{
    equipment::is_valid_tag,
    service_order::{format_number, parse_sequence},
    ServiceOrder, ServiceOrderStatus,
};
use maintenance_api::services::service_orders::next_number;
use proptest::prelude::*;

// Strategies for generating test data
fn valid_tag_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{3}-[A-Za-z0-9]{2}-[0-9]{3}".prop_map(|s| s)
}

fn order(number: String) -> ServiceOrder {
    ServiceOrder {
        id: number.clone(),
        number,
        employee_id: "e".into(),
        equipment_category_id: "generator".into(),
        inspection_category_id: "1".into(),
        checklist_id: "c".into(),
        observations: String::new(),
        created_at: Utc::now(),
        status: ServiceOrderStatus::Pending,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn well_formed_tags_are_accepted(tag in valid_tag_strategy()) {
        prop_assert!(is_valid_tag(&tag), "valid TAG rejected: {}", tag);
    }

    #[test]
    fn tags_with_surrounding_text_are_rejected(tag in valid_tag_strategy(), extra in "[A-Z0-9]{1,3}") {
        let prefixed = format!("{}{}", extra, tag);
        let suffixed = format!("{}{}", tag, extra);
        prop_assert!(!is_valid_tag(&prefixed));
        prop_assert!(!is_valid_tag(&suffixed));
    }

    #[test]
    fn digits_in_the_prefix_group_are_rejected(a in "[0-9]{3}", rest in "-[A-Z]{2}-[0-9]{3}") {
        let tag = format!("{}{}", a, rest);
        prop_assert!(!is_valid_tag(&tag));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn formatted_numbers_parse_back(sequence in 0u64..10_000_000, year in 2000i32..2100) {
        let number = format_number(sequence, year);
        prop_assert_eq!(parse_sequence(&number), Some(sequence));
        let suffix = format!("/{}", year);
        prop_assert!(number.ends_with(&suffix));
        prop_assert!(number.split('/').next().unwrap().len() >= 5);
    }

    #[test]
    fn next_number_exceeds_every_existing_sequence(
        sequences in prop::collection::vec(0u64..100_000, 0..20),
        year in 2000i32..2100,
    ) {
        let orders: Vec<ServiceOrder> = sequences
            .iter()
            .map(|s| order(format_number(*s, 2020)))
            .collect();
        let next = next_number(&orders, year);
        let expected = sequences.iter().max().map_or(1, |m| m + 1);
        prop_assert_eq!(parse_sequence(&next), Some(expected));
        let suffix = format!("/{}", year);
        prop_assert!(next.ends_with(&suffix));
    }

    #[test]
    fn unparseable_numbers_are_ignored(garbage in "[a-zA-Z ]{1,10}", seq in 1u64..1000) {
        let orders = vec![order(format!("{}/2024", garbage)), order(format_number(seq, 2024))];
        prop_assert_eq!(parse_sequence(&next_number(&orders, 2025)), Some(seq + 1));
    }
}
