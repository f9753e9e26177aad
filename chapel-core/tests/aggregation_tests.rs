//! Integration tests for offering aggregation
//!
//! Records are built from JSON the way the clients receive them, then run
//! through totals and grouping.
//!
//! Run with: cargo test --test aggregation_tests

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde_json::json;

use chapel_core::services::{
    bucket_label, group_by_period, is_saturated, record_total, sum_fields, sum_nested,
    FieldBreakdown, Granularity, GroupingOptions, INVALID_DATE_LABEL,
};
use chapel_core::{parse_snapshot, FinancialRecord, NestedCollection, OfferingField};

// ============================================================================
// Test Helpers
// ============================================================================

fn record(value: serde_json::Value) -> FinancialRecord {
    serde_json::from_value(value).expect("record should deserialize")
}

/// A month of Sunday/mid-week records with every kind of field populated
fn sample_snapshot() -> Vec<FinancialRecord> {
    let json = json!({
        "message": "Records fetched",
        "data": [
            {
                "_id": "r1", "createdAt": "2025-01-06T09:00:00.000Z",
                "thanksgiving": 100, "welfare": 50,
                "nameOfThoseWhoPaid": [{"name": "A", "amount": 20}, {"name": "B", "amount": 30}]
            },
            {
                "_id": "r2", "createdAt": "2025-01-12T18:30:00.000Z",
                "sundayOfferingFirstService": 120.5, "sundayOfferingSecondService": "80",
                "sundayOfferingProjectThirdService": 15,
                "ifAnySpecialOfferingSpecify": [{"event": "Harvest", "amount": 300}]
            },
            {
                "_id": "r3", "createdAt": "2025-01-13T07:00:00.000Z",
                "midWeekOffering": 40, "fridayPrayerOffering": null,
                "nameOfThoseWhoPaid": [{"name": "C"}]
            },
            {
                "_id": "r4", "createdAt": "2025-02-02T10:00:00.000Z",
                "childrenServiceOffering": 12.25, "sundaySchool": 7.75, "communityImpact": 60
            },
            { "_id": "r5", "createdAt": "2024-12-29T10:00:00.000Z" }
        ]
    });
    parse_snapshot(&json.to_string()).expect("snapshot should parse")
}

// ============================================================================
// Record totals
// ============================================================================

#[test]
fn test_concrete_total_scenario() {
    let r = record(json!({
        "thanksgiving": 100,
        "welfare": 50,
        "nameOfThoseWhoPaid": [{"amount": 20}, {"amount": 30}]
    }));
    assert_eq!(record_total(Some(&r)), Decimal::from(200));
}

#[test]
fn test_empty_record_totals_zero() {
    assert_eq!(record_total(Some(&record(json!({})))), Decimal::ZERO);

    let all_absent = record(json!({
        "thanksgiving": null,
        "nameOfThoseWhoPaid": [],
        "ifAnySpecialOfferingSpecify": []
    }));
    assert_eq!(all_absent.total(), Decimal::ZERO);
    assert_eq!(record_total(None), Decimal::ZERO);
}

#[test]
fn test_additive_decomposition() {
    for r in sample_snapshot() {
        let decomposed = sum_fields(&r, &OfferingField::ALL)
            + sum_nested(&r, NestedCollection::Payers)
            + sum_nested(&r, NestedCollection::SpecialOfferings);
        assert_eq!(r.total(), decomposed, "record {:?}", r.id);
    }
}

#[test]
fn test_nested_order_does_not_matter() {
    let forward = record(json!({
        "nameOfThoseWhoPaid": [{"amount": 1.1}, {"amount": 2}, {"amount": "3.3"}],
        "ifAnySpecialOfferingSpecify": [{"event": "x", "amount": 5}, {"event": "y", "amount": 7}]
    }));
    let mut reversed = forward.clone();
    reversed.name_of_those_who_paid.reverse();
    reversed.if_any_special_offering_specify.reverse();

    assert_eq!(forward.total(), reversed.total());
    assert_eq!(forward.total(), Decimal::new(184, 1));
}

#[test]
fn test_total_is_idempotent() {
    for r in sample_snapshot() {
        assert_eq!(r.total(), r.total());
    }
}

#[test]
fn test_snapshot_totals() {
    let records = sample_snapshot();
    let totals: Vec<Decimal> = records.iter().map(FinancialRecord::total).collect();
    assert_eq!(
        totals,
        vec![
            Decimal::from(200),
            Decimal::new(5155, 1),
            Decimal::from(40),
            Decimal::from(80),
            Decimal::ZERO,
        ]
    );

    let breakdown = FieldBreakdown::from_records(&records);
    assert_eq!(breakdown.record_count, 5);
    assert_eq!(breakdown.total, totals.iter().copied().sum::<Decimal>());
    assert_eq!(breakdown.special_offerings, Decimal::from(300));
}

#[test]
fn test_totals_beyond_decimal_range_clamp() {
    let records: Vec<FinancialRecord> =
        parse_snapshot(r#"[{"thanksgiving": 5e28, "welfare": 5e28}]"#).unwrap();
    let total = record_total(Some(&records[0]));
    assert_eq!(total, Decimal::MAX);
    assert!(is_saturated(total));
    assert_eq!(records[0].checked_total(), None);

    let records: Vec<FinancialRecord> =
        parse_snapshot(r#"[{"welfare": 6e28}, {"welfare": 6e28}]"#).unwrap();
    let breakdown = FieldBreakdown::from_records(&records);
    assert!(breakdown.overflowed);
    assert_eq!(breakdown.total, Decimal::MAX);
    assert_eq!(records[0].checked_total(), Some(Decimal::from_scientific("6e28").unwrap()));
}

#[test]
fn test_out_of_range_amount_is_not_zeroed() {
    let r = record(json!({
        "thanksgiving": 1e30,
        "nameOfThoseWhoPaid": [{"amount": "1e30"}]
    }));
    assert_eq!(r.thanksgiving, Some(Decimal::MAX));
    assert_eq!(r.name_of_those_who_paid[0].amount, Some(Decimal::MAX));
    assert_eq!(r.checked_total(), None);

    let breakdown = FieldBreakdown::from_records([&record(json!({"welfare": 1e30}))]);
    assert!(breakdown.overflowed);
}

// ============================================================================
// Time bucketing
// ============================================================================

#[test]
fn test_concrete_week_scenario() {
    let records = vec![
        record(json!({"createdAt": "2025-01-06"})),
        record(json!({"createdAt": "2025-01-12"})),
        record(json!({"createdAt": "2025-01-13"})),
    ];
    let options = GroupingOptions::default();
    let grouped = group_by_period(&records, Granularity::Week, &options).unwrap();

    let monday = bucket_label(&records[0], Granularity::Week, &options);
    let sunday = bucket_label(&records[1], Granularity::Week, &options);
    let next_monday = bucket_label(&records[2], Granularity::Week, &options);
    assert_eq!(monday, "Week of Jan 6");
    assert_eq!(monday, sunday);
    assert_ne!(monday, next_monday);
    assert_eq!(grouped.len(), 2);
}

#[test]
fn test_bucketing_preserves_multiset() {
    let records = sample_snapshot();
    for granularity in [Granularity::Week, Granularity::Month] {
        let grouped = group_by_period(&records, granularity, &GroupingOptions::default()).unwrap();

        let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
        for r in grouped.flatten() {
            *counts.entry(r.id.as_deref()).or_default() += 1;
        }
        assert_eq!(counts.values().sum::<usize>(), records.len());
        for r in &records {
            assert_eq!(counts[&r.id.as_deref()], 1, "{:?} lost or duplicated", r.id);
        }
    }
}

#[test]
fn test_bucket_labels_rederive() {
    let records = sample_snapshot();
    let options = GroupingOptions::default();
    for granularity in [Granularity::Week, Granularity::Month] {
        let grouped = group_by_period(&records, granularity, &options).unwrap();
        for bucket in &grouped.buckets {
            for r in &bucket.records {
                assert_eq!(bucket_label(*r, granularity, &options), bucket.label);
            }
        }
    }
}

#[test]
fn test_relative_order_within_bucket() {
    let records = sample_snapshot();
    let grouped = group_by_period(&records, Granularity::Month, &GroupingOptions::default()).unwrap();

    assert_eq!(grouped.labels(), vec!["January 2025", "February 2025", "December 2024"]);
    let january: Vec<&str> = grouped
        .get("January 2025")
        .unwrap()
        .iter()
        .filter_map(|r| r.id.as_deref())
        .collect();
    assert_eq!(january, vec!["r1", "r2", "r3"]);
}

#[test]
fn test_year_boundary_week() {
    // Sunday 2024-12-29 belongs to the week starting Monday 2024-12-23;
    // a Wednesday 2025-01-01 starts from Monday 2024-12-30
    let records = vec![
        record(json!({"createdAt": "2024-12-29"})),
        record(json!({"createdAt": "2025-01-01"})),
    ];
    let grouped = group_by_period(&records, Granularity::Week, &GroupingOptions::default()).unwrap();
    assert_eq!(grouped.labels(), vec!["Week of Dec 23", "Week of Dec 30"]);
}

#[test]
fn test_date_before_first_representable_week() {
    let records = vec![
        record(json!({"_id": "ancient", "createdAt": "-262143-01-01"})),
        record(json!({"_id": "r1", "createdAt": "2025-01-06"})),
    ];
    let grouped = group_by_period(&records, Granularity::Week, &GroupingOptions::default()).unwrap();
    assert_eq!(grouped.labels(), vec![INVALID_DATE_LABEL, "Week of Jan 6"]);
    assert_eq!(bucket_label(&records[0], Granularity::Week, &GroupingOptions::default()), INVALID_DATE_LABEL);
}
