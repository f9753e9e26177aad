//! Offering totals
//!
//! A record total is the sum of every fixed category plus the amounts in both
//! nested lists. Missing values are the additive identity, so none of these
//! functions can fail.
//!
//! Sums clamp at `Decimal::MAX`/`Decimal::MIN` rather than overflow. A clamped
//! value is only a bound on the real sum; `is_saturated` tells them apart and
//! the aggregate types carry an `overflowed` flag.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{Contribution, FinancialRecord, NestedCollection, OfferingField};

/// Whether a value sits at the edge of the decimal range
pub fn is_saturated(value: Decimal) -> bool {
    value == Decimal::MAX || value == Decimal::MIN
}

/// Sum that clamps at the edge of the decimal range instead of panicking
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum the given fixed categories of a record
pub fn sum_fields(record: &FinancialRecord, fields: &[OfferingField]) -> Decimal {
    saturating_sum(fields.iter().filter_map(|field| record.amount(*field)))
}

/// Sum the `amount` of every entry in one nested list
pub fn sum_nested(record: &FinancialRecord, collection: NestedCollection) -> Decimal {
    match collection {
        NestedCollection::Payers => sum_contributions(&record.name_of_those_who_paid),
        NestedCollection::SpecialOfferings => {
            sum_contributions(&record.if_any_special_offering_specify)
        }
    }
}

pub fn sum_contributions<C: Contribution>(items: &[C]) -> Decimal {
    saturating_sum(items.iter().filter_map(Contribution::amount))
}

/// Grand total of one record; `None` totals to zero
pub fn record_total(record: Option<&FinancialRecord>) -> Decimal {
    record.map_or(Decimal::ZERO, FinancialRecord::total)
}

impl FinancialRecord {
    /// Grand total of every category and nested contribution
    pub fn total(&self) -> Decimal {
        saturating_sum([
            sum_fields(self, &OfferingField::ALL),
            sum_nested(self, NestedCollection::Payers),
            sum_nested(self, NestedCollection::SpecialOfferings),
        ])
    }

    /// Grand total, `None` when it does not fit in a `Decimal`
    pub fn checked_total(&self) -> Option<Decimal> {
        Some(self.total()).filter(|total| !is_saturated(*total))
    }
}

/// Per-category totals across a collection of records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBreakdown {
    pub record_count: usize,
    /// Keyed by category, only categories with at least one value appear
    pub fields: BTreeMap<OfferingField, Decimal>,
    pub payers: Decimal,
    pub special_offerings: Decimal,
    pub total: Decimal,
    /// Some sum hit the edge of the decimal range and was clamped
    pub overflowed: bool,
}

impl FieldBreakdown {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a FinancialRecord>,
    {
        let mut breakdown = Self::default();
        for record in records {
            breakdown.add(record);
        }
        breakdown
    }

    /// Fold one more record in
    pub fn add(&mut self, record: &FinancialRecord) {
        self.record_count += 1;
        for field in OfferingField::ALL {
            if let Some(value) = record.amount(field) {
                let slot = self.fields.entry(field).or_insert(Decimal::ZERO);
                self.overflowed |= accumulate(slot, value);
            }
        }
        let payers = sum_nested(record, NestedCollection::Payers);
        let special = sum_nested(record, NestedCollection::SpecialOfferings);
        self.overflowed |= accumulate(&mut self.payers, payers);
        self.overflowed |= accumulate(&mut self.special_offerings, special);
        self.overflowed |= accumulate(&mut self.total, record.total());
    }

    /// Total of one category, zero when no record carried it
    pub fn field(&self, field: OfferingField) -> Decimal {
        self.fields.get(&field).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn nested(&self, collection: NestedCollection) -> Decimal {
        match collection {
            NestedCollection::Payers => self.payers,
            NestedCollection::SpecialOfferings => self.special_offerings,
        }
    }
}

/// Add into `slot`, returning true when the result is clamped
fn accumulate(slot: &mut Decimal, value: Decimal) -> bool {
    *slot = slot.saturating_add(value);
    is_saturated(*slot) || is_saturated(value)
}
