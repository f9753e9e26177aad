//! Report service - totals and period reports over a fetched snapshot

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::Config;
use crate::domain::result::Result;
use crate::domain::FinancialRecord;
use crate::services::grouping::{group_by_period, BucketKey, Granularity, GroupingOptions, TimeBucketedCollection, Timestamped};
use crate::services::totals::{is_saturated, saturating_sum, FieldBreakdown};

/// Report service, configured once from `Config`
pub struct ReportService {
    options: GroupingOptions,
}

impl ReportService {
    pub fn new(config: &Config) -> Self {
        Self {
            options: config.grouping_options(),
        }
    }

    pub fn with_options(options: GroupingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GroupingOptions {
        &self.options
    }

    /// Bucket any timestamped records with the configured options
    pub fn group<'a, R: Timestamped>(
        &self,
        records: &'a [R],
        granularity: Granularity,
    ) -> Result<TimeBucketedCollection<'a, R>> {
        group_by_period(records, granularity, &self.options)
    }

    /// Total of each record, in input order
    pub fn record_totals(&self, records: &[FinancialRecord]) -> Vec<RecordTotal> {
        records
            .iter()
            .map(|record| RecordTotal {
                id: record.id.clone(),
                created_at: record.created_at.clone(),
                payer_count: record.name_of_those_who_paid.len(),
                total: record.total(),
                overflowed: record.checked_total().is_none(),
            })
            .collect()
    }

    pub fn summary(&self, records: &[FinancialRecord]) -> FieldBreakdown {
        FieldBreakdown::from_records(records)
    }

    /// Group records by period and total each bucket
    pub fn period_report(
        &self,
        records: &[FinancialRecord],
        granularity: Granularity,
    ) -> Result<PeriodReport> {
        let grouped = self.group(records, granularity)?;

        let periods: Vec<PeriodSummary> = grouped
            .buckets
            .iter()
            .map(|bucket| {
                let breakdown = FieldBreakdown::from_records(bucket.records.iter().copied());
                PeriodSummary {
                    label: bucket.label.clone(),
                    key: bucket.key,
                    record_count: bucket.records.len(),
                    total: breakdown.total,
                    breakdown,
                }
            })
            .collect();

        let total = saturating_sum(periods.iter().map(|p| p.total));
        let overflowed = is_saturated(total) || periods.iter().any(|p| p.breakdown.overflowed);

        Ok(PeriodReport {
            granularity,
            total,
            overflowed,
            skipped: grouped.skipped,
            periods,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTotal {
    pub id: Option<String>,
    pub created_at: Option<String>,
    pub payer_count: usize,
    pub total: Decimal,
    /// `total` was clamped and is only a lower bound
    pub overflowed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub label: String,
    pub key: BucketKey,
    pub record_count: usize,
    pub total: Decimal,
    pub breakdown: FieldBreakdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub granularity: Granularity,
    /// Buckets in order of first appearance in the snapshot
    pub periods: Vec<PeriodSummary>,
    pub total: Decimal,
    pub overflowed: bool,
    pub skipped: usize,
}

impl PeriodReport {
    /// Oldest period first, undated records last
    pub fn sort_chronologically(&mut self) {
        self.periods.sort_by_key(|p| p.key);
    }
}
