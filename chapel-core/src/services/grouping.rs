//! Grouping records into calendar week and month buckets
//!
//! Weeks start on Monday; a Sunday is the last day of the week that started
//! six days earlier. Buckets are keyed by their label, so two weeks whose
//! labels coincide (same month and day in different years, when the year is
//! left out of the label) share a bucket.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::FinancialRecord;

/// Label used for records whose timestamp cannot be read
pub const INVALID_DATE_LABEL: &str = "Invalid Date";

/// Anything that can be placed on a calendar
pub trait Timestamped {
    /// Raw ISO 8601 timestamp, if the record has one
    fn timestamp(&self) -> Option<&str>;
}

impl Timestamped for FinancialRecord {
    fn timestamp(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Week,
    Month,
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            other => Err(Error::validation(format!(
                "unknown granularity '{}', expected 'week' or 'month'",
                other
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Week => f.write_str("week"),
            Granularity::Month => f.write_str("month"),
        }
    }
}

/// What to do with a record whose timestamp is missing or unparseable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidTimestampPolicy {
    /// Collect them in a separate "Invalid Date" bucket
    #[default]
    Bucket,
    /// Leave them out and count them in `skipped`
    Skip,
    /// Fail the whole grouping
    Reject,
}

impl FromStr for InvalidTimestampPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bucket" => Ok(InvalidTimestampPolicy::Bucket),
            "skip" => Ok(InvalidTimestampPolicy::Skip),
            "reject" => Ok(InvalidTimestampPolicy::Reject),
            other => Err(Error::validation(format!(
                "unknown invalid-timestamp policy '{}'",
                other
            ))),
        }
    }
}

/// Knobs for bucketing, normally filled from `Config`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Append the year to week labels ("Week of Jan 6, 2025")
    pub include_year_in_week_label: bool,
    /// Offset used to pick the calendar day of offset-bearing timestamps
    pub utc_offset_minutes: i32,
    pub invalid_timestamps: InvalidTimestampPolicy,
}

impl GroupingOptions {
    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Calendar identity of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "start", rename_all = "lowercase")]
pub enum BucketKey {
    /// Monday the week starts on
    Week(NaiveDate),
    /// First day of the month
    Month(NaiveDate),
    Invalid,
}

impl BucketKey {
    /// `None` when the week would start before the earliest representable date
    pub fn for_date(date: NaiveDate, granularity: Granularity) -> Option<Self> {
        match granularity {
            Granularity::Week => week_start(date).map(BucketKey::Week),
            Granularity::Month => Some(BucketKey::Month(date.with_day(1).unwrap_or(date))),
        }
    }

    pub fn label(&self, include_year_in_week_label: bool) -> String {
        match self {
            BucketKey::Week(start) if include_year_in_week_label => {
                format!("Week of {}", start.format("%b %-d, %Y"))
            }
            BucketKey::Week(start) => format!("Week of {}", start.format("%b %-d")),
            BucketKey::Month(first) => first.format("%B %Y").to_string(),
            BucketKey::Invalid => INVALID_DATE_LABEL.to_string(),
        }
    }
}

/// Monday on or before `date`, `None` if that Monday is out of range
pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))
}

/// Calendar date of an ISO 8601 timestamp
///
/// Offset-bearing timestamps are moved to `offset` first; naive timestamps
/// and plain dates are taken as already local.
pub fn parse_timestamp_date(timestamp: &str, offset: FixedOffset) -> Option<NaiveDate> {
    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    let ts = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&offset).date_naive());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(ts, format).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(ts, "%Y-%m-%d").ok())
}

/// Bucket a record belongs in, `None` if its timestamp is unusable
pub fn bucket_key<R: Timestamped>(
    record: &R,
    granularity: Granularity,
    options: &GroupingOptions,
) -> Option<BucketKey> {
    record
        .timestamp()
        .and_then(|ts| parse_timestamp_date(ts, options.offset()))
        .and_then(|date| BucketKey::for_date(date, granularity))
}

/// Label of the bucket a record belongs in
pub fn bucket_label<R: Timestamped>(
    record: &R,
    granularity: Granularity,
    options: &GroupingOptions,
) -> String {
    bucket_key(record, granularity, options)
        .unwrap_or(BucketKey::Invalid)
        .label(options.include_year_in_week_label)
}

/// One bucket of borrowed records, in input order
#[derive(Debug, Clone)]
pub struct Bucket<'a, R> {
    pub label: String,
    /// Key of the first record placed here
    pub key: BucketKey,
    pub records: Vec<&'a R>,
}

/// Records partitioned by period, buckets in order of first appearance
#[derive(Debug, Clone)]
pub struct TimeBucketedCollection<'a, R> {
    pub granularity: Granularity,
    pub buckets: Vec<Bucket<'a, R>>,
    /// Records left out under `InvalidTimestampPolicy::Skip`
    pub skipped: usize,
}

impl<'a, R> TimeBucketedCollection<'a, R> {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buckets.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&[&'a R]> {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.records.as_slice())
    }

    /// All grouped records, bucket after bucket
    pub fn flatten(&self) -> Vec<&'a R> {
        self.buckets
            .iter()
            .flat_map(|b| b.records.iter().copied())
            .collect()
    }

    /// Order buckets oldest first, the invalid bucket last
    pub fn sort_chronologically(&mut self) {
        self.buckets.sort_by_key(|b| b.key);
    }
}

/// Partition records into week or month buckets
///
/// Fails only under `InvalidTimestampPolicy::Reject`.
pub fn group_by_period<'a, R: Timestamped>(
    records: &'a [R],
    granularity: Granularity,
    options: &GroupingOptions,
) -> Result<TimeBucketedCollection<'a, R>> {
    let mut buckets: Vec<Bucket<'a, R>> = Vec::new();
    let mut by_label: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0;

    for (position, record) in records.iter().enumerate() {
        let key = match bucket_key(record, granularity, options) {
            Some(key) => key,
            None => match options.invalid_timestamps {
                InvalidTimestampPolicy::Bucket => BucketKey::Invalid,
                InvalidTimestampPolicy::Skip => {
                    skipped += 1;
                    continue;
                }
                InvalidTimestampPolicy::Reject => {
                    return Err(Error::validation(format!(
                        "record {} has an unreadable timestamp: {:?}",
                        position,
                        record.timestamp().unwrap_or_default()
                    )));
                }
            },
        };

        let label = key.label(options.include_year_in_week_label);
        let slot = *by_label.entry(label.clone()).or_insert_with(|| {
            buckets.push(Bucket {
                label,
                key,
                records: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].records.push(record);
    }

    Ok(TimeBucketedCollection {
        granularity,
        buckets,
        skipped,
    })
}
