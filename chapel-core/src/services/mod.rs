//! Service layer
//!
//! Pure aggregation over fetched snapshots (totals, grouping, polls, SMS)
//! plus the event log.

pub mod grouping;
pub mod logging;
pub mod poll;
mod report;
pub mod sms;
pub mod totals;

pub use grouping::{
    bucket_key, bucket_label, group_by_period, Bucket, BucketKey, Granularity, GroupingOptions,
    InvalidTimestampPolicy, TimeBucketedCollection, Timestamped, INVALID_DATE_LABEL,
};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use poll::{tally, OptionTally, PollTally};
pub use report::{PeriodReport, PeriodSummary, RecordTotal, ReportService};
pub use sms::{count_segments, SmsEncoding, SmsSegments};
pub use totals::{
    is_saturated, record_total, saturating_sum, sum_contributions, sum_fields, sum_nested,
    FieldBreakdown,
};
