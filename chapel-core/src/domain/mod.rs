//! Core domain entities
//!
//! Pure data structures as the backend hands them over. No I/O here apart
//! from parsing an already-fetched JSON snapshot.

mod lenient;
mod poll;
mod record;
pub mod result;
pub mod snapshot;

pub use lenient::decimal_from_value;
pub use poll::{Poll, PollVote};
pub use record::{Contribution, FinancialRecord, NestedCollection, OfferingField, Payer, SpecialOffering};
pub use snapshot::parse_snapshot;
