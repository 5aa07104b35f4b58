//! Storefront catalog domain types.
//!
//! The seeding tools in `seed-data` build and submit these records; keeping
//! them here lets other tooling share one definition of a product row.

pub mod models;

pub use models::{ProductRecord, RecordIssue};
