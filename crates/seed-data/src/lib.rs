//! Seeding tools for the storefront catalog.
//!
//! This crate pushes product records into the hosted `products` table over
//! its REST interface, one request per record, and summarizes what happened.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let config = SeedConfig::load(None)?;
//! let client = RestClient::new(&config)?;
//!
//! let report = Seeder::new(client, sample_products())
//!     .with_progress(|event| println!("{event}"))
//!     .run()
//!     .await;
//!
//! println!("\n{report}");
//! ```

pub mod api;
pub mod config;
pub mod fixtures;
pub mod report;
pub mod seeder;

// Re-export core types from catalog crate
pub use catalog::{ProductRecord, RecordIssue};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::api::{ApiError, ProductSink, RestClient};
    pub use crate::config::{ConfigError, SeedConfig};
    pub use crate::fixtures::{FixtureError, load_records, sample_products};
    pub use crate::report::{RecordOutcome, SeedEvent, SeedFailure, SummaryReport};
    pub use crate::seeder::Seeder;
    pub use crate::{ProductRecord, RecordIssue};
}
