//! Sequential product seeding.

use std::error::Error;

use tracing::{debug, info, warn};

use crate::api::{ApiError, ProductSink};
use crate::report::{RecordOutcome, SeedEvent, SummaryReport};
use catalog::ProductRecord;

/// Progress callback invoked once per record.
pub type ProgressCallback = Box<dyn Fn(&SeedEvent) + Send + Sync>;

/// Submits product records to a [`ProductSink`] one at a time.
///
/// A failed record never stops the run: its error is captured in the
/// [`SummaryReport`] and the next record is submitted. Nothing is retried,
/// and nothing is remembered between runs, so running twice inserts every
/// record twice unless skip-existing mode is enabled.
pub struct Seeder<S> {
    sink: S,
    records: Vec<ProductRecord>,
    skip_existing: bool,
    progress: Option<ProgressCallback>,
}

impl<S: ProductSink> Seeder<S> {
    /// Creates a seeder for the given records, submitted in order.
    pub fn new(sink: S, records: Vec<ProductRecord>) -> Self {
        Self {
            sink,
            records,
            skip_existing: false,
            progress: None,
        }
    }

    /// Skips records whose name already exists in the collection.
    pub fn skip_existing(mut self, enabled: bool) -> Self {
        self.skip_existing = enabled;
        self
    }

    /// Sets a callback notified as each record completes.
    pub fn with_progress(mut self, callback: impl Fn(&SeedEvent) + Send + Sync + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Submits every record and returns the aggregate outcome.
    pub async fn run(&self) -> SummaryReport {
        info!("Seeding {} products...", self.records.len());

        let mut report = SummaryReport::default();

        for record in &self.records {
            for issue in record.lint() {
                warn!("{}: {}", record.name, issue);
            }

            let event = SeedEvent {
                name: record.name.clone(),
                outcome: self.submit(record).await,
            };

            match &event.outcome {
                RecordOutcome::Added => debug!("Added {}", event.name),
                RecordOutcome::Skipped => debug!("Skipped {}: already exists", event.name),
                RecordOutcome::Rejected { status, body } => {
                    warn!("Rejected {} with status {}: {}", event.name, status, body)
                }
                RecordOutcome::Faulted(description) => {
                    warn!("Failed to submit {}: {}", event.name, description)
                }
            }

            if let Some(progress) = &self.progress {
                progress(&event);
            }
            report.record(&event);
        }

        info!(
            "Seeded {}/{} products ({} skipped, {} failed)",
            report.added_count,
            self.records.len(),
            report.skipped_count,
            report.failed_count()
        );

        report
    }

    async fn submit(&self, record: &ProductRecord) -> RecordOutcome {
        if self.skip_existing {
            match self.sink.exists(&record.name).await {
                Ok(true) => return RecordOutcome::Skipped,
                Ok(false) => {}
                Err(e) => return outcome_for(e),
            }
        }

        match self.sink.insert(record).await {
            Ok(()) => RecordOutcome::Added,
            Err(e) => outcome_for(e),
        }
    }
}

fn outcome_for(err: ApiError) -> RecordOutcome {
    match err {
        ApiError::Rejected { status, body } => RecordOutcome::Rejected {
            status: status.as_u16(),
            body,
        },
        other => RecordOutcome::Faulted(describe_fault(&other)),
    }
}

/// Joins the error and each of its causes with `": "`, dropping a cause
/// whose message repeats the level above it.
fn describe_fault(err: &ApiError) -> String {
    let mut description = err.to_string();
    let mut previous = description.clone();
    let mut source = err.source();

    while let Some(cause) = source {
        let message = cause.to_string();
        if message != previous {
            description.push_str(": ");
            description.push_str(&message);
        }
        previous = message;
        source = cause.source();
    }

    description
}
