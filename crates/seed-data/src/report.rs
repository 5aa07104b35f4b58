//! Per-record outcomes and the end-of-run summary.

use std::fmt;

/// Most errors listed individually in a rendered summary.
pub const MAX_REPORTED_ERRORS: usize = 3;

const SEPARATOR_WIDTH: usize = 50;

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Added,
    /// A row with the same name already existed (skip-existing mode only).
    Skipped,
    /// The endpoint answered with a non-2xx status.
    Rejected { status: u16, body: String },
    /// The request never produced a response.
    Faulted(String),
}

/// Notification emitted once per record as soon as its outcome is known.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedEvent {
    pub name: String,
    pub outcome: RecordOutcome,
}

impl SeedEvent {
    /// Error entry for the summary, if this record failed.
    pub fn failure(&self) -> Option<SeedFailure> {
        let detail = match &self.outcome {
            RecordOutcome::Added | RecordOutcome::Skipped => return None,
            RecordOutcome::Rejected { body, .. } => body.clone(),
            RecordOutcome::Faulted(description) => description.clone(),
        };
        Some(SeedFailure {
            name: self.name.clone(),
            detail,
        })
    }
}

impl fmt::Display for SeedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            RecordOutcome::Added => write!(f, "✅ Added: {}", self.name),
            RecordOutcome::Skipped => write!(f, "⏭️  Skipped: {} (already exists)", self.name),
            RecordOutcome::Rejected { body, .. } => {
                write!(f, "❌ Failed to add {}: {}", self.name, body)
            }
            RecordOutcome::Faulted(description) => {
                write!(f, "❌ Error adding {}: {}", self.name, description)
            }
        }
    }
}

/// A failed record and the response body or fault description.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedFailure {
    pub name: String,
    pub detail: String,
}

impl fmt::Display for SeedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "❌ {}: {}", self.name, self.detail)
    }
}

/// Aggregate result of one seeding run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryReport {
    pub added_count: usize,
    pub skipped_count: usize,
    /// Every failure, in submission order.
    pub errors: Vec<SeedFailure>,
}

impl SummaryReport {
    /// Folds one record outcome into the totals.
    pub fn record(&mut self, event: &SeedEvent) {
        match event.outcome {
            RecordOutcome::Added => self.added_count += 1,
            RecordOutcome::Skipped => self.skipped_count += 1,
            RecordOutcome::Rejected { .. } | RecordOutcome::Faulted(_) => {
                self.errors.extend(event.failure());
            }
        }
    }

    pub fn failed_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of records processed.
    pub fn total(&self) -> usize {
        self.added_count + self.skipped_count + self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// The failures listed individually when the report is rendered.
    pub fn shown_errors(&self) -> &[SeedFailure] {
        &self.errors[..self.errors.len().min(MAX_REPORTED_ERRORS)]
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        write!(
            f,
            "Summary: {} products added successfully",
            self.added_count
        )?;
        if self.skipped_count > 0 {
            write!(f, "\nSkipped: {}", self.skipped_count)?;
        }
        if !self.errors.is_empty() {
            write!(f, "\nErrors: {}", self.errors.len())?;
            for failure in self.shown_errors() {
                write!(f, "\n  {failure}")?;
            }
        }
        Ok(())
    }
}
