//! Sequential submitter for generated batches.
//!
//! A batch import is best-effort: records are submitted strictly in order,
//! one create call at a time, and a failed record is tallied and skipped
//! rather than aborting the rest of the batch.

use log::{debug, info, warn};

use crate::{
    model::{DiscountCodeDraft, DiscountCodeRecord},
    platform::DiscountCodeService,
};

/// Progress counters of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportProgress {
    /// Records attempted so far.
    pub current: usize,
    /// Batch size.
    pub total: usize,
    /// Records whose create call errored.
    pub failed: usize,
}

impl ImportProgress {
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            failed: 0,
        }
    }

    /// Records created successfully.
    pub fn succeeded(&self) -> usize {
        self.current - self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.current == self.total
    }
}

/// Receives a progress snapshot after every record, success or failure.
pub trait ProgressListener {
    fn on_progress(&self, progress: &ImportProgress);
}

/// Listener used when the caller does not render progress.
#[derive(Default)]
pub struct NoopProgressListener;

impl ProgressListener for NoopProgressListener {
    fn on_progress(&self, _progress: &ImportProgress) {}
}

/// Submits a batch one record at a time, tallying failures.
pub struct BatchImporter<'a> {
    service: &'a dyn DiscountCodeService,
    listener: &'a dyn ProgressListener,
}

impl<'a> BatchImporter<'a> {
    pub fn new(service: &'a dyn DiscountCodeService) -> Self {
        static NOOP: NoopProgressListener = NoopProgressListener;
        Self {
            service,
            listener: &NOOP,
        }
    }

    pub fn with_listener(
        service: &'a dyn DiscountCodeService,
        listener: &'a dyn ProgressListener,
    ) -> Self {
        Self { service, listener }
    }

    /// Runs the import and returns the terminal progress.
    ///
    /// A failed create call is logged and counted, then the loop moves on;
    /// there is no retry, no reordering, and no distinction between
    /// transport and validation failures.
    pub fn import(&self, records: &[DiscountCodeRecord]) -> ImportProgress {
        let mut progress = ImportProgress::new(records.len());

        info!("Start of import: {} records", progress.total);

        for record in records {
            let draft = DiscountCodeDraft::from_record(record);

            match self.service.create_discount_code(&draft) {
                Ok(created) => {
                    debug!("Created discount code {} (id: {})", created.code, created.id);
                }
                Err(error) => {
                    progress.failed += 1;
                    warn!("Error creating discount code {}: {}", record.code, error);
                }
            }

            progress.current += 1;
            self.listener.on_progress(&progress);
        }

        info!(
            "End of import: {} attempted, {} failed, {} succeeded",
            progress.current,
            progress.failed,
            progress.succeeded()
        );

        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_starts_empty_and_reports_completion() {
        let mut progress = ImportProgress::new(2);
        assert_eq!(progress.succeeded(), 0);
        assert!(!progress.is_complete());

        progress.current = 2;
        progress.failed = 1;
        assert_eq!(progress.succeeded(), 1);
        assert!(progress.is_complete());
    }

    #[test]
    fn empty_batch_is_complete_immediately() {
        let progress = ImportProgress::new(0);
        assert!(progress.is_complete());
    }
}
