use log::error;
use std::fmt;

use crate::error::MediaError;

pub mod add_subtitles;
pub mod matcher;
pub mod merge_audio;
pub mod strip_subtitles;

/// Per-item tallies for one workflow run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl WorkflowReport {
    fn record_failure(&mut self, item: &str, err: &MediaError) {
        error!("Error processing '{item}': {err}");
        self.failed += 1;
    }
}

impl fmt::Display for WorkflowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} failed",
            self.processed, self.skipped, self.failed
        )
    }
}
