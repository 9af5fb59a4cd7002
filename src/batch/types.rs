use std::path::PathBuf;

use crate::compositor::WatermarkConfig;
use crate::error::ProcessError;
use crate::formats::FormatOptions;

/// One batch run's worth of work. Consumed by the runner.
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Input files, processed in this order.
    pub inputs: Vec<PathBuf>,
    pub watermark_path: PathBuf,
    pub config: WatermarkConfig,
    pub options: FormatOptions,
    pub output_directory: PathBuf,
    /// Optional prefix prepended to every output file name.
    pub name_prefix: Option<String>,
}

/// Outcome for a single input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<PathBuf, ProcessError>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregate result of a batch run. Per-file outcomes are kept in input
/// order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<FileOutcome>,
    pub succeeded: usize,
    pub failed: usize,
    /// Set when the run stopped early because cancellation was requested;
    /// outcomes then cover the processed prefix of the inputs.
    pub cancelled: bool,
}

impl BatchResult {
    pub(super) fn record(&mut self, outcome: FileOutcome) {
        if outcome.succeeded() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Snapshot handed to the progress sink after each file.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Files processed so far, including this one (1-based).
    pub processed: usize,
    pub total: usize,
    pub file: String,
    pub succeeded: bool,
    pub success_count: usize,
    pub failure_count: usize,
}

/// Receives one callback per processed file, in input order.
pub trait ProgressSink: Send + Sync {
    fn file_done(&self, update: &ProgressUpdate);
}

/// Sink that discards all updates.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn file_done(&self, _update: &ProgressUpdate) {}
}
