// Batch runner - drives the compositor over a list of input files
mod naming;
mod runner;
mod types;

pub use runner::run;
pub use types::{
    BatchJob, BatchResult, FileOutcome, NullProgressSink, ProgressSink, ProgressUpdate,
};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ProcessError;

/// Input file extensions accepted when scanning a directory.
pub const INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Enumerate input images in a directory (non-recursive), sorted by name
/// for a deterministic processing order.
pub fn collect_input_files(directory: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    if !directory.is_dir() {
        return Err(ProcessError::InvalidConfig(format!(
            "input directory does not exist: {}",
            directory.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(directory)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| INPUT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}
