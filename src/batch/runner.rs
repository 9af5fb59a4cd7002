use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::naming;
use super::types::{BatchJob, BatchResult, FileOutcome, ProgressSink, ProgressUpdate};
use crate::compositor::{self, WatermarkConfig};
use crate::error::ProcessError;
use crate::formats::{self, FormatOptions};

/// Process every input in the job, in order.
///
/// An `Err` means the job failed to start (unreadable watermark, unusable
/// output directory) before any file was touched. Per-file failures are
/// recorded in the returned `BatchResult` and never abort the run. The
/// sink is called exactly once per processed file. Cancellation is
/// honored between files, never mid-file.
pub async fn run(
    job: BatchJob,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
) -> Result<BatchResult, ProcessError> {
    let watermark = preflight(&job).await?;

    let total = job.inputs.len();
    let extension = job.options.format().extension();
    let mut claimed = HashSet::new();
    let mut result = BatchResult::default();

    info!("Starting batch of {} files", total);

    for (index, input) in job.inputs.iter().enumerate() {
        if cancel.is_cancelled() {
            info!(
                "Cancellation requested, stopping after {} of {} files",
                index, total
            );
            result.cancelled = true;
            break;
        }

        let output = naming::output_path(
            &job.output_directory,
            input,
            job.name_prefix.as_deref(),
            extension,
            &mut claimed,
        );

        // One decoded image in flight at a time; pixel work stays off the
        // async runtime.
        let file_result = {
            let input = input.clone();
            let output = output.clone();
            let watermark = Arc::clone(&watermark);
            let config = job.config.clone();
            let options = job.options;
            match tokio::task::spawn_blocking(move || {
                process_file(&input, &output, &watermark, &config, &options)
            })
            .await
            {
                Ok(result) => result,
                Err(e) => Err(ProcessError::Internal(format!(
                    "processing task failed: {e}"
                ))),
            }
        };

        match &file_result {
            Ok(written) => debug!("Wrote {}", written.display()),
            Err(e) => warn!("Failed to process {}: {}", input.display(), e),
        }

        result.record(FileOutcome {
            input: input.clone(),
            result: file_result,
        });

        sink.file_done(&ProgressUpdate {
            processed: result.total(),
            total,
            file: input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string()),
            succeeded: result.outcomes.last().map(|o| o.succeeded()).unwrap_or(false),
            success_count: result.succeeded,
            failure_count: result.failed,
        });
    }

    info!(
        "Batch finished: {} succeeded, {} failed",
        result.succeeded, result.failed
    );
    Ok(result)
}

/// Job-level checks that must pass before any file is processed. Failures
/// here fail the whole job.
async fn preflight(job: &BatchJob) -> Result<Arc<DynamicImage>, ProcessError> {
    let watermark_path = job.watermark_path.clone();
    let watermark = tokio::task::spawn_blocking(move || {
        image::open(&watermark_path).map_err(|e| {
            ProcessError::InvalidConfig(format!(
                "cannot load watermark image {}: {}",
                watermark_path.display(),
                e
            ))
        })
    })
    .await
    .map_err(|e| ProcessError::Internal(e.to_string()))??;

    if watermark.width() == 0 || watermark.height() == 0 {
        return Err(ProcessError::InvalidConfig(
            "watermark image has zero width or height".to_string(),
        ));
    }

    tokio::fs::create_dir_all(&job.output_directory).await?;

    Ok(Arc::new(watermark))
}

/// Decode, compose, and encode one input file.
fn process_file(
    input: &Path,
    output: &Path,
    watermark: &DynamicImage,
    config: &WatermarkConfig,
    options: &FormatOptions,
) -> Result<PathBuf, ProcessError> {
    let icc_profile = formats::extract_icc_profile(input);
    let source = image::open(input).map_err(ProcessError::Decode)?;
    let composited = compositor::compose(&source, watermark, config)?;
    formats::save_image(&composited, output, options, icc_profile.as_deref())?;
    Ok(output.to_path_buf())
}
