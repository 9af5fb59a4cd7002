use thiserror::Error;

/// Errors raised while processing a single image or validating a job.
///
/// Per-file errors are recorded in the batch result and never abort the
/// run; only pre-flight failures (bad watermark, bad output directory)
/// surface as an `Err` from the runner itself.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
