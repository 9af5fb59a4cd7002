use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Pick the output path for an input file: `<prefix><stem>.<ext>` inside
/// the output directory. Collisions with files already on disk or with
/// paths claimed earlier in this batch get a numeric suffix (`_1`, `_2`,
/// ...) instead of overwriting.
pub fn output_path(
    output_directory: &Path,
    input: &Path,
    prefix: Option<&str>,
    extension: &str,
    claimed: &mut HashSet<PathBuf>,
) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let base = match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}{}", prefix, stem),
        _ => stem.to_string(),
    };

    let mut candidate = output_directory.join(format!("{}.{}", base, extension));
    let mut counter = 1;
    while candidate.exists() || claimed.contains(&candidate) {
        candidate = output_directory.join(format!("{}_{}.{}", base, counter, extension));
        counter += 1;
    }

    claimed.insert(candidate.clone());
    candidate
}
