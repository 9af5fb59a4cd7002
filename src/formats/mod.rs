// Output format encoders - one module per format, dispatched by FormatOptions
pub mod jpeg;
pub mod png;
pub mod tiff;
mod types;
pub mod webp;

pub use types::{FormatOptions, OutputFormat, PngFilterStrategy, TiffCompression};

use image::{DynamicImage, ImageFormat};
use std::io::BufReader;
use std::path::Path;

/// Write the image to `path` using the active format's encode parameters.
pub fn save_image(
    image: &DynamicImage,
    path: &Path,
    options: &FormatOptions,
    icc_profile: Option<&[u8]>,
) -> Result<(), crate::error::ProcessError> {
    match *options {
        FormatOptions::Jpeg { quality } => jpeg::save(image, path, quality, icc_profile),
        FormatOptions::Png {
            compression,
            filter,
        } => png::save(image, path, compression, filter),
        FormatOptions::Tiff { compression } => tiff::save(image, path, compression),
        FormatOptions::Webp { quality, lossless } => webp::save(image, path, quality, lossless),
    }
}

/// Extract the source's ICC profile so it can be re-embedded on encode.
/// Only JPEG and PNG sources carry profiles we understand.
pub fn extract_icc_profile(path: &Path) -> Option<Vec<u8>> {
    let file = std::fs::File::open(path).ok()?;
    let reader = image::ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .ok()?;

    match reader.format() {
        Some(ImageFormat::Jpeg) => jpeg::extract_icc_profile(path),
        Some(ImageFormat::Png) => png::extract_icc_profile(path),
        _ => None,
    }
}
