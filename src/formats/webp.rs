use image::DynamicImage;
use std::path::Path;
use webp::Encoder;

use crate::error::ProcessError;

/// Encode as WebP, lossy at the configured quality or lossless.
pub fn save(
    image: &DynamicImage,
    path: &Path,
    quality: f32,
    lossless: bool,
) -> Result<(), ProcessError> {
    let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
    let encoder = Encoder::from_image(&rgba)
        .map_err(|e| ProcessError::UnsupportedColorMode(e.to_string()))?;

    let encoded = if lossless {
        encoder.encode_lossless()
    } else {
        encoder.encode(quality)
    };

    std::fs::write(path, &*encoded)?;
    Ok(())
}
