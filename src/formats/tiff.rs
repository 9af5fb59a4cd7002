use image::DynamicImage;
use std::fs::File;
use std::path::Path;
use tiff::encoder::compression::{Deflate, Lzw, Packbits, Uncompressed};
use tiff::encoder::{colortype, TiffEncoder};

use super::types::TiffCompression;
use crate::error::ProcessError;

/// Encode as TIFF with the configured compression scheme. Alpha is
/// preserved (RGBA8 samples).
pub fn save(
    image: &DynamicImage,
    path: &Path,
    compression: TiffCompression,
) -> Result<(), ProcessError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let output = File::create(path)?;
    let mut encoder =
        TiffEncoder::new(output).map_err(|e| ProcessError::Encode(e.to_string()))?;

    let result = match compression {
        TiffCompression::None => encoder.write_image_with_compression::<colortype::RGBA8, _>(
            width,
            height,
            Uncompressed,
            rgba.as_raw(),
        ),
        TiffCompression::Lzw => encoder.write_image_with_compression::<colortype::RGBA8, _>(
            width,
            height,
            Lzw,
            rgba.as_raw(),
        ),
        TiffCompression::Deflate => encoder.write_image_with_compression::<colortype::RGBA8, _>(
            width,
            height,
            Deflate::default(),
            rgba.as_raw(),
        ),
        TiffCompression::Packbits => encoder.write_image_with_compression::<colortype::RGBA8, _>(
            width,
            height,
            Packbits,
            rgba.as_raw(),
        ),
    };

    result.map_err(|e| ProcessError::Encode(e.to_string()))
}
