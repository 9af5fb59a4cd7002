use flate2::read::ZlibDecoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::types::PngFilterStrategy;
use crate::error::ProcessError;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Extract an ICC profile from a PNG's iCCP chunk.
///
/// The chunk holds a null-terminated profile name, a compression method
/// byte (0 = deflate), and the zlib-compressed profile.
pub fn extract_icc_profile(path: &Path) -> Option<Vec<u8>> {
    let data = std::fs::read(path).ok()?;
    if !data.starts_with(PNG_SIGNATURE) {
        return None;
    }

    let mut pos = PNG_SIGNATURE.len();
    while pos + 12 <= data.len() {
        let length =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        let chunk_type = &data[pos + 4..pos + 8];
        let body_start = pos + 8;
        let body_end = body_start + length;
        if body_end > data.len() {
            break;
        }

        if chunk_type == b"iCCP" {
            let body = &data[body_start..body_end];
            if let Some(null_pos) = body.iter().position(|&b| b == 0)
                && null_pos + 2 < body.len()
                && body[null_pos + 1] == 0
            {
                let mut decoder = ZlibDecoder::new(&body[null_pos + 2..]);
                let mut profile = Vec::new();
                if decoder.read_to_end(&mut profile).is_ok() {
                    debug!(
                        "Found ICC profile in PNG iCCP chunk: {} bytes",
                        profile.len()
                    );
                    return Some(profile);
                }
            }
        }

        if chunk_type == b"IEND" {
            break;
        }
        // length + type + data + CRC
        pos = body_end + 4;
    }

    None
}

/// Encode as PNG. The 0-9 compression level maps onto the png crate's
/// presets: 0-2 fast, 3-6 default, 7-9 best.
pub fn save(
    image: &DynamicImage,
    path: &Path,
    compression: u8,
    filter: PngFilterStrategy,
) -> Result<(), ProcessError> {
    let compression_type = match compression {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    };
    let filter_type = match filter {
        PngFilterStrategy::None => FilterType::NoFilter,
        PngFilterStrategy::Adaptive => FilterType::Adaptive,
    };

    let output = std::fs::File::create(path)?;
    let encoder = PngEncoder::new_with_quality(output, compression_type, filter_type);
    image
        .write_with_encoder(encoder)
        .map_err(|e| ProcessError::Encode(e.to_string()))?;
    Ok(())
}
