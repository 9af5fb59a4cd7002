use image::{codecs::jpeg::JpegEncoder, DynamicImage, ImageEncoder};
use std::path::Path;
use tracing::debug;

use crate::error::ProcessError;

/// Extract an ICC profile from a JPEG file's APP2 segments.
///
/// Profiles are carried in APP2 markers tagged `ICC_PROFILE\0` followed by
/// a sequence number and chunk count. Multi-chunk profiles are rare for
/// photo sources; only the first chunk's payload is returned.
pub fn extract_icc_profile(path: &Path) -> Option<Vec<u8>> {
    let data = std::fs::read(path).ok()?;

    // SOI marker
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];

        // Start of scan: no more metadata segments follow.
        if marker == 0xDA {
            break;
        }

        // Standalone markers have no length field.
        if (0xD0..=0xD9).contains(&marker) || marker == 0xFF {
            pos += 2;
            continue;
        }

        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let segment_end = pos + 2 + length;
        if length < 2 || segment_end > data.len() {
            break;
        }

        if marker == 0xE2 {
            let payload = &data[pos + 4..segment_end];
            if payload.len() > 14 && payload.starts_with(b"ICC_PROFILE\0") {
                // Skip the identifier plus sequence/count bytes.
                let profile = &payload[14..];
                debug!("Found ICC profile in JPEG: {} bytes", profile.len());
                return Some(profile.to_vec());
            }
        }

        pos = segment_end;
    }

    None
}

/// Encode as JPEG with the given quality, embedding an ICC profile when
/// one was extracted from the source.
pub fn save(
    image: &DynamicImage,
    path: &Path,
    quality: u8,
    icc_profile: Option<&[u8]>,
) -> Result<(), ProcessError> {
    // JPEG has no alpha channel
    let rgb_image = image.to_rgb8();
    let output = std::fs::File::create(path)?;
    let mut encoder = JpegEncoder::new_with_quality(output, quality);

    if let Some(profile) = icc_profile {
        match encoder.set_icc_profile(profile.to_vec()) {
            Ok(()) => debug!("Embedding ICC profile: {} bytes", profile.len()),
            Err(e) => debug!("Encoder rejected ICC profile ({}), writing without it", e),
        }
    }

    encoder
        .write_image(
            &rgb_image,
            rgb_image.width(),
            rgb_image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ProcessError::Encode(e.to_string()))?;

    Ok(())
}
