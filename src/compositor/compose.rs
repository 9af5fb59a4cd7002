use image::{imageops::FilterType, DynamicImage, RgbaImage};
use tracing::debug;

use super::types::{ResizeBounds, WatermarkConfig};
use crate::error::ProcessError;

/// Computed position and size of the watermark within the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkPlacement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Overlay `watermark` onto a copy of `source` according to `config`.
///
/// The watermark is resized to `scale` times the source's shorter
/// dimension (preserving its own aspect ratio), its alpha channel scaled
/// by the configured opacity, and alpha-composited at the anchor
/// position. Neither input is mutated.
pub fn compose(
    source: &DynamicImage,
    watermark: &DynamicImage,
    config: &WatermarkConfig,
) -> Result<DynamicImage, ProcessError> {
    let config = config.clamped();
    let placement = watermark_geometry(
        (source.width(), source.height()),
        (watermark.width(), watermark.height()),
        &config,
    )?;

    debug!(
        "Placing {}x{} watermark at ({}, {})",
        placement.width, placement.height, placement.x, placement.y
    );

    let resized = if (placement.width, placement.height)
        != (watermark.width(), watermark.height())
    {
        watermark.resize_exact(placement.width, placement.height, FilterType::Lanczos3)
    } else {
        watermark.clone()
    };

    // RGBA8 conversion synthesizes alpha = 255 for opaque formats, so
    // scaling by opacity gives a uniform alpha in that case.
    let mut stamp = resized.to_rgba8();
    apply_opacity(&mut stamp, config.opacity);

    let mut canvas = source.to_rgba8();
    image::imageops::overlay(&mut canvas, &stamp, placement.x, placement.y);

    let composited = DynamicImage::ImageRgba8(canvas);
    Ok(match config.resize_to {
        Some(bounds) => fit_within(composited, bounds),
        None => composited,
    })
}

/// Compute where the watermark lands and how big it is, without touching
/// any pixels. The returned box (including the margin) always fits inside
/// the source.
pub fn watermark_geometry(
    source: (u32, u32),
    watermark: (u32, u32),
    config: &WatermarkConfig,
) -> Result<WatermarkPlacement, ProcessError> {
    if watermark.0 == 0 || watermark.1 == 0 {
        return Err(ProcessError::InvalidConfig(
            "watermark image has zero width or height".to_string(),
        ));
    }
    if source.0 == 0 || source.1 == 0 {
        return Err(ProcessError::InvalidConfig(
            "source image has zero width or height".to_string(),
        ));
    }

    let config = config.clamped();
    let short_side = source.0.min(source.1);
    let margin = (config.margin * short_side as f32).round() as u32;

    let mut width = ((config.scale * short_side as f32).round() as u32).max(1);
    if !config.allow_upscale {
        width = width.min(watermark.0);
    }

    // Whatever the scale asks for, the watermark plus margins must fit
    // inside the source.
    let avail_width = source.0.saturating_sub(2 * margin).max(1);
    let avail_height = source.1.saturating_sub(2 * margin).max(1);
    width = width.min(avail_width);

    let aspect = watermark.1 as f32 / watermark.0 as f32;
    let mut height = ((width as f32 * aspect).round() as u32).max(1);
    if height > avail_height {
        height = avail_height;
        width = ((height as f32 / aspect).round() as u32).max(1);
    }

    let (x, y) = config.anchor.offset(source, (width, height), margin);
    Ok(WatermarkPlacement {
        x,
        y,
        width,
        height,
    })
}

fn apply_opacity(image: &mut RgbaImage, opacity: f32) {
    if opacity >= 1.0 {
        return;
    }
    for pixel in image.pixels_mut() {
        pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
    }
}

/// Scale the image down to fit within the given bounds, preserving aspect
/// ratio. Never upscales.
fn fit_within(image: DynamicImage, bounds: ResizeBounds) -> DynamicImage {
    let max_width = bounds.max_width.min(image.width());
    let max_height = bounds.max_height.min(image.height());

    if max_width == image.width() && max_height == image.height() {
        image
    } else {
        image.resize(max_width, max_height, FilterType::Lanczos3)
    }
}
