use serde::{Deserialize, Serialize};

/// Watermark placement relative to the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Anchor {
    /// Top-left pixel offset for a watermark of the given size, inset by
    /// `margin` pixels from the anchored edges.
    pub fn offset(
        &self,
        source: (u32, u32),
        watermark: (u32, u32),
        margin: u32,
    ) -> (i64, i64) {
        let (sw, sh) = (source.0 as i64, source.1 as i64);
        let (ww, wh) = (watermark.0 as i64, watermark.1 as i64);
        let m = margin as i64;

        match self {
            Anchor::TopLeft => (m, m),
            Anchor::TopRight => (sw - ww - m, m),
            Anchor::BottomLeft => (m, sh - wh - m),
            Anchor::BottomRight => (sw - ww - m, sh - wh - m),
            Anchor::Center => ((sw - ww) / 2, (sh - wh) / 2),
        }
    }
}

/// Maximum output dimensions; the composited image is scaled down to fit
/// within these bounds, preserving aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeBounds {
    pub max_width: u32,
    pub max_height: u32,
}

/// Appearance parameters for one batch run. Read-only while processing.
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    /// Watermark opacity, clamped to [0.1, 1.0] before use.
    pub opacity: f32,
    /// Watermark width as a ratio of the source's shorter dimension,
    /// clamped to [0.1, 1.0] before use.
    pub scale: f32,
    pub anchor: Anchor,
    /// Edge inset as a ratio of the source's shorter dimension.
    pub margin: f32,
    /// Allow resizing the watermark beyond its native resolution.
    pub allow_upscale: bool,
    pub resize_to: Option<ResizeBounds>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            opacity: 0.5,
            scale: 0.1,
            anchor: Anchor::BottomRight,
            margin: 0.02,
            allow_upscale: false,
            resize_to: None,
        }
    }
}

impl WatermarkConfig {
    pub const OPACITY_RANGE: (f32, f32) = (0.1, 1.0);
    pub const SCALE_RANGE: (f32, f32) = (0.1, 1.0);

    /// Copy of this config with opacity and scale clamped to their
    /// documented ranges.
    pub fn clamped(&self) -> Self {
        let mut config = self.clone();
        let opacity = config.opacity.clamp(Self::OPACITY_RANGE.0, Self::OPACITY_RANGE.1);
        let scale = config.scale.clamp(Self::SCALE_RANGE.0, Self::SCALE_RANGE.1);

        if opacity != config.opacity {
            tracing::debug!(
                "Clamped opacity from {} to {}",
                config.opacity,
                opacity
            );
        }
        if scale != config.scale {
            tracing::debug!("Clamped scale from {} to {}", config.scale, scale);
        }

        config.opacity = opacity;
        config.scale = scale;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_clamped_to_range() {
        for (input, expected) in [(0.0, 0.1), (-1.0, 0.1), (0.5, 0.5), (1.5, 1.0)] {
            let config = WatermarkConfig {
                opacity: input,
                ..Default::default()
            };
            assert_eq!(config.clamped().opacity, expected);
        }
    }

    #[test]
    fn test_scale_clamped_to_range() {
        for (input, expected) in [(0.01, 0.1), (0.25, 0.25), (2.0, 1.0)] {
            let config = WatermarkConfig {
                scale: input,
                ..Default::default()
            };
            assert_eq!(config.clamped().scale, expected);
        }
    }

    #[test]
    fn test_anchor_offsets() {
        let source = (1000, 800);
        let watermark = (200, 100);
        let margin = 16;

        assert_eq!(Anchor::TopLeft.offset(source, watermark, margin), (16, 16));
        assert_eq!(
            Anchor::TopRight.offset(source, watermark, margin),
            (784, 16)
        );
        assert_eq!(
            Anchor::BottomLeft.offset(source, watermark, margin),
            (16, 684)
        );
        assert_eq!(
            Anchor::BottomRight.offset(source, watermark, margin),
            (784, 684)
        );
        assert_eq!(Anchor::Center.offset(source, watermark, margin), (400, 350));
    }

    #[test]
    fn test_anchor_serde_names() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            anchor: Anchor,
        }

        let wrapper: Wrapper = toml_edit::de::from_str("anchor = \"bottom-right\"").unwrap();
        assert_eq!(wrapper.anchor, Anchor::BottomRight);
    }
}
