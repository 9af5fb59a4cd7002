use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod batch;
pub mod compositor;
pub mod error;
pub mod formats;

use compositor::{Anchor, ResizeBounds, WatermarkConfig};
use formats::{FormatOptions, OutputFormat, PngFilterStrategy, TiffCompression};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputSection,
    pub watermark: WatermarkSection,
    pub output: OutputSection,
    #[serde(default)]
    pub formats: FormatsSection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputSection {
    /// Directory scanned for input images when none are given on the
    /// command line.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatermarkSection {
    pub image: PathBuf,
    pub opacity: f32,
    pub scale: f32,
    pub anchor: Anchor,
    /// Inset from the anchored edges, as a ratio of the source image's
    /// shorter dimension.
    #[serde(default = "default_margin")]
    pub margin: f32,
    #[serde(default)]
    pub allow_upscale: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSection {
    pub directory: PathBuf,
    pub format: OutputFormat,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub max_height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormatsSection {
    #[serde(default)]
    pub jpeg: JpegSection,
    #[serde(default)]
    pub png: PngSection,
    #[serde(default)]
    pub tiff: TiffSection,
    #[serde(default)]
    pub webp: WebpSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JpegSection {
    pub quality: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PngSection {
    pub compression: u8,
    pub adaptive_filter: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TiffSection {
    pub compression: TiffCompression,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebpSection {
    pub quality: f32,
    pub lossless: bool,
}

fn default_margin() -> f32 {
    0.02
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputSection::default(),
            watermark: WatermarkSection {
                image: PathBuf::from("watermark.png"),
                opacity: 0.5,
                scale: 0.1,
                anchor: Anchor::BottomRight,
                margin: default_margin(),
                allow_upscale: false,
            },
            output: OutputSection {
                directory: PathBuf::from("watermarked"),
                format: OutputFormat::Jpeg,
                prefix: None,
                max_width: None,
                max_height: None,
            },
            formats: FormatsSection::default(),
        }
    }
}

impl Default for JpegSection {
    fn default() -> Self {
        Self { quality: 85 }
    }
}

impl Default for PngSection {
    fn default() -> Self {
        Self {
            compression: 6,
            adaptive_filter: true,
        }
    }
}

impl Default for TiffSection {
    fn default() -> Self {
        Self {
            compression: TiffCompression::Lzw,
        }
    }
}

impl Default for WebpSection {
    fn default() -> Self {
        Self {
            quality: 80.0,
            lossless: false,
        }
    }
}

impl Config {
    /// Build the compositor configuration from the watermark and output
    /// sections.
    pub fn watermark_config(&self) -> WatermarkConfig {
        let resize_to = match (self.output.max_width, self.output.max_height) {
            (None, None) => None,
            (w, h) => Some(ResizeBounds {
                max_width: w.unwrap_or(u32::MAX),
                max_height: h.unwrap_or(u32::MAX),
            }),
        };

        WatermarkConfig {
            opacity: self.watermark.opacity,
            scale: self.watermark.scale,
            anchor: self.watermark.anchor,
            margin: self.watermark.margin,
            allow_upscale: self.watermark.allow_upscale,
            resize_to,
        }
    }

    /// Encode parameters for the selected output format.
    pub fn format_options(&self) -> FormatOptions {
        match self.output.format {
            OutputFormat::Jpeg => FormatOptions::Jpeg {
                quality: self.formats.jpeg.quality,
            },
            OutputFormat::Png => FormatOptions::Png {
                compression: self.formats.png.compression,
                filter: if self.formats.png.adaptive_filter {
                    PngFilterStrategy::Adaptive
                } else {
                    PngFilterStrategy::None
                },
            },
            OutputFormat::Tiff => FormatOptions::Tiff {
                compression: self.formats.tiff.compression,
            },
            OutputFormat::Webp => FormatOptions::Webp {
                quality: self.formats.webp.quality,
                lossless: self.formats.webp.lossless,
            },
        }
    }
}
