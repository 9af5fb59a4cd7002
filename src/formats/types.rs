use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    Tiff,
    Webp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            "webp" => Some(OutputFormat::Webp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    None,
    Lzw,
    Deflate,
    Packbits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngFilterStrategy {
    None,
    Adaptive,
}

/// Encode parameters for the selected output format. Exactly one variant
/// is active per batch run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatOptions {
    Jpeg {
        /// 1-100
        quality: u8,
    },
    Png {
        /// 0-9, mapped onto the png crate's compression presets
        compression: u8,
        filter: PngFilterStrategy,
    },
    Tiff {
        compression: TiffCompression,
    },
    Webp {
        quality: f32,
        lossless: bool,
    },
}

impl FormatOptions {
    pub fn format(&self) -> OutputFormat {
        match self {
            FormatOptions::Jpeg { .. } => OutputFormat::Jpeg,
            FormatOptions::Png { .. } => OutputFormat::Png,
            FormatOptions::Tiff { .. } => OutputFormat::Tiff,
            FormatOptions::Webp { .. } => OutputFormat::Webp,
        }
    }
}
