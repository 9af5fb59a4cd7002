// Compositor - overlays a watermark onto a single source image
mod compose;
mod types;

pub use compose::{compose, watermark_geometry, WatermarkPlacement};
pub use types::{Anchor, ResizeBounds, WatermarkConfig};
