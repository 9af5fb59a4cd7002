use crate::formats::webp;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba};
use tempfile::TempDir;

fn test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 32, 255])
    }))
}

#[test]
fn test_lossy_preserves_dimensions() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lossy.webp");

    let img = test_image(320, 200);
    webp::save(&img, &path, 80.0, false).unwrap();

    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.dimensions(), (320, 200));
}

#[test]
fn test_lossless_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lossless.webp");

    let img = test_image(100, 100);
    webp::save(&img, &path, 80.0, true).unwrap();

    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.to_rgba8(), img.to_rgba8());
}

#[test]
fn test_output_is_webp_container() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("container.webp");

    webp::save(&test_image(16, 16), &path, 75.0, false).unwrap();

    let data = std::fs::read(&path).unwrap();
    assert_eq!(&data[0..4], b"RIFF");
    assert_eq!(&data[8..12], b"WEBP");
}
