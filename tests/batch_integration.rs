use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use sukashi::batch::{self, BatchJob, ProgressSink, ProgressUpdate};
use sukashi::compositor::{Anchor, WatermarkConfig};
use sukashi::error::ProcessError;
use sukashi::formats::{FormatOptions, OutputFormat};

#[derive(Default)]
struct RecordingSink {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl ProgressSink for RecordingSink {
    fn file_done(&self, update: &ProgressUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}

fn write_test_image(path: &Path, width: u32, height: u32, color: Rgba<u8>) {
    let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(width, height, color));
    img.save(path).unwrap();
}

fn test_job(temp_dir: &TempDir, inputs: Vec<PathBuf>, options: FormatOptions) -> BatchJob {
    let watermark_path = temp_dir.path().join("watermark.png");
    if !watermark_path.exists() {
        write_test_image(&watermark_path, 80, 40, Rgba([0, 0, 0, 255]));
    }

    BatchJob {
        inputs,
        watermark_path,
        config: WatermarkConfig {
            opacity: 0.5,
            scale: 0.2,
            anchor: Anchor::BottomRight,
            margin: 0.02,
            allow_upscale: false,
            resize_to: None,
        },
        options,
        output_directory: temp_dir.path().join("out"),
        name_prefix: None,
    }
}

#[tokio::test]
async fn test_corrupt_file_does_not_abort_batch() {
    let temp_dir = TempDir::new().unwrap();

    let good_a = temp_dir.path().join("a.jpg");
    let corrupt = temp_dir.path().join("b.jpg");
    let good_c = temp_dir.path().join("c.jpg");
    write_test_image(&good_a, 400, 300, Rgba([200, 180, 160, 255]));
    std::fs::write(&corrupt, b"\xFF\xD8truncated garbage").unwrap();
    write_test_image(&good_c, 300, 400, Rgba([90, 120, 150, 255]));

    let job = test_job(
        &temp_dir,
        vec![good_a.clone(), corrupt.clone(), good_c.clone()],
        FormatOptions::Jpeg { quality: 85 },
    );
    let sink = Arc::new(RecordingSink::default());

    let result = batch::run(job, sink.clone(), CancellationToken::new())
        .await
        .expect("batch should start");

    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failed, 1);
    assert!(!result.cancelled);

    // Outcomes stay in input order and carry the typed reason.
    assert_eq!(result.outcomes[0].input, good_a);
    assert!(result.outcomes[0].succeeded());
    assert!(matches!(
        result.outcomes[1].result,
        Err(ProcessError::Decode(_))
    ));
    assert!(result.outcomes[2].succeeded());

    // Progress sink called exactly once per file, incrementally.
    let updates = sink.updates.lock().unwrap();
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].processed, 1);
    assert_eq!(updates[1].processed, 2);
    assert!(!updates[1].succeeded);
    assert_eq!(updates[2].processed, 3);
    assert_eq!(updates[2].success_count, 2);
    assert_eq!(updates[2].failure_count, 1);
    assert_eq!(updates[2].total, 3);
}

#[tokio::test]
async fn test_output_extension_matches_format() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("photo.png");
    write_test_image(&input, 200, 200, Rgba([10, 200, 10, 255]));

    let job = test_job(
        &temp_dir,
        vec![input],
        FormatOptions::Webp {
            quality: 80.0,
            lossless: false,
        },
    );

    let result = batch::run(
        job,
        Arc::new(batch::NullProgressSink),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let output = result.outcomes[0].result.as_ref().unwrap();
    assert_eq!(output.extension().unwrap(), "webp");
    assert!(output.exists());
    assert_eq!(image::open(output).unwrap().dimensions(), (200, 200));
}

#[tokio::test]
async fn test_name_collision_gets_numeric_suffix() {
    let temp_dir = TempDir::new().unwrap();
    let dir_a = temp_dir.path().join("a");
    let dir_b = temp_dir.path().join("b");
    std::fs::create_dir_all(&dir_a).unwrap();
    std::fs::create_dir_all(&dir_b).unwrap();

    let first = dir_a.join("photo.jpg");
    let second = dir_b.join("photo.jpg");
    write_test_image(&first, 200, 150, Rgba([255, 0, 0, 255]));
    write_test_image(&second, 200, 150, Rgba([0, 0, 255, 255]));

    let job = test_job(
        &temp_dir,
        vec![first, second],
        FormatOptions::Jpeg { quality: 85 },
    );
    let out_dir = job.output_directory.clone();

    let result = batch::run(
        job,
        Arc::new(batch::NullProgressSink),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(
        result.outcomes[0].result.as_ref().unwrap(),
        &out_dir.join("photo.jpg")
    );
    assert_eq!(
        result.outcomes[1].result.as_ref().unwrap(),
        &out_dir.join("photo_1.jpg")
    );
}

#[tokio::test]
async fn test_missing_watermark_fails_job_before_any_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("photo.jpg");
    write_test_image(&input, 100, 100, Rgba([128, 128, 128, 255]));

    let mut job = test_job(&temp_dir, vec![input], FormatOptions::Jpeg { quality: 85 });
    job.watermark_path = temp_dir.path().join("no-such-watermark.png");

    let sink = Arc::new(RecordingSink::default());
    let result = batch::run(job, sink.clone(), CancellationToken::new()).await;

    assert!(matches!(result, Err(ProcessError::InvalidConfig(_))));
    assert!(sink.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancellation_between_files() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("photo.jpg");
    write_test_image(&input, 100, 100, Rgba([128, 128, 128, 255]));

    let job = test_job(
        &temp_dir,
        vec![input.clone(), input.clone()],
        FormatOptions::Jpeg { quality: 85 },
    );

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = batch::run(job, Arc::new(batch::NullProgressSink), cancel)
        .await
        .unwrap();

    assert!(result.cancelled);
    assert_eq!(result.total(), 0);
}

#[tokio::test]
async fn test_png_output_round_trips_composited_pixels() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("flat.png");
    write_test_image(&input, 300, 300, Rgba([50, 60, 70, 255]));

    let job = test_job(
        &temp_dir,
        vec![input],
        FormatOptions::Png {
            compression: 6,
            filter: sukashi::formats::PngFilterStrategy::Adaptive,
        },
    );

    let result = batch::run(
        job,
        Arc::new(batch::NullProgressSink),
        CancellationToken::new(),
    )
    .await
    .unwrap();

    let output = result.outcomes[0].result.as_ref().unwrap();
    let decoded = image::open(output).unwrap();

    // Untouched corner survives the lossless round trip exactly.
    assert_eq!(decoded.get_pixel(0, 0), Rgba([50, 60, 70, 255]));
    // Bottom-right carries the blended watermark. The 80x40 watermark is
    // scaled to 60x30 and inset 6px, covering x 234..294, y 264..294.
    let marked = decoded.get_pixel(260, 280);
    assert_ne!(marked, Rgba([50, 60, 70, 255]));
}
