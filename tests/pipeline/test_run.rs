use image::{DynamicImage, Rgb, RgbImage};
use labelview::{
    run_once, BoundingBoxInstance, DetectError, DetectionLabel, MockLabelDetector,
    MockObjectStore, OverlayError, OverlayOptions, OverlayRenderer, RunRequest, StorageError,
};
use std::io::Cursor;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([40, 90, 160]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encoding a fresh raster never fails");
    bytes
}

fn request() -> RunRequest {
    RunRequest {
        bucket: "photos".to_string(),
        key: "scene.png".to_string(),
        max_labels: 10,
        inline_bytes: false,
    }
}

fn person_label() -> DetectionLabel {
    DetectionLabel {
        name: "Person".to_string(),
        confidence: 97.5,
        instances: vec![BoundingBoxInstance {
            left: 0.1,
            top: 0.2,
            width: 0.3,
            height: 0.4,
        }],
    }
}

async fn seeded_store(width: u32, height: u32) -> MockObjectStore {
    let store = MockObjectStore::new();
    store.put("photos", "scene.png", png_bytes(width, height)).await;
    store
}

#[tokio::test]
async fn test_single_person_scenario() {
    let store = seeded_store(1000, 500).await;
    let detector = MockLabelDetector::with_labels(vec![person_label()]);
    let renderer = OverlayRenderer::new(OverlayOptions::default());

    let report = run_once(&request(), &store, &detector, &renderer)
        .await
        .unwrap();

    assert_eq!(report.labels.len(), 1);
    assert_eq!(report.annotated.dimensions(), (1000, 500));
    assert_eq!(report.summary, "Label: Person\nConfidence: 97.50%\n");

    // Rectangle lands at (100, 100) sized (300, 200)
    let expected = labelview::overlay::color_for_label("Person");
    assert_eq!(*report.annotated.get_pixel(100, 100), expected);
    assert_eq!(*report.annotated.get_pixel(400, 300), expected);
    // Interior stays untouched
    assert_eq!(*report.annotated.get_pixel(250, 200), Rgb([40, 90, 160]));
}

#[tokio::test]
async fn test_zero_labels_leaves_image_unmodified() {
    let store = seeded_store(64, 48).await;
    let detector = MockLabelDetector::new();
    let renderer = OverlayRenderer::new(OverlayOptions::default());

    let report = run_once(&request(), &store, &detector, &renderer)
        .await
        .unwrap();

    assert!(report.labels.is_empty());
    assert!(report.summary.is_empty());

    let base = image::load_from_memory(&png_bytes(64, 48)).unwrap().to_rgb8();
    assert_eq!(report.annotated.as_raw(), base.as_raw());
}

#[tokio::test]
async fn test_missing_object_fails_the_run() {
    let store = MockObjectStore::new();
    let detector = MockLabelDetector::new();
    let renderer = OverlayRenderer::new(OverlayOptions::default());

    let err = run_once(&request(), &store, &detector, &renderer)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StorageError>(),
        Some(StorageError::NotFound { .. })
    ));
    // Fail-fast: the detector was never invoked
    assert_eq!(detector.call_count().await, 0);
}

#[tokio::test]
async fn test_detector_error_fails_the_run() {
    let store = seeded_store(64, 48).await;
    let detector = MockLabelDetector::new();
    detector
        .inject_error(DetectError::Invocation("endpoint unreachable".to_string()))
        .await;
    let renderer = OverlayRenderer::new(OverlayOptions::default());

    let err = run_once(&request(), &store, &detector, &renderer)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DetectError>(),
        Some(DetectError::Invocation(_))
    ));
}

#[tokio::test]
async fn test_invalid_bounding_box_fails_the_run() {
    let store = seeded_store(64, 48).await;
    let detector = MockLabelDetector::with_labels(vec![DetectionLabel {
        name: "Person".to_string(),
        confidence: 90.0,
        instances: vec![BoundingBoxInstance {
            left: 1.2,
            top: 0.0,
            width: 0.1,
            height: 0.1,
        }],
    }]);
    let renderer = OverlayRenderer::new(OverlayOptions::default());

    let err = run_once(&request(), &store, &detector, &renderer)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OverlayError>(),
        Some(OverlayError::InvalidBoundingBox { .. })
    ));
}

#[tokio::test]
async fn test_undecodable_bytes_fail_the_run() {
    let store = MockObjectStore::new();
    store
        .put("photos", "scene.png", b"definitely not an image".to_vec())
        .await;
    let detector = MockLabelDetector::new();
    let renderer = OverlayRenderer::new(OverlayOptions::default());

    let err = run_once(&request(), &store, &detector, &renderer)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to decode"));
    assert_eq!(detector.call_count().await, 0);
}

#[tokio::test]
async fn test_inline_bytes_mode_runs() {
    let store = seeded_store(64, 48).await;
    let detector = MockLabelDetector::with_labels(vec![person_label()]);
    let renderer = OverlayRenderer::new(OverlayOptions::default());

    let request = RunRequest {
        inline_bytes: true,
        ..request()
    };
    let report = run_once(&request, &store, &detector, &renderer)
        .await
        .unwrap();

    assert_eq!(report.labels.len(), 1);
    assert_eq!(detector.call_count().await, 1);
}

#[tokio::test]
async fn test_annotated_image_saves_to_disk() {
    let store = seeded_store(64, 48).await;
    let detector = MockLabelDetector::with_labels(vec![person_label()]);
    let renderer = OverlayRenderer::new(OverlayOptions::default());

    let report = run_once(&request(), &store, &detector, &renderer)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labeled.png");
    report.annotated.save(&path).unwrap();

    let reloaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(reloaded.as_raw(), report.annotated.as_raw());
}
