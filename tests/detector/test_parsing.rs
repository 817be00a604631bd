use labelview::detector::types::parse_detect_labels;
use labelview::DetectError;

#[test]
fn test_parse_full_payload() {
    let payload = r#"{
        "Labels": [
            {
                "Name": "Person",
                "Confidence": 97.5,
                "Instances": [
                    {"BoundingBox": {"Left": 0.1, "Top": 0.2, "Width": 0.3, "Height": 0.4}}
                ]
            },
            {
                "Name": "Sky",
                "Confidence": 99.1,
                "Instances": []
            }
        ]
    }"#;

    let labels = parse_detect_labels(payload).unwrap();
    assert_eq!(labels.len(), 2);

    assert_eq!(labels[0].name, "Person");
    assert!((labels[0].confidence - 97.5).abs() < 1e-4);
    assert_eq!(labels[0].instances.len(), 1);
    assert!((labels[0].instances[0].left - 0.1).abs() < 1e-6);
    assert!((labels[0].instances[0].height - 0.4).abs() < 1e-6);

    assert!(labels[1].instances.is_empty());
}

#[test]
fn test_parse_keeps_endpoint_order() {
    let payload = r#"{"Labels": [
        {"Name": "B", "Confidence": 10.0},
        {"Name": "A", "Confidence": 90.0}
    ]}"#;

    let labels = parse_detect_labels(payload).unwrap();
    let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn test_missing_instances_field_means_image_level_label() {
    let payload = r#"{"Labels": [{"Name": "Outdoors", "Confidence": 88.0}]}"#;

    let labels = parse_detect_labels(payload).unwrap();
    assert!(labels[0].instances.is_empty());
}

#[test]
fn test_missing_confidence_is_malformed() {
    let payload = r#"{"Labels": [{"Name": "Person"}]}"#;

    let err = parse_detect_labels(payload).unwrap_err();
    assert!(matches!(err, DetectError::MalformedResponse(_)));
}

#[test]
fn test_missing_bounding_box_field_is_malformed() {
    let payload = r#"{"Labels": [{
        "Name": "Person",
        "Confidence": 50.0,
        "Instances": [{"BoundingBox": {"Left": 0.1, "Top": 0.2, "Width": 0.3}}]
    }]}"#;

    let err = parse_detect_labels(payload).unwrap_err();
    assert!(matches!(err, DetectError::MalformedResponse(_)));
}

#[test]
fn test_non_json_payload_is_malformed() {
    let err = parse_detect_labels("<html>gateway timeout</html>").unwrap_err();
    assert!(matches!(err, DetectError::MalformedResponse(_)));
}

#[test]
fn test_confidence_out_of_range_is_malformed() {
    let payload = r#"{"Labels": [{"Name": "Person", "Confidence": 150.0}]}"#;

    let err = parse_detect_labels(payload).unwrap_err();
    assert!(matches!(err, DetectError::MalformedResponse(_)));
}

#[test]
fn test_empty_label_list_parses() {
    let labels = parse_detect_labels(r#"{"Labels": []}"#).unwrap();
    assert!(labels.is_empty());
}
