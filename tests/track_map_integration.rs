// Integration test for circuit payload to SVG file

use f1lab::track_map::{TRACK_PADDING, TrackMapGenerator, TrackProjection, project};
use f1lab::{CircuitGeometry, writer};
use tempfile::TempDir;

const MONACO_PAYLOAD: &str = r#"{
    "track": [[0.0, 0.0], [1200.0, 0.0], [1200.0, 800.0], [0.0, 800.0], [0.0, 0.0]],
    "corners": [
        {"number": 1, "letter": "", "x": 1200.0, "y": 0.0, "angle": 90.0},
        {"number": 3, "letter": "a", "x": 1200.0, "y": 800.0, "angle": null}
    ],
    "location": "Monte Carlo"
}"#;

#[test]
fn test_circuit_payload_to_svg_file() {
    let circuit: CircuitGeometry = serde_json::from_str(MONACO_PAYLOAD).unwrap();
    let projection = project(Some(&circuit));
    let scene = projection.scene().expect("circuit has geometry");

    assert_eq!(scene.title, "Monte Carlo");
    assert_eq!(scene.polyline.len(), 5);
    assert_eq!(scene.markers.len(), 2);
    assert_eq!(scene.markers[1].label, "3a");
    // y is flipped: the corner at y=800 ends up at -800
    assert_eq!(scene.markers[1].position.y, -800.0);

    let view_box = scene.view_box;
    assert_eq!(view_box.min_x, -TRACK_PADDING);
    assert_eq!(view_box.min_y, -800.0 - TRACK_PADDING);
    assert_eq!(view_box.width, 1200.0 + 2.0 * TRACK_PADDING);
    assert_eq!(view_box.height, 800.0 + 2.0 * TRACK_PADDING);

    let svg = TrackMapGenerator::new().generate_svg(scene).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("monaco.svg");
    writer::write_svg(&path, &svg).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains(r#"viewBox="-80 -880 1360 960""#));
    assert!(written.contains("Track Map — Monte Carlo"));
    assert!(written.contains(">3a<"));
}

#[test]
fn test_backend_error_payload_has_no_scene() {
    let circuit: CircuitGeometry =
        serde_json::from_str(r#"{"error": "Circuit info not available"}"#).unwrap();
    assert_eq!(project(Some(&circuit)), TrackProjection::NoData);
    assert_eq!(project(None), TrackProjection::NoData);
}
