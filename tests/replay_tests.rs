use std::path::Path;

use eduace::config::ProctorConfig;
use eduace::error::ProctorError;
use eduace::proctor::{parse_timeline, replay, AlertKind, ReplayEntry};

fn demo_timeline() -> Vec<ReplayEntry> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/absence_timeline.json");
    let raw = std::fs::read_to_string(path).unwrap();
    parse_timeline(&raw).unwrap()
}

#[test]
fn demo_timeline_replays() {
    let entries = demo_timeline();
    let snaps = replay(&entries, &ProctorConfig::default()).unwrap();
    assert_eq!(snaps.len(), entries.len());

    let not_facing: Vec<_> = snaps.iter().map(|s| s.not_facing_alert_active).collect();
    assert_eq!(not_facing, vec![false, false, true, false, false, false, false]);
    let multiple: Vec<_> = snaps.iter().map(|s| s.multiple_faces_alert_active).collect();
    assert_eq!(multiple, vec![false, false, false, false, true, true, false]);

    assert_eq!(snaps.iter().filter(|s| s.raised(AlertKind::NotFacing)).count(), 1);
    assert_eq!(snaps.iter().filter(|s| s.raised(AlertKind::MultipleFaces)).count(), 1);
}

#[test]
fn negative_face_count_rejected() {
    let entries = parse_timeline(r#"[{"at_secs": 0.0, "face_count": 1}, {"at_secs": 1.0, "face_count": -2}]"#).unwrap();
    let err = replay(&entries, &ProctorConfig::default()).unwrap_err();
    assert!(matches!(err, ProctorError::InvalidObservation(_)));
}

#[test]
fn decreasing_offsets_rejected() {
    let entries = parse_timeline(r#"[{"at_secs": 3.0, "face_count": 0}, {"at_secs": 2.0, "face_count": 0}]"#).unwrap();
    let err = replay(&entries, &ProctorConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "Invalid observation: timestamp earlier than previous observation");
}

#[test]
fn json_lines_carry_snapshot_fields() {
    let entries = demo_timeline();
    let snaps = replay(&entries, &ProctorConfig::default()).unwrap();
    let value = serde_json::to_value(&snaps[2]).unwrap();
    assert_eq!(value["not_facing_alert_active"], true);
    assert_eq!(value["changes"][0]["kind"], "not_facing");
    assert_eq!(value["changes"][0]["active"], true);
}
