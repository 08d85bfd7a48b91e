use std::time::{Duration, Instant};

use eduace::config::ProctorConfig;
use eduace::error::ProctorError;
use eduace::proctor::{
    AlertKind, AlertSnapshot, FrameObservation, ProctorLoop, ScriptedDetector, ScriptedSource, Session, SessionState,
};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

fn replay(timeline: &[(f64, i64)]) -> Vec<AlertSnapshot> {
    let mut source = ScriptedSource::with_frames(timeline.len() as u64);
    let mut session = Session::start(&mut source, &ProctorConfig::default()).unwrap();
    let base = Instant::now();
    timeline
        .iter()
        .map(|&(t, count)| {
            let obs = FrameObservation::new(count, base + Duration::from_secs_f64(t)).unwrap();
            session.observe(obs).unwrap()
        })
        .collect()
}

#[test]
fn absence_alert_raised_once_then_cleared() {
    let snaps = replay(&[(0.0, 0), (2.0, 0), (6.0, 0), (6.1, 1)]);

    let raised_at: Vec<_> = snaps
        .iter()
        .enumerate()
        .filter(|(_, s)| s.raised(AlertKind::NotFacing))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(raised_at, vec![2]);
    assert!(snaps[2].not_facing_alert_active);
    assert!(!snaps[3].not_facing_alert_active);
    assert_eq!(snaps[2].zero_face_duration, Some(Duration::from_secs(6)));
    assert_eq!(snaps[3].zero_face_duration, None);
}

#[test]
fn crowd_then_single_face() {
    let snaps = replay(&[(0.0, 2), (0.1, 2), (0.2, 1)]);
    let flags: Vec<_> = snaps.iter().map(|s| s.multiple_faces_alert_active).collect();
    assert_eq!(flags, vec![true, true, false]);
}

#[test]
fn steady_candidate_stays_clear() {
    let timeline: Vec<_> = (0..100).map(|i| (i as f64 * 0.2, 1)).collect();
    for snap in replay(&timeline) {
        assert!(!snap.not_facing_alert_active);
        assert!(!snap.multiple_faces_alert_active);
    }
}

#[test]
fn long_absence_holds_until_face_returns() {
    let mut timeline: Vec<_> = (0..=40).map(|i| (i as f64 * 0.25, 0)).collect();
    timeline.push((10.5, 2));
    timeline.push((11.0, 0));
    timeline.push((11.5, 1));
    let snaps = replay(&timeline);

    let raises = snaps.iter().filter(|s| s.raised(AlertKind::NotFacing)).count();
    assert_eq!(raises, 1);
    // still raised through the multi-face frame and the following empty frame
    let tail: Vec<_> = snaps[snaps.len() - 3..].iter().map(|s| s.not_facing_alert_active).collect();
    assert_eq!(tail, vec![true, true, false]);
}

#[test]
fn stopped_session_rejects_frames() {
    let mut source = ScriptedSource::with_frames(1);
    let mut session = Session::start(&mut source, &ProctorConfig::default()).unwrap();
    session.stop();
    assert_eq!(session.state(), SessionState::Stopped);
    assert!(matches!(session.process_frame(1), Err(ProctorError::SessionClosed)));
    assert!(matches!(session.process_frame(0), Err(ProctorError::SessionClosed)));
}

#[test]
fn unopenable_camera_reports_source_unavailable() {
    let mut source = ScriptedSource::unavailable("device busy");
    let err = Session::start(&mut source, &ProctorConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "Frame source 'scripted' unavailable: device busy");
}

#[tokio::test]
async fn live_loop_with_short_threshold() {
    // 0 faces for ~60ms at 1ms pacing against a 20ms threshold
    let mut counts = vec![0; 60];
    counts.push(1);
    let config = ProctorConfig::default()
        .with_target_fps(1000)
        .with_threshold(Duration::from_millis(20));
    let proctor = ProctorLoop::start(
        ScriptedSource::new(counts.clone()),
        ScriptedDetector::new(counts),
        &config,
    )
    .unwrap();

    let reports: Vec<_> = proctor
        .frames(CancellationToken::new())
        .map(|r| r.unwrap())
        .collect()
        .await;

    assert_eq!(reports.len(), 61);
    let raises = reports
        .iter()
        .filter(|r| r.snapshot.raised(AlertKind::NotFacing))
        .count();
    assert_eq!(raises, 1);
    let last = reports.last().unwrap();
    assert!(last.snapshot.cleared(AlertKind::NotFacing));
    assert!(!last.snapshot.not_facing_alert_active);
}
