use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProctorConfig;
use crate::error::ProctorError;

use super::monitor::{AlertSnapshot, FrameObservation, Session};
use super::scripted::ScriptedSource;
use super::source::FrameSource;

/// One line of a recorded timeline: seconds since the start and the detector's raw count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub at_secs: f64,
    pub face_count: i64,
}

/// Parse a JSON timeline (`[{"at_secs": 0.0, "face_count": 1}, ...]`)
pub fn parse_timeline(json: &str) -> Result<Vec<ReplayEntry>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Run a recorded timeline through a fresh session, one snapshot per entry.
///
/// Stops at the first rejected entry: negative or non-finite offsets, negative face
/// counts, and offsets earlier than the previous entry are all `InvalidObservation`.
pub fn replay(entries: &[ReplayEntry], config: &ProctorConfig) -> Result<Vec<AlertSnapshot>, ProctorError> {
    let mut source = ScriptedSource::with_frames(entries.len() as u64);
    let mut session = Session::start(&mut source, config)?;
    let base = Instant::now();

    let result = entries
        .iter()
        .map(|entry| {
            let offset = Duration::try_from_secs_f64(entry.at_secs).map_err(|_| {
                ProctorError::InvalidObservation(format!("invalid timestamp: {}", entry.at_secs))
            })?;
            let observation = FrameObservation::new(entry.face_count, base + offset)?;
            session.observe(observation)
        })
        .collect::<Result<Vec<_>, _>>();

    session.stop();
    source.release();
    debug!(entries = entries.len(), ok = result.is_ok(), "Replay finished");
    result
}
