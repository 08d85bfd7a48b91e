//! Face-presence monitor: turns per-frame face counts into two alert signals.
//!
//! - **not facing**: debounced. Raised once when zero faces persist longer than the
//!   configured threshold, cleared by the next frame with exactly one face.
//! - **multiple faces**: instantaneous. Reflects only the latest observation.
//!
//! A [`Session`] is single-writer: every transition takes `&mut self`, so callers
//! sharing one across threads must serialize access themselves.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::ProctorConfig;
use crate::error::ProctorError;

use super::source::FrameSource;

/// One processed video frame, reduced to what the monitor needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameObservation {
    pub face_count: u32,
    pub timestamp: Instant,
}

impl FrameObservation {
    /// Validate a raw detector count. Negative counts are a collaborator bug.
    pub fn new(face_count: i64, timestamp: Instant) -> Result<Self, ProctorError> {
        let face_count = u32::try_from(face_count).map_err(|_| {
            ProctorError::InvalidObservation(format!("face count must be non-negative, got {face_count}"))
        })?;
        Ok(Self { face_count, timestamp })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    NotFacing,
    MultipleFaces,
}

/// An alert edge produced by a single transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertChange {
    pub kind: AlertKind,
    pub active: bool,
}

/// Alert state immediately after a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSnapshot {
    pub not_facing_alert_active: bool,
    pub multiple_faces_alert_active: bool,
    /// How long the current zero-face run has lasted, if one is in progress
    pub zero_face_duration: Option<Duration>,
    /// Edges produced by this transition; empty when nothing changed
    pub changes: Vec<AlertChange>,
}

impl AlertSnapshot {
    pub fn raised(&self, kind: AlertKind) -> bool {
        self.changes.iter().any(|c| c.kind == kind && c.active)
    }

    pub fn cleared(&self, kind: AlertKind) -> bool {
        self.changes.iter().any(|c| c.kind == kind && !c.active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    pub zero_face_since: Option<Instant>,
    pub not_facing_alert_active: bool,
    pub multiple_faces_alert_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Stopped,
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    monitor: MonitorState,
    threshold: Duration,
    source_name: Option<String>,
    last_timestamp: Option<Instant>,
    frames_seen: u64,
}

impl Session {
    /// Open `source` and begin a session with a fresh monitor.
    ///
    /// Nothing else happens when the source cannot be opened: no session is created
    /// and the source is not read.
    #[instrument(skip_all, fields(source = %source.name()))]
    pub fn start<S>(source: &mut S, config: &ProctorConfig) -> Result<Self, ProctorError>
    where
        S: FrameSource + ?Sized,
    {
        source.open().map_err(|reason| ProctorError::SourceUnavailable {
            name: source.name(),
            reason,
        })?;

        info!(threshold_ms = config.not_facing_threshold.as_millis() as u64, "Proctoring session started");
        Ok(Self {
            state: SessionState::Active,
            monitor: MonitorState::default(),
            threshold: config.not_facing_threshold,
            source_name: Some(source.name()),
            last_timestamp: None,
            frames_seen: 0,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn monitor(&self) -> &MonitorState {
        &self.monitor
    }

    /// Name of the frame source while the session is active
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Apply one raw detector count, stamped with the current instant
    pub fn process_frame(&mut self, face_count: i64) -> Result<AlertSnapshot, ProctorError> {
        self.ensure_active()?;
        let observation = FrameObservation::new(face_count, Instant::now())?;
        self.observe(observation)
    }

    /// Apply one observation with a caller-supplied timestamp.
    ///
    /// Timestamps must be non-decreasing across calls.
    pub fn observe(&mut self, observation: FrameObservation) -> Result<AlertSnapshot, ProctorError> {
        self.ensure_active()?;
        if let Some(last) = self.last_timestamp {
            if observation.timestamp < last {
                return Err(ProctorError::InvalidObservation(
                    "timestamp earlier than previous observation".to_string(),
                ));
            }
        }
        self.last_timestamp = Some(observation.timestamp);
        self.frames_seen += 1;

        let now = observation.timestamp;
        let mut changes = Vec::new();

        match observation.face_count {
            0 => {
                let since = *self.monitor.zero_face_since.get_or_insert(now);
                if now.duration_since(since) > self.threshold && !self.monitor.not_facing_alert_active {
                    self.monitor.not_facing_alert_active = true;
                    changes.push(AlertChange { kind: AlertKind::NotFacing, active: true });
                }
            }
            1 => {
                self.monitor.zero_face_since = None;
                if self.monitor.not_facing_alert_active {
                    self.monitor.not_facing_alert_active = false;
                    changes.push(AlertChange { kind: AlertKind::NotFacing, active: false });
                }
                if self.monitor.multiple_faces_alert_active {
                    self.monitor.multiple_faces_alert_active = false;
                    changes.push(AlertChange { kind: AlertKind::MultipleFaces, active: false });
                }
            }
            // zero-face timer is left running here
            _ => {
                if !self.monitor.multiple_faces_alert_active {
                    self.monitor.multiple_faces_alert_active = true;
                    changes.push(AlertChange { kind: AlertKind::MultipleFaces, active: true });
                }
            }
        }

        if !changes.is_empty() {
            debug!(face_count = observation.face_count, ?changes, "Alert state changed");
        }

        Ok(AlertSnapshot {
            not_facing_alert_active: self.monitor.not_facing_alert_active,
            multiple_faces_alert_active: self.monitor.multiple_faces_alert_active,
            zero_face_duration: self.monitor.zero_face_since.map(|since| now.duration_since(since)),
            changes,
        })
    }

    /// End the session. Calling this again on a stopped session is a no-op.
    pub fn stop(&mut self) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.state = SessionState::Stopped;
        self.monitor = MonitorState::default();
        let source = self.source_name.take();
        info!(source = ?source, frames = self.frames_seen, "Proctoring session stopped");
    }

    fn ensure_active(&self) -> Result<(), ProctorError> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Stopped => Err(ProctorError::SessionClosed),
        }
    }
}
