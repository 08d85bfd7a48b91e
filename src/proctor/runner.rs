//! Host-side proctoring loop.
//!
//! Pulls frames from a [`FrameSource`], counts faces with a [`FaceDetector`], and feeds
//! the count into a [`Session`] once per frame. Pacing and cancellation live here so the
//! monitor itself stays a plain synchronous state machine.

use std::time::{Duration, Instant};

use futures_core::Stream;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ProctorConfig;
use crate::error::ProctorError;

use super::monitor::{AlertKind, AlertSnapshot, Session};
use super::source::{FaceBox, FaceDetector, FrameSource};

/// What the host renders for one frame
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub index: u64,
    pub faces: Vec<FaceBox>,
    pub snapshot: AlertSnapshot,
    /// Detection plus monitor time for this frame
    pub processing_time: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub deadline_misses: u64,
    pub worst_case: Duration,
    pub alerts_raised: u64,
}

impl LoopStats {
    fn record(&mut self, elapsed: Duration, budget: Duration, snapshot: &AlertSnapshot) {
        self.frames += 1;
        if elapsed > budget {
            self.deadline_misses += 1;
        }
        if elapsed > self.worst_case {
            self.worst_case = elapsed;
        }
        self.alerts_raised += snapshot.changes.iter().filter(|c| c.active).count() as u64;
    }
}

#[derive(Debug)]
pub struct ProctorLoop<S, D> {
    source: S,
    detector: D,
    session: Session,
    frame_budget: Duration,
}

impl<S, D> ProctorLoop<S, D>
where
    S: FrameSource + 'static,
    D: FaceDetector + 'static,
{
    /// Open the source and start a session. Fails with `SourceUnavailable` before any frame is read.
    pub fn start(mut source: S, detector: D, config: &ProctorConfig) -> Result<Self, ProctorError> {
        let session = Session::start(&mut source, config)?;
        Ok(Self {
            source,
            detector,
            session,
            frame_budget: config.frame_budget(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Drive the loop, yielding one report per frame.
    ///
    /// Ends when the source runs dry, `cancel` fires, or the detector fails (the failure
    /// is yielded as the last item). The session is stopped and the source released on
    /// every exit path.
    pub fn frames(self, cancel: CancellationToken) -> impl Stream<Item = Result<FrameReport, ProctorError>> {
        let Self { mut source, mut detector, mut session, frame_budget } = self;

        async_stream::stream! {
            let mut ticker = tokio::time::interval(frame_budget);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut stats = LoopStats::default();

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!("Proctoring cancelled by host");
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                let frame = match source.read_frame() {
                    Some(frame) => frame,
                    None => {
                        info!("Frame source exhausted");
                        break;
                    }
                };

                let started = Instant::now();
                let faces = match detector.detect(&frame) {
                    Ok(faces) => faces,
                    Err(e) => {
                        warn!(frame = frame.index, error = %e, "Face detection failed");
                        yield Err(ProctorError::Detection(e.to_string()));
                        break;
                    }
                };

                let snapshot = match session.process_frame(faces.len() as i64) {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };
                let processing_time = started.elapsed();
                stats.record(processing_time, frame_budget, &snapshot);

                for change in &snapshot.changes {
                    match (change.kind, change.active) {
                        (AlertKind::NotFacing, true) => warn!(frame = frame.index, "Face not detected for too long"),
                        (AlertKind::MultipleFaces, true) => warn!(frame = frame.index, faces = faces.len(), "Multiple faces detected"),
                        (kind, false) => info!(frame = frame.index, ?kind, "Alert cleared"),
                    }
                }

                yield Ok(FrameReport {
                    index: frame.index,
                    faces,
                    snapshot,
                    processing_time,
                });
            }

            session.stop();
            source.release();
            info!(
                frames = stats.frames,
                deadline_misses = stats.deadline_misses,
                worst_case_us = stats.worst_case.as_micros() as u64,
                alerts_raised = stats.alerts_raised,
                "Proctoring loop finished"
            );
        }
    }
}
