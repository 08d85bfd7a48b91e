use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;

use super::source::{FaceBox, FaceDetector, Frame, FrameSource};

/// Frame source that replays a fixed number of blank frames.
#[derive(Debug)]
pub struct ScriptedSource {
    remaining: u64,
    next_index: u64,
    open_error: Option<String>,
    opened: bool,
    released: Arc<AtomicBool>,
}

impl ScriptedSource {
    /// A source producing one frame per entry in `face_counts`.
    ///
    /// The counts themselves are consumed by [`ScriptedDetector::new`]; only the length matters here.
    pub fn new(face_counts: Vec<i64>) -> Self {
        Self::with_frames(face_counts.len() as u64)
    }

    pub fn with_frames(frames: u64) -> Self {
        Self {
            remaining: frames,
            next_index: 0,
            open_error: None,
            opened: false,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A source whose `open` always fails
    pub fn unavailable(reason: &str) -> Self {
        Self {
            open_error: Some(reason.to_string()),
            ..Self::with_frames(0)
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.next_index
    }

    /// Flag that flips once `release` has been called; survives moving the source
    pub fn release_flag(&self) -> Arc<AtomicBool> {
        self.released.clone()
    }
}

impl FrameSource for ScriptedSource {
    fn name(&self) -> String {
        "scripted".to_string()
    }

    fn open(&mut self) -> Result<(), String> {
        if let Some(reason) = &self.open_error {
            return Err(reason.clone());
        }
        self.opened = true;
        Ok(())
    }

    fn read_frame(&mut self) -> Option<Frame> {
        if !self.opened || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let frame = Frame {
            index: self.next_index,
            width: 4,
            height: 4,
            data: Bytes::from_static(&[0; 16]),
        };
        self.next_index += 1;
        Some(frame)
    }

    fn release(&mut self) {
        self.opened = false;
        self.released.store(true, Ordering::SeqCst);
    }
}

/// Detector that reports a scripted face count per frame.
///
/// A negative entry is reported as a detection failure.
#[derive(Debug, Default)]
pub struct ScriptedDetector {
    counts: VecDeque<i64>,
}

impl ScriptedDetector {
    pub fn new(counts: Vec<i64>) -> Self {
        Self { counts: counts.into() }
    }
}

impl FaceDetector for ScriptedDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error + Send + Sync>> {
        let count = self.counts.pop_front().unwrap_or(1);
        if count < 0 {
            return Err(format!("detector failed on frame {}", frame.index).into());
        }
        Ok((0..count as u32)
            .map(|i| FaceBox { x: i * 10, y: 0, width: 8, height: 8 })
            .collect())
    }
}
