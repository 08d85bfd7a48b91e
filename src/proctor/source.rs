use std::fmt::Debug;

use bytes::Bytes;
use serde::Serialize;

/// A single captured image. Pixel layout is whatever the source and detector agree on.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

/// Bounding box of a detected face, in pixels. Only used for host overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Anything that yields an ordered sequence of frames: a capture device, a stream, a file.
pub trait FrameSource: Send + Debug {
    /// Human readable identifier used in logs and errors
    fn name(&self) -> String;

    /// Acquire the underlying device. The error string describes why it failed.
    fn open(&mut self) -> Result<(), String>;

    /// Next frame, or `None` once the source is exhausted or disconnected
    fn read_frame(&mut self) -> Option<Frame>;

    /// Give the device back. Must be safe to call more than once.
    fn release(&mut self);
}

/// Pluggable face detection backend (Haar cascade, ONNX, ...).
///
/// Implementations may keep tracking state across frames, hence `&mut self`.
pub trait FaceDetector: Send + Debug {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error + Send + Sync>>;
}
