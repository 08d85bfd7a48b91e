pub mod monitor;
pub mod replay;
pub mod runner;
pub mod scripted;
pub mod source;

pub use monitor::{AlertChange, AlertKind, AlertSnapshot, FrameObservation, MonitorState, Session, SessionState};
pub use replay::{parse_timeline, replay, ReplayEntry};
pub use runner::{FrameReport, LoopStats, ProctorLoop};
pub use scripted::{ScriptedDetector, ScriptedSource};
pub use source::{FaceBox, FaceDetector, Frame, FrameSource};
