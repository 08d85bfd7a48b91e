pub mod answers;
pub mod archive;
pub mod clients;
pub mod config;
pub mod error;
pub mod proctor;
pub mod prompts;
pub mod speech;
pub mod store;
pub mod study;

// Convenient re-exports
pub use answers::{AnswerSheet, Submission};
pub use proctor::{AlertSnapshot, FrameObservation, ProctorLoop, Session};
pub use store::StudyStore;
pub use study::StudyAssistant;
