use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::AIError;

pub mod mock;

pub use mock::*;

/// Low-level text generation client.
///
/// Implementors provide `ask_raw`, which executes a prompt and returns the raw
/// model text. Prompt construction and bookkeeping happen in `StudyAssistant`.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn LowLevelClient>;
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }
}
