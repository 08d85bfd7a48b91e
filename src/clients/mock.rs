use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use super::LowLevelClient;
use crate::error::AIError;

#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(String),
}

/// Shared control surface for a [`MockClient`]: queue responses, inspect prompts.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    prompts: Mutex<Vec<String>>,
}

impl MockHandle {
    pub fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
    }

    pub fn push_text(&self, text: &str) {
        self.push(MockResponse::Success(text.to_string()));
    }

    /// Every prompt received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Client that answers from a queue of canned responses.
///
/// An empty queue answers with an empty string.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        Self::with_responses(Vec::new())
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        });
        (Self { handle: handle.clone() }, handle)
    }
}

#[async_trait]
impl LowLevelClient for MockClient {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        debug!(prompt_len = prompt.len(), "Mock client received prompt");
        self.handle.prompts.lock().unwrap_or_else(PoisonError::into_inner).push(prompt);

        let next = self.handle.responses.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        match next {
            Some(MockResponse::Success(text)) => Ok(text),
            Some(MockResponse::Error(message)) => Err(AIError::Mock(message)),
            None => Ok(String::new()),
        }
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
