use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SpeechError;

/// Text-to-speech backend. Returns encoded audio (MP3 for the stock providers).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, SpeechError>;
}

/// Synthesizer that echoes the text back as bytes. Useful in tests and offline demos.
#[derive(Debug, Clone, Default)]
pub struct EchoSynthesizer;

#[async_trait]
impl SpeechSynthesizer for EchoSynthesizer {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::Synthesis("nothing to say".to_string()));
        }
        Ok(Bytes::from(format!("[{language}] {text}")))
    }
}

/// First `limit` characters of `text`, never splitting a multi-byte character
pub fn narration_excerpt(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(narration_excerpt("héllo", 2), "hé");
        assert_eq!(narration_excerpt("short", 600), "short");
        assert_eq!(narration_excerpt("", 3), "");
    }

    #[tokio::test]
    async fn echo_refuses_blank_text() {
        let synth = EchoSynthesizer;
        assert!(synth.synthesize("  ", "en").await.is_err());
        assert_eq!(synth.synthesize("hi", "en").await.unwrap(), Bytes::from("[en] hi"));
    }
}
