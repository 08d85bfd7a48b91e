//! Answer sheets for mock question papers.
//!
//! A sheet pairs each line of a stored paper with the candidate's answer. Rendering is
//! delegated to a [`SheetWriter`]; the crate only ships a plain-text layout.

use std::fmt::{Debug, Write as _};
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AssistantError, DocumentError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerEntry {
    pub question: String,
    /// Empty when the question was left unanswered
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSheet {
    pub subject: String,
    pub entries: Vec<AnswerEntry>,
}

impl AnswerSheet {
    /// Zip questions with answers in order.
    ///
    /// Missing trailing answers are recorded as blank. More answers than questions is an error.
    pub fn new(subject: &str, questions: Vec<String>, answers: Vec<String>) -> Result<Self, AssistantError> {
        if answers.len() > questions.len() {
            return Err(AssistantError::TooManyAnswers {
                questions: questions.len(),
                answers: answers.len(),
            });
        }

        let mut answers = answers.into_iter();
        let entries = questions
            .into_iter()
            .map(|question| AnswerEntry {
                question,
                answer: answers.next().unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            subject: subject.to_string(),
            entries,
        })
    }

    pub fn answered(&self) -> usize {
        self.entries.iter().filter(|e| !e.answer.trim().is_empty()).count()
    }
}

/// Questions of a generated paper: one per non-blank line
pub fn question_lines(paper: &str) -> Vec<String> {
    paper
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turns an answer sheet into a downloadable document (PDF, DOCX, text, ...)
#[async_trait]
pub trait SheetWriter: Send + Sync + Debug {
    /// File extension of the rendered document, without the dot
    fn extension(&self) -> &str;

    async fn render(&self, sheet: &AnswerSheet) -> Result<Bytes, DocumentError>;
}

#[derive(Debug, Clone, Default)]
pub struct PlainTextSheetWriter;

#[async_trait]
impl SheetWriter for PlainTextSheetWriter {
    fn extension(&self) -> &str {
        "txt"
    }

    async fn render(&self, sheet: &AnswerSheet) -> Result<Bytes, DocumentError> {
        let mut out = format!("Subject: {}\n\n", sheet.subject);
        for (i, entry) in sheet.entries.iter().enumerate() {
            writeln!(out, "Question {}: {}", i + 1, entry.question)
                .and_then(|_| writeln!(out, "Your Answer: {}", entry.answer))
                .and_then(|_| writeln!(out))
                .map_err(|e| DocumentError::Render(e.to_string()))?;
        }
        Ok(Bytes::from(out))
    }
}

/// A rendered, saved answer sheet
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub sheet: AnswerSheet,
    pub path: PathBuf,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn question_lines_skip_blanks() {
        let paper = "Max marks: 70\n\n  1. Define inertia.  \n2. State Ohm's law.\n";
        assert_eq!(
            question_lines(paper),
            strings(&["Max marks: 70", "1. Define inertia.", "2. State Ohm's law."])
        );
    }

    #[test]
    fn missing_answers_left_blank() {
        let sheet = AnswerSheet::new("Physics", strings(&["Q1", "Q2", "Q3"]), strings(&["A1"])).unwrap();
        assert_eq!(sheet.entries.len(), 3);
        assert_eq!(sheet.entries[0].answer, "A1");
        assert_eq!(sheet.entries[2].answer, "");
        assert_eq!(sheet.answered(), 1);
    }

    #[test]
    fn extra_answers_rejected() {
        let err = AnswerSheet::new("Physics", strings(&["Q1"]), strings(&["A1", "A2"])).unwrap_err();
        assert!(matches!(err, AssistantError::TooManyAnswers { questions: 1, answers: 2 }));
    }

    #[tokio::test]
    async fn plain_text_layout() {
        let sheet = AnswerSheet::new(
            "Economics",
            strings(&["Explain the law of demand."]),
            strings(&["Price up, demand down."]),
        )
        .unwrap();
        let rendered = PlainTextSheetWriter.render(&sheet).await.unwrap();
        assert_eq!(
            rendered,
            Bytes::from("Subject: Economics\n\nQuestion 1: Explain the law of demand.\nYour Answer: Price up, demand down.\n\n")
        );
    }
}
