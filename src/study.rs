//! Study-session glue: formats prompts, forwards them to a text generator and a
//! speech synthesizer, and records what was produced in the host's [`StudyStore`].

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::answers::{question_lines, AnswerSheet, PlainTextSheetWriter, SheetWriter, Submission};
use crate::archive::FileArchive;
use crate::clients::LowLevelClient;
use crate::config::AssistantConfig;
use crate::error::{AssistantError, DocumentError, SpeechError};
use crate::prompts::{explanation_prompt, question_paper_prompt, quiz_prompt, Curriculum};
use crate::speech::{narration_excerpt, SpeechSynthesizer};
use crate::store::StudyStore;

#[derive(Debug)]
pub struct StudyAssistant<C, S> {
    client: C,
    synthesizer: S,
    archive: FileArchive,
    sheet_writer: Box<dyn SheetWriter>,
    store: Arc<StudyStore>,
    config: AssistantConfig,
}

impl<C, S> StudyAssistant<C, S>
where
    C: LowLevelClient,
    S: SpeechSynthesizer,
{
    pub fn new(client: C, synthesizer: S, store: Arc<StudyStore>, config: AssistantConfig) -> Self {
        info!(audio_dir = %config.audio_dir.display(), "Creating study assistant");
        Self {
            client,
            synthesizer,
            archive: FileArchive::new(config.audio_dir.clone(), "mp3"),
            sheet_writer: Box::new(PlainTextSheetWriter),
            store,
            config,
        }
    }

    /// Replace the plain-text answer sheet layout
    #[must_use]
    pub fn with_sheet_writer(mut self, writer: impl SheetWriter + 'static) -> Self {
        self.sheet_writer = Box::new(writer);
        self
    }

    pub fn store(&self) -> &Arc<StudyStore> {
        &self.store
    }

    #[instrument(skip(self))]
    pub async fn explain(&self, topic: &str, curriculum: Curriculum) -> Result<String, AssistantError> {
        let topic = non_blank(topic).ok_or(AssistantError::EmptyTopic)?;
        let explanation = self.client.ask_raw(explanation_prompt(topic, curriculum)).await?;
        info!(response_len = explanation.len(), "Explanation generated");
        Ok(explanation)
    }

    /// Generate quiz questions from an explanation and file them under `topic`
    #[instrument(skip(self, explanation), fields(explanation_len = explanation.len()))]
    pub async fn generate_quiz(&self, topic: &str, explanation: &str) -> Result<String, AssistantError> {
        let topic = non_blank(topic).ok_or(AssistantError::EmptyTopic)?;
        let quiz = self.client.ask_raw(quiz_prompt(explanation)).await?;
        self.store.question_bank.put(topic, quiz.clone()).await;
        info!(response_len = quiz.len(), "Quiz added to question bank");
        Ok(quiz)
    }

    /// Narrate the opening of an explanation and file the audio under `topic`
    #[instrument(skip(self, explanation), fields(explanation_len = explanation.len()))]
    pub async fn narrate(&self, topic: &str, explanation: &str) -> Result<PathBuf, AssistantError> {
        let topic = non_blank(topic).ok_or(AssistantError::EmptyTopic)?;
        let excerpt = narration_excerpt(explanation, self.config.narration_char_limit);
        let audio = self.synthesizer.synthesize(excerpt, &self.config.language).await?;
        let path = self.archive.save(topic, &audio).await.map_err(SpeechError::from)?;
        self.store.audio_topics.put(topic, path.clone()).await;
        info!(path = %path.display(), "Narration saved");
        Ok(path)
    }

    #[instrument(skip(self))]
    pub async fn generate_question_paper(&self, subject: &str) -> Result<String, AssistantError> {
        let subject = non_blank(subject).ok_or(AssistantError::EmptySubject)?;
        let paper = self.client.ask_raw(question_paper_prompt(subject)).await?;
        self.store.mock_papers.put(subject, paper.clone()).await;
        info!(response_len = paper.len(), "Mock question paper stored");
        Ok(paper)
    }

    /// Pair `answers` with the stored paper for `subject`, render and save the sheet
    ///
    /// Answers are matched to the paper's non-blank lines in order.
    #[instrument(skip(self, answers), fields(answers = answers.len()))]
    pub async fn submit_answers(&self, subject: &str, answers: Vec<String>) -> Result<Submission, AssistantError> {
        let subject = non_blank(subject).ok_or(AssistantError::EmptySubject)?;
        let paper = self
            .store
            .mock_papers
            .get(subject)
            .await
            .ok_or_else(|| AssistantError::NoQuestionPaper(subject.to_string()))?;

        let sheet = AnswerSheet::new(subject, question_lines(&paper), answers)?;
        if sheet.answered() < sheet.entries.len() {
            warn!(
                answered = sheet.answered(),
                questions = sheet.entries.len(),
                "Submitting with unanswered questions"
            );
        }

        let document = self.sheet_writer.render(&sheet).await?;
        let archive = FileArchive::new(self.config.submissions_dir.clone(), self.sheet_writer.extension());
        let path = archive.save(subject, &document).await.map_err(DocumentError::from)?;

        let submission = Submission {
            sheet,
            path,
            submitted_at: Utc::now(),
        };
        self.store.submissions.put(subject, submission.clone()).await;
        info!(path = %submission.path.display(), "Answer sheet submitted");
        Ok(submission)
    }

    pub async fn question_bank(&self) -> Vec<(String, String)> {
        self.store.question_bank.list().await
    }

    pub async fn audio_topics(&self) -> Vec<(String, PathBuf)> {
        self.store.audio_topics.list().await
    }

    pub async fn mock_papers(&self) -> Vec<(String, String)> {
        self.store.mock_papers.list().await
    }

    pub async fn submissions(&self) -> Vec<(String, Submission)> {
        self.store.submissions.list().await
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
