use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProctorError {
    #[error("Frame source '{name}' unavailable: {reason}")]
    SourceUnavailable { name: String, reason: String },
    #[error("Session closed")]
    SessionClosed,
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),
    #[error("Face detection failed: {0}")]
    Detection(String),
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("Generation service error: {0}")]
    Service(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
    #[error("Mock error: {0}")]
    Mock(String),
}

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("Audio write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document rendering failed: {0}")]
    Render(String),
    #[error("Document write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("AI error: {0}")]
    Ai(#[from] AIError),
    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
    #[error("Please enter a topic")]
    EmptyTopic,
    #[error("Please enter a subject")]
    EmptySubject,
    #[error("No question paper generated for '{0}'")]
    NoQuestionPaper(String),
    #[error("{answers} answers given for {questions} questions")]
    TooManyAnswers { questions: usize, answers: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },
}
