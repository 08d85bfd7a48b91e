use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Curriculum {
    #[default]
    Cbse,
    TnSt,
    Isce,
    Other,
}

impl fmt::Display for Curriculum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curriculum::Cbse => write!(f, "CBSE"),
            Curriculum::TnSt => write!(f, "TN-ST"),
            Curriculum::Isce => write!(f, "ISCE"),
            Curriculum::Other => write!(f, "Other"),
        }
    }
}

impl Curriculum {
    /// Parse curriculum from string (case insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "cbse" => Ok(Self::Cbse),
            "tn-st" | "tnst" => Ok(Self::TnSt),
            "isce" => Ok(Self::Isce),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown curriculum: '{}'. Supported: CBSE, TN-ST, ISCE, Other", s)),
        }
    }
}

pub fn explanation_prompt(topic: &str, curriculum: Curriculum) -> String {
    format!(
        "Provide a detailed explanation of the following topic: {topic} from the {curriculum} curriculum \
         without images and also provide chapter/page from the respective textbook."
    )
}

pub fn quiz_prompt(explanation: &str) -> String {
    format!(
        "Generate quiz questions based on the following content: {explanation}. \
         Give the question in one line followed by MCQ options in new lines. \
         Provide all answers at the end with 1 line explanation."
    )
}

pub fn question_paper_prompt(subject: &str) -> String {
    format!(
        "Generate a sample mock question paper for the subject: {subject} from class 12 CBSE board \
         with max marks and timings. Give each question in a new line"
    )
}
