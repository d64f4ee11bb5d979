use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separates correct options in the canonical answer of a multi-answer mcq.
pub const MCQ_ANSWER_SEPARATOR: &str = "|";

pub const TRUE_OPTION: &str = "True";
pub const FALSE_OPTION: &str = "False";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Mcq,
    TrueFalse,
    ShortAnswer,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::Mcq => write!(f, "mcq"),
            QuestionType::TrueFalse => write!(f, "true_false"),
            QuestionType::ShortAnswer => write!(f, "short_answer"),
        }
    }
}

/// Type-specific shape of a question's options and canonical answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq {
        options: Vec<String>,
        correct: Vec<String>,
    },
    TrueFalse {
        correct: bool,
    },
    ShortAnswer {
        canonical: String,
    },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::Mcq { .. } => QuestionType::Mcq,
            QuestionKind::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionKind::ShortAnswer { .. } => QuestionType::ShortAnswer,
        }
    }

    pub fn options(&self) -> Vec<String> {
        match self {
            QuestionKind::Mcq { options, .. } => options.clone(),
            QuestionKind::TrueFalse { .. } => {
                vec![TRUE_OPTION.to_string(), FALSE_OPTION.to_string()]
            }
            QuestionKind::ShortAnswer { .. } => vec![],
        }
    }

    /// The exact text a submission has to equal to be graded correct.
    pub fn canonical_answer(&self) -> String {
        match self {
            QuestionKind::Mcq { correct, .. } => correct.join(MCQ_ANSWER_SEPARATOR),
            QuestionKind::TrueFalse { correct: true } => TRUE_OPTION.to_string(),
            QuestionKind::TrueFalse { correct: false } => FALSE_OPTION.to_string(),
            QuestionKind::ShortAnswer { canonical } => canonical.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub room_id: Uuid,
    pub text: String,
    pub kind: QuestionKind,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn canonical_answer(&self) -> String {
        self.kind.canonical_answer()
    }
}

/// Answer as submitted by the room creation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftAnswer {
    Index(usize),
    Indices(Vec<usize>),
    Flag(bool),
    Text(String),
    Texts(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(alias = "question")]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: DraftAnswer,
}

/// A question as shown to a student who has not answered it yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuestion {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    pub options: Vec<String>,
}

impl From<&Question> for StudentQuestion {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            question_type: question.question_type(),
            text: question.text.clone(),
            options: question.kind.options(),
        }
    }
}
