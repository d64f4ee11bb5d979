//! Grading of a single submitted answer. Pure, no I/O.

use crate::models::{
    participant::{AnswerRecord, Decision},
    question::QuestionType,
};

/// Decides a submission. Choice questions use exact, case-sensitive string
/// equality with no trimming; short answers always wait for a reviewer.
pub fn grade(question_type: QuestionType, submitted: &str, canonical: &str) -> Decision {
    match question_type {
        QuestionType::Mcq | QuestionType::TrueFalse => (submitted == canonical).into(),
        QuestionType::ShortAnswer => Decision::Pending,
    }
}

pub fn grade_record(question_type: QuestionType, submitted: &str, canonical: &str) -> AnswerRecord {
    AnswerRecord {
        option: submitted.to_string(),
        decision: grade(question_type, submitted, canonical),
    }
}
