use std::{collections::HashSet, sync::Arc};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    db::QuizStore,
    models::{
        error::QuizError,
        question::{
            DraftAnswer, MCQ_ANSWER_SEPARATOR, Question, QuestionDraft, QuestionKind, QuestionType,
        },
    },
};

pub struct QuestionBank<S> {
    store: Arc<S>,
}

impl<S> Clone for QuestionBank<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: QuizStore> QuestionBank<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Normalizes the drafts of one room. The result is persisted together
    /// with the room, so either every question is stored or none is.
    pub fn create_questions(
        &self,
        room_id: Uuid,
        drafts: &[QuestionDraft],
    ) -> Result<Vec<Question>, QuizError> {
        drafts
            .iter()
            .enumerate()
            .map(|(idx, draft)| normalize_draft(room_id, idx + 1, draft))
            .collect()
    }

    pub async fn list_questions(&self, room_id: Uuid) -> Result<Vec<Question>, QuizError> {
        self.store.questions_by_room(room_id).await
    }

    pub async fn get_question(
        &self,
        room_id: Uuid,
        question_id: Uuid,
    ) -> Result<Question, QuizError> {
        self.list_questions(room_id)
            .await?
            .into_iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| QuizError::not_found("Question not found"))
    }

    /// True when the stored question count matches the room's denormalized one.
    pub async fn verify_question_count(
        &self,
        room_id: Uuid,
        expected: i32,
    ) -> Result<bool, QuizError> {
        let stored = self.list_questions(room_id).await?.len();
        let consistent = stored as i32 == expected;
        if !consistent {
            warn!(
                "Room {} expects {} questions but has {}",
                room_id, expected, stored
            );
        }
        Ok(consistent)
    }
}

fn normalize_draft(
    room_id: Uuid,
    number: usize,
    draft: &QuestionDraft,
) -> Result<Question, QuizError> {
    let text = draft.text.trim();
    if text.is_empty() {
        return Err(QuizError::validation(format!(
            "Question {} has no text",
            number
        )));
    }

    let kind = match draft.question_type {
        QuestionType::Mcq => mcq_kind(number, &draft.options, &draft.answer)?,
        QuestionType::TrueFalse => QuestionKind::TrueFalse {
            correct: true_false_answer(number, &draft.answer)?,
        },
        QuestionType::ShortAnswer => match &draft.answer {
            DraftAnswer::Text(text) => QuestionKind::ShortAnswer {
                canonical: text.trim().to_string(),
            },
            _ => {
                return Err(QuizError::validation(format!(
                    "Question {} needs a written answer",
                    number
                )));
            }
        },
    };

    debug!("Normalized question {} as {}", number, kind.question_type());

    Ok(Question {
        id: Uuid::new_v4(),
        room_id,
        text: text.to_string(),
        kind,
    })
}

fn mcq_kind(
    number: usize,
    raw_options: &[String],
    answer: &DraftAnswer,
) -> Result<QuestionKind, QuizError> {
    // Indices point into the options as the form sent them, blanks included.
    let by_index = |idx: &usize| raw_options.get(*idx).map(|o| o.trim().to_string());

    let chosen: Vec<Option<String>> = match answer {
        DraftAnswer::Index(idx) => vec![by_index(idx)],
        DraftAnswer::Indices(indices) => indices.iter().map(by_index).collect(),
        DraftAnswer::Text(text) => vec![Some(text.trim().to_string())],
        DraftAnswer::Texts(texts) => texts.iter().map(|t| Some(t.trim().to_string())).collect(),
        DraftAnswer::Flag(_) => vec![None],
    };

    let options: Vec<String> = raw_options
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();

    if options.len() < 2 {
        return Err(QuizError::validation(format!(
            "Question {} needs at least two options",
            number
        )));
    }

    if options.iter().any(|o| o.contains(MCQ_ANSWER_SEPARATOR)) {
        return Err(QuizError::validation(format!(
            "Question {} has an option containing \"{}\"",
            number, MCQ_ANSWER_SEPARATOR
        )));
    }

    let mut seen = HashSet::with_capacity(options.len());
    if !options.iter().all(|o| seen.insert(o.as_str())) {
        return Err(QuizError::validation(format!(
            "Question {} has duplicate options",
            number
        )));
    }

    let mut chosen_texts = Vec::with_capacity(chosen.len());
    for choice in chosen {
        match choice {
            Some(text) if options.contains(&text) => chosen_texts.push(text),
            _ => {
                return Err(QuizError::validation(format!(
                    "Question {} has an answer that is not one of its options",
                    number
                )));
            }
        }
    }

    // Keep option order so the canonical answer does not depend on click order.
    let correct: Vec<String> = options
        .iter()
        .filter(|o| chosen_texts.contains(*o))
        .cloned()
        .collect();

    if correct.is_empty() {
        return Err(QuizError::validation(format!(
            "Question {} has no correct option",
            number
        )));
    }

    Ok(QuestionKind::Mcq { options, correct })
}

fn true_false_answer(number: usize, answer: &DraftAnswer) -> Result<bool, QuizError> {
    match answer {
        DraftAnswer::Index(0) | DraftAnswer::Flag(true) => Ok(true),
        DraftAnswer::Index(1) | DraftAnswer::Flag(false) => Ok(false),
        DraftAnswer::Text(text) if text.trim().eq_ignore_ascii_case("true") => Ok(true),
        DraftAnswer::Text(text) if text.trim().eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(QuizError::validation(format!(
            "Question {} must be answered with True or False",
            number
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn bank() -> QuestionBank<MemoryStore> {
        QuestionBank::new(Arc::new(MemoryStore::new()))
    }

    fn draft(question_type: QuestionType, options: &[&str], answer: DraftAnswer) -> QuestionDraft {
        QuestionDraft {
            question_type,
            text: "Which one?".into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer,
        }
    }

    #[test]
    fn blank_options_are_dropped_and_index_resolves_against_raw_list() {
        let drafts = [draft(
            QuestionType::Mcq,
            &["Mars", "", "Venus", "  "],
            DraftAnswer::Index(2),
        )];
        let questions = bank().create_questions(Uuid::new_v4(), &drafts).unwrap();

        assert_eq!(
            questions[0].kind,
            QuestionKind::Mcq {
                options: vec!["Mars".into(), "Venus".into()],
                correct: vec!["Venus".into()],
            }
        );
        assert_eq!(questions[0].canonical_answer(), "Venus");
    }

    #[test]
    fn multiple_correct_options_follow_option_order() {
        let drafts = [draft(
            QuestionType::Mcq,
            &["A", "B", "C"],
            DraftAnswer::Texts(vec!["C".into(), "A".into()]),
        )];
        let questions = bank().create_questions(Uuid::new_v4(), &drafts).unwrap();
        assert_eq!(questions[0].canonical_answer(), "A|C");
    }

    #[test]
    fn repeated_option_text_is_rejected() {
        let drafts = [draft(QuestionType::Mcq, &["A", " A ", "B"], DraftAnswer::Index(0))];
        let err = bank().create_questions(Uuid::new_v4(), &drafts).unwrap_err();
        assert!(matches!(err, QuizError::Validation(msg) if msg == "Question 1 has duplicate options"));
    }

    #[test]
    fn option_with_separator_is_rejected() {
        let drafts = [draft(
            QuestionType::Mcq,
            &["A|B", "A", "B"],
            DraftAnswer::Indices(vec![1, 2]),
        )];
        let err = bank().create_questions(Uuid::new_v4(), &drafts).unwrap_err();
        assert!(
            matches!(err, QuizError::Validation(msg) if msg == "Question 1 has an option containing \"|\"")
        );
    }

    #[test]
    fn answer_pointing_at_blank_option_is_rejected() {
        let drafts = [draft(QuestionType::Mcq, &["A", "", "B"], DraftAnswer::Index(1))];
        assert!(matches!(
            bank().create_questions(Uuid::new_v4(), &drafts),
            Err(QuizError::Validation(_))
        ));
    }

    #[test]
    fn true_false_options_are_forced() {
        let drafts = [draft(
            QuestionType::TrueFalse,
            &["yes", "no", "maybe"],
            DraftAnswer::Index(1),
        )];
        let questions = bank().create_questions(Uuid::new_v4(), &drafts).unwrap();
        assert_eq!(questions[0].kind.options(), vec!["True", "False"]);
        assert_eq!(questions[0].canonical_answer(), "False");
    }

    #[test]
    fn short_answer_has_no_options() {
        let drafts = [draft(
            QuestionType::ShortAnswer,
            &["ignored"],
            DraftAnswer::Text(" Paris ".into()),
        )];
        let questions = bank().create_questions(Uuid::new_v4(), &drafts).unwrap();
        assert!(questions[0].kind.options().is_empty());
        assert_eq!(questions[0].canonical_answer(), "Paris");
    }

    #[test]
    fn question_text_is_required() {
        let mut blank = draft(QuestionType::ShortAnswer, &[], DraftAnswer::Text("x".into()));
        blank.text = "   ".into();
        let err = bank().create_questions(Uuid::new_v4(), &[blank]).unwrap_err();
        assert!(matches!(err, QuizError::Validation(msg) if msg == "Question 1 has no text"));
    }
}
