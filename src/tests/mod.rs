use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::{
    db::MemoryStore,
    models::{
        app_state::AppState,
        question::{DraftAnswer, QuestionDraft, QuestionType},
        room::{CreateRoomRequest, RoomSettings},
        session::SubmitAnswer,
    },
};

mod session_flow;

pub const OWNER: &str = "teacher-1";

pub fn setup_app_state() -> Arc<AppState<MemoryStore>> {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init();

    AppState::in_memory()
}

pub fn mcq(text: &str, options: &[&str], answer: usize) -> QuestionDraft {
    QuestionDraft {
        question_type: QuestionType::Mcq,
        text: text.into(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer: DraftAnswer::Index(answer),
    }
}

pub fn true_false(text: &str, correct: bool) -> QuestionDraft {
    QuestionDraft {
        question_type: QuestionType::TrueFalse,
        text: text.into(),
        options: vec![],
        answer: DraftAnswer::Flag(correct),
    }
}

pub fn short_answer(text: &str, answer: &str) -> QuestionDraft {
    QuestionDraft {
        question_type: QuestionType::ShortAnswer,
        text: text.into(),
        options: vec![],
        answer: DraftAnswer::Text(answer.into()),
    }
}

pub fn room_request(name: &str, questions: Vec<QuestionDraft>) -> CreateRoomRequest {
    CreateRoomRequest {
        room_name: name.into(),
        duration: Some(30),
        settings: RoomSettings {
            randomize_questions: false,
            ..RoomSettings::default()
        },
        participant_list: vec![],
        questions,
    }
}

pub fn submission(room_id: Uuid, participant_id: Uuid, question_id: Uuid, answer: &str) -> SubmitAnswer {
    SubmitAnswer {
        participant_id: participant_id.to_string(),
        question_id: question_id.to_string(),
        answer_text: Some(answer.to_string()),
        canonical_answer: None,
        room_id: room_id.to_string(),
        question_type: None,
    }
}
