use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    participant::{Decision, Participant},
    question::{Question, QuestionType, StudentQuestion},
    response::RedirectTarget,
    room::{Room, RoomStatus},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRoom {
    pub room_id: Uuid,
    pub number_of_questions: i32,
    pub redirect_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomCheck {
    pub room_id: Uuid,
    pub status: RoomStatus,
    pub redirect: RedirectTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedParticipant {
    pub participant_id: Uuid,
    pub room_id: Uuid,
    pub name: String,
    pub redirect: RedirectTarget,
}

/// A question the participant already answered, with what they submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
    pub user_answer: String,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServedQuestions {
    pub answered: Vec<AnsweredQuestion>,
    pub unanswered: Vec<StudentQuestion>,
    pub already_answered_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswer {
    pub participant_id: String,
    pub question_id: String,
    pub answer_text: Option<String>,
    #[serde(default)]
    pub canonical_answer: Option<String>,
    pub room_id: String,
    #[serde(default)]
    pub question_type: Option<QuestionType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReview {
    pub participant_id: Uuid,
    pub participant_name: String,
    pub question_id: Uuid,
    pub question_text: String,
    pub option: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantScore {
    pub participant_id: Uuid,
    pub name: String,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub pending: usize,
    pub percentage: u8,
}

/// Everything an exporter needs for one room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomReport {
    pub room: Room,
    pub questions: Vec<Question>,
    pub participants: Vec<Participant>,
}
