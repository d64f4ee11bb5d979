//! Session and grading core of a live classroom quiz: rooms, questions,
//! participants and their answer ledgers, behind a storage trait with a
//! Postgres and an in-memory implementation.

pub mod config;
pub mod db;
pub mod models;
pub mod service;

#[cfg(test)]
mod tests;

pub use config::app_config::AppConfig;
pub use db::{MemoryStore, PgStore, QuizStore};
pub use models::{
    app_state::AppState,
    error::{QuizError, SessionState},
    participant::{AnswerRecord, Decision, Participant},
    question::{Question, QuestionDraft, QuestionKind, QuestionType},
    response::{ActionResult, RedirectTarget},
    room::{CreateRoomRequest, Room, RoomSettings, RoomStatus},
};
pub use service::session::SessionOrchestrator;
