use std::future::Future;

use uuid::Uuid;

use crate::models::{
    error::QuizError,
    participant::{AnswerRecord, Decision, Participant},
    question::Question,
    room::{Room, RoomSettings, RoomStatus},
};

pub mod memory;
pub mod participant;
pub mod pg_store;
pub mod question;
pub mod room;

pub use memory::MemoryStore;
pub use pg_store::PgStore;

/// Storage contract the session core runs on. Deleted rooms are invisible
/// to every lookup.
pub trait QuizStore: Send + Sync + 'static {
    /// Persists a room with all of its questions, or nothing. Fails with
    /// `Conflict` when a live room already has the name.
    fn insert_room(
        &self,
        room: &Room,
        questions: &[Question],
    ) -> impl Future<Output = Result<(), QuizError>> + Send;

    fn room_by_id(&self, id: Uuid) -> impl Future<Output = Result<Option<Room>, QuizError>> + Send;

    fn room_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Room>, QuizError>> + Send;

    fn rooms_by_owner(&self, owner: &str)
    -> impl Future<Output = Result<Vec<Room>, QuizError>> + Send;

    /// Returns false when no live room has the id.
    fn update_room_status(
        &self,
        id: Uuid,
        status: RoomStatus,
    ) -> impl Future<Output = Result<bool, QuizError>> + Send;

    fn update_room_settings(
        &self,
        id: Uuid,
        settings: RoomSettings,
        duration: Option<i32>,
        allow_list: &[String],
    ) -> impl Future<Output = Result<bool, QuizError>> + Send;

    fn soft_delete_room(&self, id: Uuid) -> impl Future<Output = Result<bool, QuizError>> + Send;

    fn questions_by_room(
        &self,
        room_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Question>, QuizError>> + Send;

    fn insert_participant(
        &self,
        participant: &Participant,
    ) -> impl Future<Output = Result<(), QuizError>> + Send;

    fn participant_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Participant>, QuizError>> + Send;

    /// Ordered by name, then id.
    fn participants_by_room(
        &self,
        room_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Participant>, QuizError>> + Send;

    /// Atomically sets one ledger key, leaving the others untouched.
    /// Returns false when the participant does not exist.
    fn upsert_answer(
        &self,
        participant_id: Uuid,
        question_id: Uuid,
        record: &AnswerRecord,
    ) -> impl Future<Output = Result<bool, QuizError>> + Send;

    /// Overwrites the decision of an existing ledger entry. `None` when the
    /// participant or the entry is missing; no entry is ever created.
    fn set_decision(
        &self,
        participant_id: Uuid,
        question_id: Uuid,
        decision: Decision,
    ) -> impl Future<Output = Result<Option<AnswerRecord>, QuizError>> + Send;
}
