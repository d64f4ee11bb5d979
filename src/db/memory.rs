use std::sync::Arc;

use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use tracing::debug;
use uuid::Uuid;

use crate::{
    db::QuizStore,
    models::{
        error::QuizError,
        participant::{AnswerRecord, Decision, Participant},
        question::Question,
        room::{Room, RoomSettings, RoomStatus},
    },
};

/// In-process store. Each ledger write happens under the participant's
/// shard guard, so writes to different questions never clobber each other.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rooms: Arc<DashMap<Uuid, Room>>,
    live_names: Arc<DashMap<String, Uuid>>,
    questions: Arc<DashMap<Uuid, Vec<Question>>>,
    participants: Arc<DashMap<Uuid, Participant>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_room(&self, id: &Uuid) -> Option<Room> {
        self.rooms
            .get(id)
            .filter(|room| !room.is_deleted())
            .map(|room| room.value().clone())
    }
}

impl QuizStore for MemoryStore {
    async fn insert_room(&self, room: &Room, questions: &[Question]) -> Result<(), QuizError> {
        match self.live_names.entry(room.name.clone()) {
            Entry::Occupied(existing) => {
                let room_id = *existing.get();
                let status = self
                    .rooms
                    .get(&room_id)
                    .map(|r| r.status)
                    .unwrap_or(RoomStatus::Active);
                Err(QuizError::Conflict { room_id, status })
            }
            Entry::Vacant(slot) => {
                self.questions.insert(room.id, questions.to_vec());
                self.rooms.insert(room.id, room.clone());
                slot.insert(room.id);
                debug!("Stored room {} with {} questions", room.id, questions.len());
                Ok(())
            }
        }
    }

    async fn room_by_id(&self, id: Uuid) -> Result<Option<Room>, QuizError> {
        Ok(self.live_room(&id))
    }

    async fn room_by_name(&self, name: &str) -> Result<Option<Room>, QuizError> {
        let id = self.live_names.get(name).map(|entry| *entry.value());
        Ok(id.and_then(|id| self.live_room(&id)))
    }

    async fn rooms_by_owner(&self, owner: &str) -> Result<Vec<Room>, QuizError> {
        let mut rooms: Vec<Room> = self
            .rooms
            .iter()
            .filter(|room| room.owner == owner && !room.is_deleted())
            .map(|room| room.value().clone())
            .collect();

        rooms.sort_by_key(|room| room.created_at);
        Ok(rooms)
    }

    async fn update_room_status(&self, id: Uuid, status: RoomStatus) -> Result<bool, QuizError> {
        let Some(mut room) = self.rooms.get_mut(&id) else {
            return Ok(false);
        };
        if room.is_deleted() {
            return Ok(false);
        }

        room.status = room.status.transition(status);
        room.updated_at = Some(Utc::now());
        Ok(true)
    }

    async fn update_room_settings(
        &self,
        id: Uuid,
        settings: RoomSettings,
        duration: Option<i32>,
        allow_list: &[String],
    ) -> Result<bool, QuizError> {
        let Some(mut room) = self.rooms.get_mut(&id) else {
            return Ok(false);
        };
        if room.is_deleted() {
            return Ok(false);
        }

        room.settings = settings;
        room.duration = duration;
        room.participant_allow_list = allow_list.to_vec();
        room.updated_at = Some(Utc::now());
        Ok(true)
    }

    async fn soft_delete_room(&self, id: Uuid) -> Result<bool, QuizError> {
        let name = {
            let Some(mut room) = self.rooms.get_mut(&id) else {
                return Ok(false);
            };
            if room.is_deleted() {
                return Ok(false);
            }
            room.deleted_at = Some(Utc::now());
            room.name.clone()
        };

        self.live_names.remove_if(&name, |_, owner_id| *owner_id == id);
        Ok(true)
    }

    async fn questions_by_room(&self, room_id: Uuid) -> Result<Vec<Question>, QuizError> {
        Ok(self
            .questions
            .get(&room_id)
            .map(|questions| questions.value().clone())
            .unwrap_or_default())
    }

    async fn insert_participant(&self, participant: &Participant) -> Result<(), QuizError> {
        self.participants.insert(participant.id, participant.clone());
        Ok(())
    }

    async fn participant_by_id(&self, id: Uuid) -> Result<Option<Participant>, QuizError> {
        Ok(self.participants.get(&id).map(|p| p.value().clone()))
    }

    async fn participants_by_room(&self, room_id: Uuid) -> Result<Vec<Participant>, QuizError> {
        let mut participants: Vec<Participant> = self
            .participants
            .iter()
            .filter(|p| p.room_id == room_id)
            .map(|p| p.value().clone())
            .collect();

        participants.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(participants)
    }

    async fn upsert_answer(
        &self,
        participant_id: Uuid,
        question_id: Uuid,
        record: &AnswerRecord,
    ) -> Result<bool, QuizError> {
        let Some(mut participant) = self.participants.get_mut(&participant_id) else {
            return Ok(false);
        };

        participant.record(question_id, record.clone());
        Ok(true)
    }

    async fn set_decision(
        &self,
        participant_id: Uuid,
        question_id: Uuid,
        decision: Decision,
    ) -> Result<Option<AnswerRecord>, QuizError> {
        let Some(mut participant) = self.participants.get_mut(&participant_id) else {
            return Ok(None);
        };

        let Some(entry) = participant.options.get_mut(&question_id) else {
            return Ok(None);
        };

        entry.decision = decision;
        Ok(Some(entry.clone()))
    }
}
