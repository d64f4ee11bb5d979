use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    db::QuizStore,
    models::{
        error::QuizError,
        participant::{AnswerRecord, Decision, Participant},
    },
    service::validation::participant_name,
};

pub struct ParticipantTracker<S> {
    store: Arc<S>,
}

impl<S> Clone for ParticipantTracker<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: QuizStore> ParticipantTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Every join creates a new participant, repeat names included.
    pub async fn create_participant(
        &self,
        name: &str,
        room_id: Uuid,
    ) -> Result<Participant, QuizError> {
        let name = participant_name(name)?;
        let participant = Participant::new(name, room_id);
        self.store.insert_participant(&participant).await?;

        info!("Participant {} joined room {}", participant.id, room_id);
        Ok(participant)
    }

    pub async fn get_participant(&self, id: Uuid) -> Result<Participant, QuizError> {
        self.store
            .participant_by_id(id)
            .await?
            .ok_or_else(|| QuizError::not_found("Participant not found"))
    }

    pub async fn list_participants(&self, room_id: Uuid) -> Result<Vec<Participant>, QuizError> {
        self.store.participants_by_room(room_id).await
    }

    /// Sets a single ledger key. Resubmissions overwrite the earlier entry.
    pub async fn record_answer(
        &self,
        participant_id: Uuid,
        question_id: Uuid,
        record: AnswerRecord,
    ) -> Result<AnswerRecord, QuizError> {
        if !self
            .store
            .upsert_answer(participant_id, question_id, &record)
            .await?
        {
            return Err(QuizError::not_found("Participant not found"));
        }

        debug!(
            "Recorded answer for participant {} question {}: {:?}",
            participant_id, question_id, record.decision
        );
        Ok(record)
    }

    /// Manual grading. Keeps the submitted text, replaces only the decision.
    pub async fn update_decision(
        &self,
        participant_id: Uuid,
        question_id: Uuid,
        decision: bool,
    ) -> Result<AnswerRecord, QuizError> {
        let record = self
            .store
            .set_decision(participant_id, question_id, Decision::from(decision))
            .await?
            .ok_or_else(|| QuizError::not_found("Answer not found"))?;

        info!(
            "Answer of participant {} to question {} graded {}",
            participant_id, question_id, decision
        );
        Ok(record)
    }
}
