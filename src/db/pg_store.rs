use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::app_config::DatabaseConfig,
    db::{self, QuizStore},
    models::{
        error::QuizError,
        participant::{AnswerRecord, Decision, Participant},
        question::Question,
        room::{Room, RoomSettings, RoomStatus},
    },
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, QuizError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        if config.run_migrations {
            sqlx::migrate!().run(&pool).await?;
            info!("Database migrations applied");
        }

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

impl QuizStore for PgStore {
    async fn insert_room(&self, room: &Room, questions: &[Question]) -> Result<(), QuizError> {
        let mut tx = self.pool.begin().await?;

        if let Err(e) = db::room::create_room(&mut tx, room).await {
            tx.rollback().await?;

            let name_taken =
                matches!(&e, sqlx::Error::Database(db_err) if db_err.is_unique_violation());
            if !name_taken {
                return Err(e.into());
            }

            warn!("Room name {} was taken concurrently", room.name);
            return match db::room::get_room_by_name(&self.pool, &room.name).await? {
                Some(existing) => Err(QuizError::Conflict {
                    room_id: existing.id,
                    status: existing.status,
                }),
                None => Err(e.into()),
            };
        }

        for (position, question) in questions.iter().enumerate() {
            db::question::create_question(&mut tx, position as i32, question).await?;
        }

        tx.commit().await?;
        debug!("Stored room {} with {} questions", room.id, questions.len());
        Ok(())
    }

    async fn room_by_id(&self, id: Uuid) -> Result<Option<Room>, QuizError> {
        Ok(db::room::get_room_by_id(&self.pool, id).await?)
    }

    async fn room_by_name(&self, name: &str) -> Result<Option<Room>, QuizError> {
        Ok(db::room::get_room_by_name(&self.pool, name).await?)
    }

    async fn rooms_by_owner(&self, owner: &str) -> Result<Vec<Room>, QuizError> {
        Ok(db::room::get_rooms_by_owner(&self.pool, owner).await?)
    }

    async fn update_room_status(&self, id: Uuid, status: RoomStatus) -> Result<bool, QuizError> {
        Ok(db::room::update_status(&self.pool, id, status).await?)
    }

    async fn update_room_settings(
        &self,
        id: Uuid,
        settings: RoomSettings,
        duration: Option<i32>,
        allow_list: &[String],
    ) -> Result<bool, QuizError> {
        Ok(db::room::update_settings(&self.pool, id, settings, duration, allow_list).await?)
    }

    async fn soft_delete_room(&self, id: Uuid) -> Result<bool, QuizError> {
        Ok(db::room::soft_delete(&self.pool, id).await?)
    }

    async fn questions_by_room(&self, room_id: Uuid) -> Result<Vec<Question>, QuizError> {
        db::question::get_questions_by_room(&self.pool, room_id).await
    }

    async fn insert_participant(&self, participant: &Participant) -> Result<(), QuizError> {
        Ok(db::participant::create_participant(&self.pool, participant).await?)
    }

    async fn participant_by_id(&self, id: Uuid) -> Result<Option<Participant>, QuizError> {
        Ok(db::participant::get_participant_by_id(&self.pool, id).await?)
    }

    async fn participants_by_room(&self, room_id: Uuid) -> Result<Vec<Participant>, QuizError> {
        Ok(db::participant::get_participants_by_room(&self.pool, room_id).await?)
    }

    async fn upsert_answer(
        &self,
        participant_id: Uuid,
        question_id: Uuid,
        record: &AnswerRecord,
    ) -> Result<bool, QuizError> {
        Ok(db::participant::upsert_answer(&self.pool, participant_id, question_id, record).await?)
    }

    async fn set_decision(
        &self,
        participant_id: Uuid,
        question_id: Uuid,
        decision: Decision,
    ) -> Result<Option<AnswerRecord>, QuizError> {
        Ok(db::participant::set_decision(&self.pool, participant_id, question_id, decision).await?)
    }
}
