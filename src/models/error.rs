use thiserror::Error;
use uuid::Uuid;

use crate::models::room::RoomStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Paused,
    Finished { room_name: String },
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Room already exists: {room_id}")]
    Conflict { room_id: Uuid, status: RoomStatus },

    #[error("Session state: {0:?}")]
    State(SessionState),

    #[error("Sqlx failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuizError {
    pub fn validation(message: impl Into<String>) -> Self {
        QuizError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        QuizError::NotFound(message.into())
    }
}
