use core::fmt;

use serde::{Serialize, Serializer, ser::SerializeMap};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::{
    error::{QuizError, SessionState},
    room::RoomStatus,
};

pub const PAUSED_MESSAGE: &str = "This quiz is paused";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong, please try again";

/// Where the client should navigate next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    Join,
    StudentInfo { room: String },
    Quiz { room_id: Uuid, participant_id: Uuid },
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectTarget::Join => write!(f, "/student"),
            RedirectTarget::StudentInfo { room } => write!(f, "/student/{}/student-info", room),
            RedirectTarget::Quiz {
                room_id,
                participant_id,
            } => write!(f, "/student/quiz/{}/{}", room_id, participant_id),
        }
    }
}

impl Serialize for RedirectTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Tagged result handed to the UI layer. Every orchestrator operation
/// returns one of these instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Success(T),
    Failure { message: String },
    Paused { message: String },
    Redirect { target: RedirectTarget },
    AlreadyExists {
        message: String,
        room_id: Uuid,
        status: RoomStatus,
    },
}

impl<T> ActionResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ActionResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ActionResult::Failure { message }
            | ActionResult::Paused { message }
            | ActionResult::AlreadyExists { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl<T> From<Result<T, QuizError>> for ActionResult<T> {
    fn from(result: Result<T, QuizError>) -> Self {
        match result {
            Ok(data) => ActionResult::Success(data),
            Err(e) => e.into(),
        }
    }
}

impl<T> From<QuizError> for ActionResult<T> {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::Validation(message) => {
                info!("Rejected input: {}", message);
                ActionResult::Failure { message }
            }
            QuizError::NotFound(message) => {
                warn!("Entity not found: {}", message);
                ActionResult::Failure { message }
            }
            QuizError::Conflict { room_id, status } => {
                info!("Room {} already exists with status {}", room_id, status);
                ActionResult::AlreadyExists {
                    message: String::from("Room already exists"),
                    room_id,
                    status,
                }
            }
            QuizError::State(SessionState::Paused) => ActionResult::Paused {
                message: String::from(PAUSED_MESSAGE),
            },
            QuizError::State(SessionState::Finished { room_name }) => ActionResult::Redirect {
                target: RedirectTarget::StudentInfo { room: room_name },
            },
            QuizError::Sqlx(e) => {
                error!("Sqlx failed with error: {:?}", e);
                ActionResult::generic_failure()
            }
            QuizError::Migrate(e) => {
                error!("Migration failed: {}", e);
                ActionResult::generic_failure()
            }
            QuizError::Json(e) => {
                error!("Json error: {}", e);
                ActionResult::generic_failure()
            }
            QuizError::Config(e) => {
                error!("Config error: {}", e);
                ActionResult::generic_failure()
            }
            QuizError::Internal(e) => {
                error!("Internal error: {}", e);
                ActionResult::generic_failure()
            }
        }
    }
}

impl<T> ActionResult<T> {
    fn generic_failure() -> Self {
        ActionResult::Failure {
            message: String::from(GENERIC_FAILURE_MESSAGE),
        }
    }
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            ActionResult::Success(data) => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
            }
            ActionResult::Failure { message } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
            }
            ActionResult::Paused { message } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
                map.serialize_entry("state", "paused")?;
            }
            ActionResult::Redirect { target } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("redirect", target)?;
            }
            ActionResult::AlreadyExists {
                message,
                room_id,
                status,
            } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
                map.serialize_entry("roomId", room_id)?;
                map.serialize_entry("status", status)?;
            }
        }
        map.end()
    }
}
