use core::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    models::{error::QuizError, question::QuestionDraft},
    service::validation::validate_room_name,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "room_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Draft,
    Active,
    Pause,
    Finish,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomStatus::Draft => write!(f, "draft"),
            RoomStatus::Active => write!(f, "active"),
            RoomStatus::Pause => write!(f, "pause"),
            RoomStatus::Finish => write!(f, "finish"),
        }
    }
}

impl FromStr for RoomStatus {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(RoomStatus::Draft),
            "active" => Ok(RoomStatus::Active),
            "pause" => Ok(RoomStatus::Pause),
            "finish" => Ok(RoomStatus::Finish),
            other => Err(QuizError::validation(format!(
                "Unknown room status: {}",
                other
            ))),
        }
    }
}

impl RoomStatus {
    /// Any status may follow any other; the teacher controls only ever
    /// produce the transitions below, but nothing else is rejected.
    pub fn transition(self, next: RoomStatus) -> RoomStatus {
        if self != next {
            tracing::debug!("Room status {} -> {}", self, next);
        }
        next
    }

    /// Pause/resume button: active pauses, everything else resumes.
    pub fn toggle_pause(self) -> RoomStatus {
        match self {
            RoomStatus::Active => RoomStatus::Pause,
            _ => RoomStatus::Active,
        }
    }

    /// Finish/restart button.
    pub fn toggle_finish(self) -> RoomStatus {
        match self {
            RoomStatus::Finish => RoomStatus::Active,
            _ => RoomStatus::Finish,
        }
    }
}

fn true_bool() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoomSettings {
    #[serde(default)]
    pub restrict_participants: bool,
    #[serde(default = "true_bool")]
    pub prevent_copying: bool,
    #[serde(default = "true_bool")]
    pub randomize_questions: bool,
    #[serde(default = "true_bool")]
    pub show_one_question_at_time: bool,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            restrict_participants: false,
            prevent_copying: true,
            randomize_questions: true,
            show_one_question_at_time: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub status: RoomStatus,
    pub duration: Option<i32>,
    pub owner: String,
    pub settings: RoomSettings,
    pub participant_allow_list: Vec<String>,
    pub number_of_questions: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Room {
    pub fn from_create_request(owner: &str, request: &CreateRoomRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: request.room_name.trim().to_string(),
            status: RoomStatus::Active,
            duration: request.duration,
            owner: owner.to_string(),
            settings: request.settings,
            participant_allow_list: clean_allow_list(&request.participant_list),
            number_of_questions: request.questions.len() as i32,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner == owner
    }

    /// Only consulted when the room restricts its participants.
    pub fn admits(&self, participant_name: &str) -> bool {
        if !self.settings.restrict_participants {
            return true;
        }

        let name = participant_name.trim();
        self.participant_allow_list.iter().any(|allowed| allowed == name)
    }
}

fn clean_allow_list(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(custom(function = "validate_room_name"))]
    pub room_name: String,
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub duration: Option<i32>,
    #[serde(default)]
    pub settings: RoomSettings,
    #[serde(default)]
    pub participant_list: Vec<String>,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomSettingsRequest {
    #[validate(range(min = 1, message = "Duration must be a positive number of minutes"))]
    pub duration: Option<i32>,
    pub settings: RoomSettings,
    #[serde(default)]
    pub participant_list: Vec<String>,
}

impl UpdateRoomSettingsRequest {
    pub fn allow_list(&self) -> Vec<String> {
        clean_allow_list(&self.participant_list)
    }
}

/// Answer to "does a room with this name exist", used before joining.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLookup {
    pub exists: bool,
    pub room_id: Option<Uuid>,
    pub status: Option<RoomStatus>,
}

impl RoomLookup {
    pub fn missing() -> Self {
        Self {
            exists: false,
            room_id: None,
            status: None,
        }
    }

    pub fn found(room: &Room) -> Self {
        Self {
            exists: true,
            room_id: Some(room.id),
            status: Some(room.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_toggle_matches_teacher_controls() {
        assert_eq!(RoomStatus::Active.toggle_pause(), RoomStatus::Pause);
        assert_eq!(RoomStatus::Pause.toggle_pause(), RoomStatus::Active);
        assert_eq!(RoomStatus::Draft.toggle_pause(), RoomStatus::Active);
    }

    #[test]
    fn finish_toggle_restarts() {
        assert_eq!(RoomStatus::Active.toggle_finish(), RoomStatus::Finish);
        assert_eq!(RoomStatus::Pause.toggle_finish(), RoomStatus::Finish);
        assert_eq!(RoomStatus::Finish.toggle_finish(), RoomStatus::Active);
    }

    #[test]
    fn any_transition_is_allowed() {
        assert_eq!(
            RoomStatus::Draft.transition(RoomStatus::Pause),
            RoomStatus::Pause
        );
        assert_eq!(
            RoomStatus::Finish.transition(RoomStatus::Draft),
            RoomStatus::Draft
        );
    }

    #[test]
    fn status_parses_lowercase_only() {
        assert_eq!("pause".parse::<RoomStatus>().unwrap(), RoomStatus::Pause);
        assert!("Paused".parse::<RoomStatus>().is_err());
    }

    #[test]
    fn allow_list_only_applies_when_restricted() {
        let request = CreateRoomRequest {
            room_name: " algebra ".into(),
            duration: None,
            settings: RoomSettings::default(),
            participant_list: vec![" Alice ".into(), "".into()],
            questions: vec![],
        };
        let mut room = Room::from_create_request("teacher-1", &request);
        assert_eq!(room.name, "algebra");
        assert_eq!(room.participant_allow_list, vec!["Alice".to_string()]);
        assert!(room.admits("Bob"));

        room.settings.restrict_participants = true;
        assert!(room.admits("  Alice"));
        assert!(!room.admits("Bob"));
    }
}
