use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use uuid::Uuid;

/// Grading outcome of one answer. Stored as `true`, `false` or `"pending"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Correct,
    Incorrect,
    Pending,
}

const PENDING: &str = "pending";

impl From<bool> for Decision {
    fn from(value: bool) -> Self {
        if value {
            Decision::Correct
        } else {
            Decision::Incorrect
        }
    }
}

impl Decision {
    pub fn is_correct(&self) -> bool {
        matches!(self, Decision::Correct)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Decision::Pending)
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Decision::Correct => serializer.serialize_bool(true),
            Decision::Incorrect => serializer.serialize_bool(false),
            Decision::Pending => serializer.serialize_str(PENDING),
        }
    }
}

impl<'de> Deserialize<'de> for Decision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => Ok(flag.into()),
            Raw::Text(text) if text == PENDING => Ok(Decision::Pending),
            Raw::Text(text) => Err(de::Error::custom(format!(
                "invalid decision '{}', expected true, false or \"pending\"",
                text
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub option: String,
    pub decision: Decision,
}

/// Question id to the participant's answer for it. One entry per question.
pub type Ledger = HashMap<Uuid, AnswerRecord>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Uuid,
    pub room_id: Uuid,
    pub name: String,
    pub options: Ledger,
    pub progress: i32,
}

impl Participant {
    pub fn new(name: &str, room_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_id,
            name: name.trim().to_string(),
            options: HashMap::new(),
            progress: 0,
        }
    }

    pub fn answer_for(&self, question_id: &Uuid) -> Option<&AnswerRecord> {
        self.options.get(question_id)
    }

    /// Inserts or overwrites the entry for one question and refreshes
    /// progress from the ledger size.
    pub fn record(&mut self, question_id: Uuid, record: AnswerRecord) {
        self.options.insert(question_id, record);
        self.progress = self.options.len() as i32;
    }
}
