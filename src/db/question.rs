use serde_json::{Value, json};
use sqlx::{Pool, Postgres, Transaction, types::Json};
use uuid::Uuid;

use crate::models::{
    error::QuizError,
    question::{Question, QuestionKind, QuestionType},
};

#[derive(Debug, sqlx::FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub room_id: Uuid,
    pub question_type: QuestionType,
    pub question: String,
    pub options: Json<Vec<String>>,
    pub answer: Json<Value>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = QuizError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let Json(answer) = row.answer;
        let kind = match row.question_type {
            QuestionType::Mcq => QuestionKind::Mcq {
                options: row.options.0,
                correct: serde_json::from_value(answer)?,
            },
            QuestionType::TrueFalse => QuestionKind::TrueFalse {
                correct: serde_json::from_value(answer)?,
            },
            QuestionType::ShortAnswer => QuestionKind::ShortAnswer {
                canonical: serde_json::from_value(answer)?,
            },
        };

        Ok(Question {
            id: row.id,
            room_id: row.room_id,
            text: row.question,
            kind,
        })
    }
}

fn answer_value(kind: &QuestionKind) -> Value {
    match kind {
        QuestionKind::Mcq { correct, .. } => json!(correct),
        QuestionKind::TrueFalse { correct } => json!(correct),
        QuestionKind::ShortAnswer { canonical } => json!(canonical),
    }
}

pub async fn create_question(
    tx: &mut Transaction<'_, Postgres>,
    position: i32,
    question: &Question,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "questions" (id, room_id, position, question_type, question, options, answer)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(question.id)
    .bind(question.room_id)
    .bind(position)
    .bind(question.question_type())
    .bind(&question.text)
    .bind(Json(question.kind.options()))
    .bind(Json(answer_value(&question.kind)))
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn get_questions_by_room(
    pool: &Pool<Postgres>,
    room_id: Uuid,
) -> Result<Vec<Question>, QuizError> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, room_id, question_type, question, options, answer
        FROM "questions"
        WHERE room_id = $1
        ORDER BY position
        "#,
    )
    .bind(room_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Question::try_from).collect()
}
