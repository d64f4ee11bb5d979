use sqlx::{Pool, Postgres, types::Json};
use uuid::Uuid;

use crate::models::participant::{AnswerRecord, Decision, Ledger, Participant};

#[derive(Debug, sqlx::FromRow)]
pub struct ParticipantRow {
    pub id: Uuid,
    pub room_id: Uuid,
    pub name: String,
    pub options: Json<Ledger>,
    pub progress: i32,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Self {
            id: row.id,
            room_id: row.room_id,
            name: row.name,
            options: row.options.0,
            progress: row.progress,
        }
    }
}

pub async fn create_participant(
    pool: &Pool<Postgres>,
    participant: &Participant,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "participants" (id, room_id, name, options, progress)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(participant.id)
    .bind(participant.room_id)
    .bind(&participant.name)
    .bind(Json(&participant.options))
    .bind(participant.progress)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_participant_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<Participant>, sqlx::Error> {
    let row = sqlx::query_as::<_, ParticipantRow>(
        r#"
        SELECT id, room_id, name, options, progress
        FROM "participants"
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Participant::from))
}

pub async fn get_participants_by_room(
    pool: &Pool<Postgres>,
    room_id: Uuid,
) -> Result<Vec<Participant>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ParticipantRow>(
        r#"
        SELECT id, room_id, name, options, progress
        FROM "participants"
        WHERE room_id = $1
        ORDER BY name COLLATE "C", id
        "#,
    )
    .bind(room_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Participant::from).collect())
}

/// Single-statement key upsert; the row lock taken by UPDATE serializes
/// concurrent writes to the same ledger.
pub async fn upsert_answer(
    pool: &Pool<Postgres>,
    participant_id: Uuid,
    question_id: Uuid,
    record: &AnswerRecord,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE "participants"
        SET options = options || jsonb_build_object($2::text, $3::jsonb),
            progress = (
                SELECT COUNT(*)::int
                FROM jsonb_object_keys(options || jsonb_build_object($2::text, $3::jsonb))
            )
        WHERE id = $1
        "#,
    )
    .bind(participant_id)
    .bind(question_id.to_string())
    .bind(Json(record))
    .execute(pool)
    .await?;

    Ok(row.rows_affected() > 0)
}

pub async fn set_decision(
    pool: &Pool<Postgres>,
    participant_id: Uuid,
    question_id: Uuid,
    decision: Decision,
) -> Result<Option<AnswerRecord>, sqlx::Error> {
    let record = sqlx::query_scalar::<_, Json<AnswerRecord>>(
        r#"
        UPDATE "participants"
        SET options = jsonb_set(options, ARRAY[$2::text, 'decision'], $3::jsonb)
        WHERE id = $1 AND options ? $2::text
        RETURNING options -> $2::text
        "#,
    )
    .bind(participant_id)
    .bind(question_id.to_string())
    .bind(Json(decision))
    .fetch_optional(pool)
    .await?;

    Ok(record.map(|Json(record)| record))
}
