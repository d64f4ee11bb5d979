use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction, types::Json};
use uuid::Uuid;

use crate::models::room::{Room, RoomSettings, RoomStatus};

const ROOM_COLUMNS: &str = r#"
    id,
    name,
    duration,
    status,
    owner,
    restrict_participants,
    prevent_copying,
    randomize_questions,
    show_one_question_at_time,
    participant_list,
    number_of_questions,
    created_at,
    updated_at,
    deleted_at
"#;

#[derive(Debug, sqlx::FromRow)]
pub struct RoomRow {
    pub id: Uuid,
    pub name: String,
    pub duration: Option<i32>,
    pub status: RoomStatus,
    pub owner: String,
    #[sqlx(flatten)]
    pub settings: RoomSettings,
    pub participant_list: Json<Vec<String>>,
    pub number_of_questions: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            status: row.status,
            duration: row.duration,
            owner: row.owner,
            settings: row.settings,
            participant_allow_list: row.participant_list.0,
            number_of_questions: row.number_of_questions,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

pub async fn create_room(
    tx: &mut Transaction<'_, Postgres>,
    room: &Room,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO "rooms" (
            id, name, duration, status, owner,
            restrict_participants, prevent_copying, randomize_questions, show_one_question_at_time,
            participant_list, number_of_questions, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(room.id)
    .bind(&room.name)
    .bind(room.duration)
    .bind(room.status)
    .bind(&room.owner)
    .bind(room.settings.restrict_participants)
    .bind(room.settings.prevent_copying)
    .bind(room.settings.randomize_questions)
    .bind(room.settings.show_one_question_at_time)
    .bind(Json(&room.participant_allow_list))
    .bind(room.number_of_questions)
    .bind(room.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn get_room_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Room>, sqlx::Error> {
    let query = format!(
        r#"SELECT {} FROM "rooms" WHERE id = $1 AND deleted_at IS NULL"#,
        ROOM_COLUMNS
    );

    let row = sqlx::query_as::<_, RoomRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Room::from))
}

pub async fn get_room_by_name(
    pool: &Pool<Postgres>,
    name: &str,
) -> Result<Option<Room>, sqlx::Error> {
    let query = format!(
        r#"SELECT {} FROM "rooms" WHERE name = $1 AND deleted_at IS NULL"#,
        ROOM_COLUMNS
    );

    let row = sqlx::query_as::<_, RoomRow>(&query)
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Room::from))
}

pub async fn get_rooms_by_owner(
    pool: &Pool<Postgres>,
    owner: &str,
) -> Result<Vec<Room>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {} FROM "rooms"
        WHERE owner = $1 AND deleted_at IS NULL
        ORDER BY created_at
        "#,
        ROOM_COLUMNS
    );

    let rows = sqlx::query_as::<_, RoomRow>(&query)
        .bind(owner)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(Room::from).collect())
}

pub async fn update_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: RoomStatus,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE "rooms"
        SET status = $2, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(row.rows_affected() > 0)
}

pub async fn update_settings(
    pool: &Pool<Postgres>,
    id: Uuid,
    settings: RoomSettings,
    duration: Option<i32>,
    allow_list: &[String],
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE "rooms"
        SET restrict_participants = $2,
            prevent_copying = $3,
            randomize_questions = $4,
            show_one_question_at_time = $5,
            duration = $6,
            participant_list = $7,
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .bind(settings.restrict_participants)
    .bind(settings.prevent_copying)
    .bind(settings.randomize_questions)
    .bind(settings.show_one_question_at_time)
    .bind(duration)
    .bind(Json(allow_list))
    .execute(pool)
    .await?;

    Ok(row.rows_affected() > 0)
}

pub async fn soft_delete(pool: &Pool<Postgres>, id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        UPDATE "rooms"
        SET deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(row.rows_affected() > 0)
}
