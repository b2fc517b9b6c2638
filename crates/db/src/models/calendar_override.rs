use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::decade::Decade;
use uuid::Uuid;

/// A user's replacement for the default windows of a vegetable and sowing type.
/// Unique on (user_id, vegetable_name, sowing_type_id, sowing_start_decade).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct UserCalendarOverride {
    pub id: Uuid,
    pub user_id: String,
    pub vegetable_name: String,
    pub climate_id: Option<i64>,
    pub sowing_type_id: i64,
    pub sowing_start_decade: Decade,
    pub sowing_end_decade: Decade,
    pub harvest_start_decade: Decade,
    pub harvest_end_decade: Decade,
    pub growth_duration_days: Option<i32>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating (or re-submitting) an override.
/// Decades arrive unchecked and are validated before anything is written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateCalendarOverride {
    #[serde(default)]
    pub vegetable_name: String,
    pub climate_id: Option<i64>,
    pub sowing_type_id: Option<i64>,
    pub sowing_start_decade: Option<i64>,
    pub sowing_end_decade: Option<i64>,
    pub harvest_start_decade: Option<i64>,
    pub harvest_end_decade: Option<i64>,
    pub growth_duration_days: Option<i32>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Request body for a partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct UpdateCalendarOverride {
    pub sowing_start_decade: Option<i64>,
    pub sowing_end_decade: Option<i64>,
    pub harvest_start_decade: Option<i64>,
    pub harvest_end_decade: Option<i64>,
    pub growth_duration_days: Option<i32>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Validated values for an upsert
#[derive(Debug, Clone, PartialEq)]
pub struct NewCalendarOverride {
    pub user_id: String,
    pub vegetable_name: String,
    pub climate_id: Option<i64>,
    pub sowing_type_id: i64,
    pub sowing_start_decade: Decade,
    pub sowing_end_decade: Decade,
    pub harvest_start_decade: Decade,
    pub harvest_end_decade: Decade,
    pub growth_duration_days: Option<i32>,
    pub notes: Option<String>,
    pub is_active: bool,
}

/// Validated partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarOverridePatch {
    pub sowing_start_decade: Option<Decade>,
    pub sowing_end_decade: Option<Decade>,
    pub harvest_start_decade: Option<Decade>,
    pub harvest_end_decade: Option<Decade>,
    pub growth_duration_days: Option<i32>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

impl CalendarOverridePatch {
    pub fn is_empty(&self) -> bool {
        *self == CalendarOverridePatch::default()
    }
}

const OVERRIDE_COLUMNS: &str = r#"
    id,
    user_id,
    vegetable_name,
    climate_id,
    sowing_type_id,
    sowing_start_decade,
    sowing_end_decade,
    harvest_start_decade,
    harvest_end_decade,
    growth_duration_days,
    notes,
    is_active,
    created_at,
    updated_at"#;

impl UserCalendarOverride {
    pub async fn find_by_user(
        pool: &SqlitePool,
        user_id: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserCalendarOverride>(&format!(
            "SELECT {OVERRIDE_COLUMNS}
             FROM user_calendar_overrides
             WHERE user_id = $1
             ORDER BY vegetable_name ASC, sowing_start_decade ASC, created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Inserts the override, or updates the end/harvest windows, duration,
    /// notes and activity of the row already holding the same key.
    pub async fn upsert(
        pool: &SqlitePool,
        id: Uuid,
        data: &NewCalendarOverride,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UserCalendarOverride>(&format!(
            "INSERT INTO user_calendar_overrides (
                id,
                user_id,
                vegetable_name,
                climate_id,
                sowing_type_id,
                sowing_start_decade,
                sowing_end_decade,
                harvest_start_decade,
                harvest_end_decade,
                growth_duration_days,
                notes,
                is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT(user_id, vegetable_name, sowing_type_id, sowing_start_decade) DO UPDATE SET
                sowing_end_decade = excluded.sowing_end_decade,
                harvest_start_decade = excluded.harvest_start_decade,
                harvest_end_decade = excluded.harvest_end_decade,
                growth_duration_days = excluded.growth_duration_days,
                notes = excluded.notes,
                is_active = excluded.is_active,
                updated_at = datetime('now', 'subsec')
            RETURNING {OVERRIDE_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.user_id)
        .bind(&data.vegetable_name)
        .bind(data.climate_id)
        .bind(data.sowing_type_id)
        .bind(data.sowing_start_decade)
        .bind(data.sowing_end_decade)
        .bind(data.harvest_start_decade)
        .bind(data.harvest_end_decade)
        .bind(data.growth_duration_days)
        .bind(&data.notes)
        .bind(data.is_active)
        .fetch_one(pool)
        .await
    }

    /// Applies `patch` to the user's override. `None` when no such row exists.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        user_id: &str,
        patch: &CalendarOverridePatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserCalendarOverride>(&format!(
            "UPDATE user_calendar_overrides
             SET sowing_start_decade = COALESCE($3, sowing_start_decade),
                 sowing_end_decade = COALESCE($4, sowing_end_decade),
                 harvest_start_decade = COALESCE($5, harvest_start_decade),
                 harvest_end_decade = COALESCE($6, harvest_end_decade),
                 growth_duration_days = COALESCE($7, growth_duration_days),
                 notes = COALESCE($8, notes),
                 is_active = COALESCE($9, is_active),
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1 AND user_id = $2
             RETURNING {OVERRIDE_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(patch.sowing_start_decade)
        .bind(patch.sowing_end_decade)
        .bind(patch.harvest_start_decade)
        .bind(patch.harvest_end_decade)
        .bind(patch.growth_duration_days)
        .bind(&patch.notes)
        .bind(patch.is_active)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid, user_id: &str) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_calendar_overrides WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_for_user(pool: &SqlitePool, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_calendar_overrides WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
