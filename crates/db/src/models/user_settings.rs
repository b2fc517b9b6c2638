use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// Per-user preferences; currently the climate the calendar is shown for
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct UserSettings {
    pub id: Uuid,
    pub user_id: String,
    pub climate_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateUserSettings {
    pub climate_id: Option<i64>,
}

impl UserSettings {
    pub async fn find_by_user(
        pool: &SqlitePool,
        user_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, UserSettings>(
            r#"SELECT id, user_id, climate_id, created_at, updated_at
               FROM user_settings
               WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create_or_update(
        pool: &SqlitePool,
        user_id: &str,
        climate_id: i64,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, UserSettings>(
            r#"INSERT INTO user_settings (id, user_id, climate_id)
               VALUES ($1, $2, $3)
               ON CONFLICT(user_id) DO UPDATE SET
                   climate_id = excluded.climate_id,
                   updated_at = datetime('now', 'subsec')
               RETURNING id, user_id, climate_id, created_at, updated_at"#,
        )
        .bind(id)
        .bind(user_id)
        .bind(climate_id)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    #[tokio::test]
    async fn create_or_update_keeps_one_row_per_user() {
        let db = DBService::new_in_memory().await.unwrap();
        assert!(
            UserSettings::find_by_user(&db.pool, "alice")
                .await
                .unwrap()
                .is_none()
        );

        let created = UserSettings::create_or_update(&db.pool, "alice", 1)
            .await
            .unwrap();
        let updated = UserSettings::create_or_update(&db.pool, "alice", 2)
            .await
            .unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.climate_id, 2);
    }
}
