use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use utils::decade::Decade;
use uuid::Uuid;

/// Baseline sowing/harvest window for a vegetable, climate and sowing type.
/// Seeded by migrations and never written by user actions.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct DefaultCalendarEntry {
    pub id: Uuid,
    pub vegetable_name: String,
    pub climate_id: i64,
    pub sowing_type_id: i64,
    pub sowing_start_decade: Decade,
    pub sowing_end_decade: Decade,
    pub harvest_start_decade: Decade,
    pub harvest_end_decade: Decade,
    pub growth_duration_days: Option<i32>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

impl DefaultCalendarEntry {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DefaultCalendarEntry>(
            r#"SELECT
                id,
                vegetable_name,
                climate_id,
                sowing_type_id,
                sowing_start_decade,
                sowing_end_decade,
                harvest_start_decade,
                harvest_end_decade,
                growth_duration_days,
                notes,
                source
            FROM default_calendar_entries
            ORDER BY vegetable_name ASC, climate_id ASC, sowing_start_decade ASC"#,
        )
        .fetch_all(pool)
        .await
    }
}
