use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

/// How a vegetable is started
#[derive(Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display)]
#[sqlx(type_name = "sowing_type_code", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SowingTypeCode {
    /// Heated indoor sowing in pots
    IndoorPots,
    /// Cold frame or unheated greenhouse sowing in pots
    OutdoorPots,
    DirectSoil,
    /// Planting out or pricking out seedlings
    Transplant,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct SowingType {
    pub id: i64,
    pub code: SowingTypeCode,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SowingType {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, SowingType>(
            r#"SELECT id, code, name, description, icon, created_at
               FROM sowing_types
               ORDER BY id"#,
        )
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::DBService;

    #[test]
    fn code_round_trips_through_strum() {
        assert_eq!(SowingTypeCode::DirectSoil.to_string(), "direct_soil");
        assert_eq!(
            SowingTypeCode::from_str("indoor_pots").unwrap(),
            SowingTypeCode::IndoorPots
        );
    }

    #[tokio::test]
    async fn seeded_sowing_types_decode() {
        let db = DBService::new_in_memory().await.unwrap();
        let types = SowingType::find_all(&db.pool).await.unwrap();
        let codes: Vec<_> = types.iter().map(|t| t.code).collect();
        assert_eq!(
            codes,
            vec![
                SowingTypeCode::IndoorPots,
                SowingTypeCode::OutdoorPots,
                SowingTypeCode::DirectSoil,
                SowingTypeCode::Transplant
            ]
        );
    }
}
