use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

use super::vegetable::Unit;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct Harvest {
    pub id: Uuid,
    pub vegetable_id: Option<Uuid>, // Set when the name matched a registered vegetable
    pub vegetable_name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub photo: Option<String>, // Data URL or path, stored as-is
    pub created_at: DateTime<Utc>,
}

/// Request body for recording a harvest
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct CreateHarvest {
    #[serde(default)]
    pub vegetable_name: String,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub photo: Option<String>,
}

/// Validated harvest values
#[derive(Debug, Clone, PartialEq)]
pub struct NewHarvest {
    pub vegetable_id: Option<Uuid>,
    pub vegetable_name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub photo: Option<String>,
}

const HARVEST_COLUMNS: &str =
    "id, vegetable_id, vegetable_name, quantity, unit, date, notes, photo, created_at";

impl Harvest {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Harvest>(&format!(
            "SELECT {HARVEST_COLUMNS}
             FROM harvests
             ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        id: Uuid,
        data: &NewHarvest,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Harvest>(&format!(
            "INSERT INTO harvests (id, vegetable_id, vegetable_name, quantity, unit, date, notes, photo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {HARVEST_COLUMNS}"
        ))
        .bind(id)
        .bind(data.vegetable_id)
        .bind(&data.vegetable_name)
        .bind(data.quantity)
        .bind(data.unit)
        .bind(data.date)
        .bind(&data.notes)
        .bind(&data.photo)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM harvests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DBService;

    fn harvest(day: u32, quantity: f64) -> NewHarvest {
        NewHarvest {
            vegetable_id: None,
            vegetable_name: "tomates".to_string(),
            quantity,
            unit: Unit::G,
            date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            notes: None,
            photo: None,
        }
    }

    #[tokio::test]
    async fn newest_harvest_comes_first() {
        let db = DBService::new_in_memory().await.unwrap();
        Harvest::create(&db.pool, Uuid::new_v4(), &harvest(1, 300.0))
            .await
            .unwrap();
        Harvest::create(&db.pool, Uuid::new_v4(), &harvest(12, 450.0))
            .await
            .unwrap();

        let all = Harvest::find_all(&db.pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].quantity, 450.0);
        assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2026, 8, 12).unwrap());
    }

    #[tokio::test]
    async fn delete_missing_harvest_affects_nothing() {
        let db = DBService::new_in_memory().await.unwrap();
        assert_eq!(Harvest::delete(&db.pool, Uuid::new_v4()).await.unwrap(), 0);
    }
}
