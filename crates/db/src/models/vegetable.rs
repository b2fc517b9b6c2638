use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Unit a vegetable's harvests are counted in
#[derive(
    Debug, Clone, Copy, Type, Serialize, Deserialize, PartialEq, Eq, Hash, TS, EnumString, Display, Default,
)]
#[sqlx(type_name = "unit", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Unit {
    #[default]
    G,
    Kg,
    Pcs,
}

impl Unit {
    /// Grams per unit for weight units, `None` for pieces
    pub fn grams(self) -> Option<f64> {
        match self {
            Unit::G => Some(1.0),
            Unit::Kg => Some(1000.0),
            Unit::Pcs => None,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct Vegetable {
    pub id: Uuid,
    pub name: String,
    pub variety: Option<String>,
    pub unit: Unit,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CreateVegetable {
    #[serde(default)]
    pub name: String,
    pub variety: Option<String>,
    pub unit: Unit,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DeleteVegetable {
    #[serde(default)]
    pub name: String,
    pub variety: Option<String>,
}

impl Vegetable {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Vegetable>(
            r#"SELECT id, name, NULLIF(variety, '') AS variety, unit, image, created_at
               FROM vegetables
               ORDER BY name ASC, variety ASC"#,
        )
        .fetch_all(pool)
        .await
    }

    /// First vegetable registered under `name`, any variety
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Vegetable>(
            r#"SELECT id, name, NULLIF(variety, '') AS variety, unit, image, created_at
               FROM vegetables
               WHERE name = $1
               ORDER BY created_at ASC
               LIMIT 1"#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Inserts the vegetable or refreshes unit and image of the existing (name, variety)
    pub async fn upsert(
        pool: &SqlitePool,
        id: Uuid,
        data: &CreateVegetable,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Vegetable>(
            r#"INSERT INTO vegetables (id, name, variety, unit, image)
               VALUES ($1, $2, COALESCE($3, ''), $4, $5)
               ON CONFLICT(name, variety) DO UPDATE SET
                   unit = excluded.unit,
                   image = excluded.image
               RETURNING id, name, NULLIF(variety, '') AS variety, unit, image, created_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.variety)
        .bind(data.unit)
        .bind(&data.image)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(
        pool: &SqlitePool,
        name: &str,
        variety: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM vegetables WHERE name = $1 AND variety = COALESCE($2, '')")
                .bind(name)
                .bind(variety)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
