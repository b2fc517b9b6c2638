//! Vegetables and harvest records.

use std::collections::BTreeMap;

use db::{
    DBService,
    models::{
        harvest::{CreateHarvest, Harvest, NewHarvest},
        vegetable::{CreateVegetable, Unit, Vegetable},
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GardenError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
}

/// Totals for one vegetable across all its harvests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct HarvestSummary {
    pub vegetable_name: String,
    pub total_weight_kg: f64,
    pub total_pieces: f64,
    pub harvest_count: i64,
}

/// Groups harvests per vegetable name. Weights are normalized to kilograms,
/// pieces are summed separately.
pub fn summarize_harvests(harvests: &[Harvest]) -> Vec<HarvestSummary> {
    let mut by_name: BTreeMap<&str, HarvestSummary> = BTreeMap::new();
    for harvest in harvests {
        let summary = by_name
            .entry(harvest.vegetable_name.as_str())
            .or_insert_with(|| HarvestSummary {
                vegetable_name: harvest.vegetable_name.clone(),
                total_weight_kg: 0.0,
                total_pieces: 0.0,
                harvest_count: 0,
            });
        match harvest.unit.grams() {
            Some(grams) => summary.total_weight_kg += harvest.quantity * grams / 1000.0,
            None => summary.total_pieces += harvest.quantity,
        }
        summary.harvest_count += 1;
    }
    by_name.into_values().collect()
}

#[derive(Clone)]
pub struct GardenService {
    db: DBService,
}

impl GardenService {
    pub fn new(db: DBService) -> Self {
        Self { db }
    }

    pub async fn list_vegetables(&self) -> Result<Vec<Vegetable>, GardenError> {
        Ok(Vegetable::find_all(&self.db.pool).await?)
    }

    pub async fn upsert_vegetable(&self, data: &CreateVegetable) -> Result<Vegetable, GardenError> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(GardenError::Validation("name is required".to_string()));
        }
        let data = CreateVegetable {
            name: name.to_string(),
            variety: data
                .variety
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            unit: data.unit,
            image: data.image.clone(),
        };

        let vegetable = Vegetable::upsert(&self.db.pool, Uuid::new_v4(), &data).await?;
        info!(vegetable = %vegetable.name, variety = ?vegetable.variety, "Saved vegetable");
        Ok(vegetable)
    }

    pub async fn delete_vegetable(
        &self,
        name: &str,
        variety: Option<&str>,
    ) -> Result<(), GardenError> {
        let variety = variety.map(str::trim).filter(|v| !v.is_empty());
        let rows_affected = Vegetable::delete(&self.db.pool, name.trim(), variety).await?;
        if rows_affected == 0 {
            return Err(GardenError::NotFound("vegetable"));
        }
        info!(vegetable = name, variety, "Deleted vegetable");
        Ok(())
    }

    pub async fn list_harvests(&self) -> Result<Vec<Harvest>, GardenError> {
        Ok(Harvest::find_all(&self.db.pool).await?)
    }

    pub async fn create_harvest(&self, data: &CreateHarvest) -> Result<Harvest, GardenError> {
        let vegetable_name = data.vegetable_name.trim();
        if vegetable_name.is_empty() {
            return Err(GardenError::Validation(
                "vegetable_name is required".to_string(),
            ));
        }
        let quantity = match data.quantity {
            Some(quantity) if quantity.is_finite() && quantity > 0.0 => quantity,
            Some(quantity) => {
                return Err(GardenError::Validation(format!(
                    "quantity must be positive, got {quantity}"
                )));
            }
            None => return Err(GardenError::Validation("quantity is required".to_string())),
        };
        let unit: Unit = data
            .unit
            .ok_or_else(|| GardenError::Validation("unit is required".to_string()))?;
        let date = data
            .date
            .ok_or_else(|| GardenError::Validation("date is required".to_string()))?;

        let vegetable_id = Vegetable::find_by_name(&self.db.pool, vegetable_name)
            .await?
            .map(|v| v.id);
        let new = NewHarvest {
            vegetable_id,
            vegetable_name: vegetable_name.to_string(),
            quantity,
            unit,
            date,
            notes: data.notes.clone(),
            photo: data.photo.clone(),
        };

        let harvest = Harvest::create(&self.db.pool, Uuid::new_v4(), &new).await?;
        info!(
            harvest_id = %harvest.id,
            vegetable = %harvest.vegetable_name,
            quantity = harvest.quantity,
            unit = %harvest.unit,
            "Recorded harvest"
        );
        Ok(harvest)
    }

    pub async fn delete_harvest(&self, id: Uuid) -> Result<(), GardenError> {
        if Harvest::delete(&self.db.pool, id).await? == 0 {
            return Err(GardenError::NotFound("harvest"));
        }
        info!(harvest_id = %id, "Deleted harvest");
        Ok(())
    }

    pub async fn harvest_summary(&self) -> Result<Vec<HarvestSummary>, GardenError> {
        let harvests = self.list_harvests().await?;
        Ok(summarize_harvests(&harvests))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    async fn service() -> GardenService {
        GardenService::new(DBService::new_in_memory().await.unwrap())
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, day).unwrap()
    }

    fn harvest(name: &str, quantity: f64, unit: Unit) -> Harvest {
        Harvest {
            id: Uuid::new_v4(),
            vegetable_id: None,
            vegetable_name: name.to_string(),
            quantity,
            unit,
            date: date(1),
            notes: None,
            photo: None,
            created_at: Utc::now(),
        }
    }

    fn record(name: &str, quantity: Option<f64>) -> CreateHarvest {
        CreateHarvest {
            vegetable_name: name.to_string(),
            quantity,
            unit: Some(Unit::G),
            date: Some(date(14)),
            notes: None,
            photo: None,
        }
    }

    #[test]
    fn summary_normalizes_weights_and_counts_pieces() {
        let harvests = vec![
            harvest("Tomates", 500.0, Unit::G),
            harvest("Courgettes", 3.0, Unit::Pcs),
            harvest("Tomates", 1.5, Unit::Kg),
            harvest("Courgettes", 2.0, Unit::Pcs),
        ];

        let summary = summarize_harvests(&harvests);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].vegetable_name, "Courgettes");
        assert_eq!(summary[0].total_pieces, 5.0);
        assert_eq!(summary[0].total_weight_kg, 0.0);
        assert_eq!(summary[0].harvest_count, 2);
        assert_eq!(summary[1].vegetable_name, "Tomates");
        assert!((summary[1].total_weight_kg - 2.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn vegetable_name_is_required() {
        let service = service().await;
        let data = CreateVegetable {
            name: " ".to_string(),
            variety: None,
            unit: Unit::G,
            image: None,
        };
        assert!(matches!(
            service.upsert_vegetable(&data).await,
            Err(GardenError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn blank_variety_is_the_default_variety() {
        let service = service().await;
        let data = CreateVegetable {
            name: "Radis".to_string(),
            variety: Some("  ".to_string()),
            unit: Unit::Pcs,
            image: None,
        };
        let saved = service.upsert_vegetable(&data).await.unwrap();
        assert_eq!(saved.variety, None);

        service.delete_vegetable("Radis", None).await.unwrap();
        assert!(matches!(
            service.delete_vegetable("Radis", None).await,
            Err(GardenError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn harvest_links_to_registered_vegetable() {
        let service = service().await;
        let vegetable = service
            .upsert_vegetable(&CreateVegetable {
                name: "Tomates".to_string(),
                variety: Some("Cœur de bœuf".to_string()),
                unit: Unit::G,
                image: None,
            })
            .await
            .unwrap();

        let linked = service
            .create_harvest(&record("Tomates", Some(820.0)))
            .await
            .unwrap();
        let unlinked = service
            .create_harvest(&record("Poivrons", Some(200.0)))
            .await
            .unwrap();

        assert_eq!(linked.vegetable_id, Some(vegetable.id));
        assert_eq!(unlinked.vegetable_id, None);
        assert_eq!(service.list_harvests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_harvests_are_rejected() {
        let service = service().await;

        let mut no_unit = record("Tomates", Some(1.0));
        no_unit.unit = None;
        let mut no_date = record("Tomates", Some(1.0));
        no_date.date = None;

        for data in [
            record("", Some(1.0)),
            record("Tomates", None),
            record("Tomates", Some(0.0)),
            record("Tomates", Some(-3.0)),
            no_unit,
            no_date,
        ] {
            assert!(
                matches!(
                    service.create_harvest(&data).await,
                    Err(GardenError::Validation(_))
                ),
                "{data:?}"
            );
        }
        assert!(service.list_harvests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_harvest_and_summary() {
        let service = service().await;
        let first = service
            .create_harvest(&record("Tomates", Some(400.0)))
            .await
            .unwrap();
        service
            .create_harvest(&record("Tomates", Some(600.0)))
            .await
            .unwrap();

        let summary = service.harvest_summary().await.unwrap();
        assert_eq!(summary.len(), 1);
        assert!((summary[0].total_weight_kg - 1.0).abs() < f64::EPSILON);

        service.delete_harvest(first.id).await.unwrap();
        assert!(matches!(
            service.delete_harvest(first.id).await,
            Err(GardenError::NotFound(_))
        ));
        assert_eq!(service.harvest_summary().await.unwrap()[0].harvest_count, 1);
    }
}
