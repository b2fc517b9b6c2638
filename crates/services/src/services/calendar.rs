//! Effective calendar reads and override writes for one user.

use std::sync::Arc;

use chrono::NaiveDate;
use db::{
    DBService,
    models::calendar_override::{
        CalendarOverridePatch, CreateCalendarOverride, NewCalendarOverride,
        UpdateCalendarOverride, UserCalendarOverride,
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;
use utils::decade::{Decade, DecadeError, DecadeInfo, MonthDecades, all_months, current_decade};
use uuid::Uuid;

use super::{
    calendar_resolution::{CalendarFilter, EffectiveCalendarEntry, filter_and_sort, resolve_calendar},
    reference::CalendarReference,
};

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    OutOfRange(#[from] DecadeError),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("calendar override not found")]
    NotFound,
}

/// Effective entry plus the labels the calendar grid shows next to it
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CalendarEntryDisplay {
    #[serde(flatten)]
    #[ts(flatten)]
    pub entry: EffectiveCalendarEntry,
    pub display_sowing_period: String,
    pub display_harvest_period: String,
}

impl From<EffectiveCalendarEntry> for CalendarEntryDisplay {
    fn from(entry: EffectiveCalendarEntry) -> Self {
        Self {
            display_sowing_period: entry.sowing_period_label(),
            display_harvest_period: entry.harvest_period_label(),
            entry,
        }
    }
}

/// Grid header data: every decade, grouped months and today's decade
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct DecadeOverview {
    pub decades: Vec<DecadeInfo>,
    pub months: Vec<MonthDecades>,
    pub current: DecadeInfo,
}

pub fn decade_overview(today: NaiveDate) -> DecadeOverview {
    DecadeOverview {
        decades: Decade::all().map(Decade::info).collect(),
        months: all_months(),
        current: current_decade(today).info(),
    }
}

fn required_decade(field: &str, value: Option<i64>) -> Result<Decade, CalendarError> {
    optional_decade(field, value)?
        .ok_or_else(|| CalendarError::Validation(format!("{field} is required")))
}

fn optional_decade(field: &str, value: Option<i64>) -> Result<Option<Decade>, CalendarError> {
    value
        .map(|v| {
            Decade::new(v).map_err(|_| {
                CalendarError::Validation(format!("{field} must be between 1 and 36, got {v}"))
            })
        })
        .transpose()
}

fn check_growth_duration(days: Option<i32>) -> Result<(), CalendarError> {
    match days {
        Some(days) if days < 0 => Err(CalendarError::Validation(format!(
            "growth_duration_days must not be negative, got {days}"
        ))),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct CalendarService {
    db: DBService,
    reference: Arc<CalendarReference>,
}

impl CalendarService {
    pub fn new(db: DBService, reference: Arc<CalendarReference>) -> Self {
        Self { db, reference }
    }

    pub fn reference(&self) -> &CalendarReference {
        &self.reference
    }

    pub async fn list(
        &self,
        user_id: &str,
        filter: &CalendarFilter,
    ) -> Result<Vec<CalendarEntryDisplay>, CalendarError> {
        let overrides = UserCalendarOverride::find_by_user(&self.db.pool, user_id).await?;
        let resolved = resolve_calendar(&self.reference, &overrides, user_id);
        let entries = filter_and_sort(resolved, filter);
        debug!(
            user_id,
            overrides = overrides.len(),
            entries = entries.len(),
            "Resolved calendar"
        );
        Ok(entries.into_iter().map(CalendarEntryDisplay::from).collect())
    }

    fn validate_new(
        &self,
        user_id: &str,
        data: &CreateCalendarOverride,
    ) -> Result<NewCalendarOverride, CalendarError> {
        let vegetable_name = data.vegetable_name.trim();
        if vegetable_name.is_empty() {
            return Err(CalendarError::Validation(
                "vegetable_name is required".to_string(),
            ));
        }

        let sowing_type_id = data
            .sowing_type_id
            .ok_or_else(|| CalendarError::Validation("sowing_type_id is required".to_string()))?;
        if self.reference.sowing_type(sowing_type_id).is_none() {
            return Err(CalendarError::Validation(format!(
                "unknown sowing_type_id {sowing_type_id}"
            )));
        }
        let climate_id = data
            .climate_id
            .ok_or_else(|| CalendarError::Validation("climate_id is required".to_string()))?;
        if self.reference.climate(climate_id).is_none() {
            return Err(CalendarError::Validation(format!(
                "unknown climate_id {climate_id}"
            )));
        }
        check_growth_duration(data.growth_duration_days)?;

        Ok(NewCalendarOverride {
            user_id: user_id.to_string(),
            vegetable_name: vegetable_name.to_string(),
            climate_id: Some(climate_id),
            sowing_type_id,
            sowing_start_decade: required_decade("sowing_start_decade", data.sowing_start_decade)?,
            sowing_end_decade: required_decade("sowing_end_decade", data.sowing_end_decade)?,
            harvest_start_decade: required_decade(
                "harvest_start_decade",
                data.harvest_start_decade,
            )?,
            harvest_end_decade: required_decade("harvest_end_decade", data.harvest_end_decade)?,
            growth_duration_days: data.growth_duration_days,
            notes: data.notes.clone(),
            is_active: data.is_active.unwrap_or(true),
        })
    }

    /// Creates the user's override for the key, or updates the existing one
    pub async fn upsert_override(
        &self,
        user_id: &str,
        data: &CreateCalendarOverride,
    ) -> Result<UserCalendarOverride, CalendarError> {
        let new = self.validate_new(user_id, data)?;
        let row = UserCalendarOverride::upsert(&self.db.pool, Uuid::new_v4(), &new).await?;
        info!(
            user_id,
            override_id = %row.id,
            vegetable = %row.vegetable_name,
            sowing_type_id = row.sowing_type_id,
            "Saved calendar override"
        );
        Ok(row)
    }

    pub async fn update_override(
        &self,
        id: Uuid,
        user_id: &str,
        data: &UpdateCalendarOverride,
    ) -> Result<UserCalendarOverride, CalendarError> {
        check_growth_duration(data.growth_duration_days)?;
        let patch = CalendarOverridePatch {
            sowing_start_decade: optional_decade("sowing_start_decade", data.sowing_start_decade)?,
            sowing_end_decade: optional_decade("sowing_end_decade", data.sowing_end_decade)?,
            harvest_start_decade: optional_decade(
                "harvest_start_decade",
                data.harvest_start_decade,
            )?,
            harvest_end_decade: optional_decade("harvest_end_decade", data.harvest_end_decade)?,
            growth_duration_days: data.growth_duration_days,
            notes: data.notes.clone(),
            is_active: data.is_active,
        };
        if patch.is_empty() {
            return Err(CalendarError::Validation(
                "no fields to update".to_string(),
            ));
        }

        let row = UserCalendarOverride::update(&self.db.pool, id, user_id, &patch)
            .await?
            .ok_or(CalendarError::NotFound)?;
        info!(user_id, override_id = %id, "Updated calendar override");
        Ok(row)
    }

    pub async fn delete_override(&self, id: Uuid, user_id: &str) -> Result<(), CalendarError> {
        let rows_affected = UserCalendarOverride::delete(&self.db.pool, id, user_id).await?;
        if rows_affected == 0 {
            return Err(CalendarError::NotFound);
        }
        info!(user_id, override_id = %id, "Deleted calendar override");
        Ok(())
    }
}
