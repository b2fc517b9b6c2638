use std::sync::Arc;

use db::{
    DBService,
    models::user_settings::{UpdateUserSettings, UserSettings},
};
use thiserror::Error;
use tracing::info;

use super::reference::CalendarReference;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Clone)]
pub struct SettingsService {
    db: DBService,
    reference: Arc<CalendarReference>,
    default_climate_id: i64,
}

impl SettingsService {
    pub fn new(db: DBService, reference: Arc<CalendarReference>, default_climate_id: i64) -> Self {
        Self {
            db,
            reference,
            default_climate_id,
        }
    }

    /// Settings of `user_id`, created with the default climate on first access
    pub async fn get_or_create(&self, user_id: &str) -> Result<UserSettings, SettingsError> {
        if let Some(settings) = UserSettings::find_by_user(&self.db.pool, user_id).await? {
            return Ok(settings);
        }
        let settings =
            UserSettings::create_or_update(&self.db.pool, user_id, self.default_climate_id).await?;
        info!(user_id, climate_id = settings.climate_id, "Created user settings");
        Ok(settings)
    }

    pub async fn update(
        &self,
        user_id: &str,
        data: &UpdateUserSettings,
    ) -> Result<UserSettings, SettingsError> {
        let climate_id = data
            .climate_id
            .ok_or_else(|| SettingsError::Validation("climate_id is required".to_string()))?;
        if self.reference.climate(climate_id).is_none() {
            return Err(SettingsError::Validation(format!(
                "unknown climate_id {climate_id}"
            )));
        }
        let settings = UserSettings::create_or_update(&self.db.pool, user_id, climate_id).await?;
        info!(user_id, climate_id, "Updated user settings");
        Ok(settings)
    }
}
