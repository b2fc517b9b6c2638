use std::sync::Arc;

use db::DBService;
use services::services::{
    calendar::{CalendarError, CalendarService},
    garden::GardenService,
    reference::CalendarReference,
    user_settings::SettingsService,
};

use crate::config::Config;

/// Shared handler state. Cloning is cheap: the pool and the reference table
/// are reference counted.
#[derive(Clone)]
pub struct LocalDeployment {
    db: DBService,
    calendar: CalendarService,
    garden: GardenService,
    settings: SettingsService,
    default_user_id: Arc<str>,
}

impl LocalDeployment {
    /// Loads the reference tables once and wires every service to them
    pub async fn new(db: DBService, config: &Config) -> Result<Self, CalendarError> {
        let reference = Arc::new(CalendarReference::load(&db.pool).await?);
        Ok(Self {
            calendar: CalendarService::new(db.clone(), reference.clone()),
            garden: GardenService::new(db.clone()),
            settings: SettingsService::new(db.clone(), reference, config.default_climate_id),
            default_user_id: Arc::from(config.default_user_id.as_str()),
            db,
        })
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn calendar(&self) -> &CalendarService {
        &self.calendar
    }

    pub fn garden(&self) -> &GardenService {
        &self.garden
    }

    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    /// The request's `user_id`, or the configured default when absent or blank
    pub fn user_id<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(&*self.default_user_id)
    }
}
