//! Immutable reference data loaded once at startup.

use db::models::{
    calendar_default::DefaultCalendarEntry, climate::Climate, sowing_type::SowingType,
};
use sqlx::SqlitePool;
use tracing::info;

/// Climates, sowing types and the default calendar. Never mutated at runtime;
/// share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CalendarReference {
    pub climates: Vec<Climate>,
    pub sowing_types: Vec<SowingType>,
    pub defaults: Vec<DefaultCalendarEntry>,
}

impl CalendarReference {
    pub async fn load(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let climates = Climate::find_all(pool).await?;
        let sowing_types = SowingType::find_all(pool).await?;
        let defaults = DefaultCalendarEntry::find_all(pool).await?;

        info!(
            climates = climates.len(),
            sowing_types = sowing_types.len(),
            default_entries = defaults.len(),
            "Loaded calendar reference data"
        );

        Ok(Self {
            climates,
            sowing_types,
            defaults,
        })
    }

    pub fn climate(&self, id: i64) -> Option<&Climate> {
        self.climates.iter().find(|c| c.id == id)
    }

    pub fn sowing_type(&self, id: i64) -> Option<&SowingType> {
        self.sowing_types.iter().find(|t| t.id == id)
    }
}
