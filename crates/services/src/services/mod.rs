pub mod calendar;
pub mod calendar_resolution;
pub mod garden;
pub mod reference;
pub mod user_settings;
