pub mod calendar_default;
pub mod calendar_override;
pub mod climate;
pub mod harvest;
pub mod sowing_type;
pub mod user_settings;
pub mod vegetable;
