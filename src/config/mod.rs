pub mod settings;

pub use settings::{AppConfig, DatabaseSettings, KFactorSchedule, RatingSettings, ServerSettings};
