pub mod clubs;
pub mod settings;

pub use clubs::{ClubConfig, ClubDirectory};
pub use settings::{AppConfig, EngineSettings, TextTemplates};
