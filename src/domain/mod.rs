pub mod identity;
pub mod models;

pub use models::{Action, Dialect, GameSnapshot, Participant, Schedule, SkillLevel, Venue};
