pub mod clock;
pub mod config;
pub mod mastery_engine;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig, ProficiencyThresholds, RecommendationConfig, StatusThresholds};
pub use mastery_engine::{EngineError, MasteryEngine};
