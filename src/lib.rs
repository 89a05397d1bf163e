//! Curriculum-aligned mastery reporting for mental arithmetic practice.
//!
//! Raw per-fact practice history is rolled up into per-skill proficiency,
//! benchmarked against a learner's country and school year, and ranked into
//! a short list of skills to practise next.

pub mod cache;
pub mod config;
pub mod curriculum;
pub mod db;
pub mod engine;
pub mod logging;
pub mod services;
pub mod types;

pub use cache::ProgressCache;
pub use curriculum::{get_benchmark_skills, get_skill_by_id, BenchmarkSkills, Country, YearGrade};
pub use db::{InMemoryLedger, MasteryRepository, RepositoryError, SqliteLedger};
pub use engine::{Clock, EngineConfig, EngineError, FixedClock, MasteryEngine, SystemClock};
pub use services::fact_classifier::does_fact_match_skill;
pub use types::*;
