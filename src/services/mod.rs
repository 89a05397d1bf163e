pub mod curriculum_progress;
pub mod fact_classifier;
pub mod recommendation;
pub mod skill_progress;
