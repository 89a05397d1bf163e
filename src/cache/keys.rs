use std::time::Duration;

pub const CURRICULUM_PROGRESS_TTL: Duration = Duration::from_secs(5 * 60);
pub const RECOMMENDATIONS_TTL: Duration = Duration::from_secs(5 * 60);

pub fn profile_prefix(profile_id: &str) -> String {
    format!("profile:{}:", profile_id)
}

pub fn curriculum_progress_key(profile_id: &str) -> String {
    format!("profile:{}:curriculum", profile_id)
}

pub fn recommendations_key(profile_id: &str, max: usize) -> String {
    format!("profile:{}:focus:{}", profile_id, max)
}
