use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read engine config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid engine config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid engine config: {0}")]
    Invalid(String),
}

/// Cut-offs for the per-skill proficiency ladder. Percentages are compared
/// after rounding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ProficiencyThresholds {
    pub mastered_coverage: u8,
    pub mastered_accuracy: u8,
    pub proficient_coverage: u8,
    pub proficient_accuracy: u8,
}

impl Default for ProficiencyThresholds {
    fn default() -> Self {
        Self {
            mastered_coverage: 90,
            mastered_accuracy: 85,
            proficient_coverage: 50,
            proficient_accuracy: 75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusThresholds {
    /// Share of core skills still not-started or developing above which a
    /// learner is behind.
    pub behind_fraction: f64,
    /// Share of mastered core skills that is ahead on its own.
    pub ahead_mastered_fraction: f64,
    /// Share of mastered core skills that is ahead once any extension skill
    /// has been started.
    pub ahead_with_extension_fraction: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            behind_fraction: 0.5,
            ahead_mastered_fraction: 0.9,
            ahead_with_extension_fraction: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommendationConfig {
    /// Developing skills below this accuracy need practice.
    pub low_accuracy: u8,
    /// Attempts after which a developing skill with no mastered fact is stalled.
    pub stalled_attempts: u64,
    /// Days without practice after which proficient or mastered skills are stale.
    pub review_after_days: i64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            low_accuracy: 60,
            stalled_attempts: 40,
            review_after_days: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub proficiency: ProficiencyThresholds,
    pub status: StatusThresholds,
    pub recommendation: RecommendationConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.proficiency;
        if p.mastered_coverage > 100
            || p.mastered_accuracy > 100
            || p.proficient_coverage > p.mastered_coverage
            || p.proficient_accuracy > p.mastered_accuracy
        {
            return Err(ConfigError::Invalid(
                "proficient thresholds must not exceed mastered thresholds (max 100)".to_string(),
            ));
        }

        let s = &self.status;
        let fractions = [
            s.behind_fraction,
            s.ahead_mastered_fraction,
            s.ahead_with_extension_fraction,
        ];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(ConfigError::Invalid(
                "status fractions must lie in 0..=1".to_string(),
            ));
        }
        if s.ahead_with_extension_fraction > s.ahead_mastered_fraction {
            return Err(ConfigError::Invalid(
                "aheadWithExtensionFraction must not exceed aheadMasteredFraction".to_string(),
            ));
        }

        if self.recommendation.review_after_days < 0 {
            return Err(ConfigError::Invalid(
                "reviewAfterDays must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
