use std::sync::Arc;

use crate::curriculum::{get_benchmark_skills, get_skill_by_id, BenchmarkSkills, CatalogError, Country, YearGrade};
use crate::db::{MasteryRepository, RepositoryError};
use crate::engine::clock::{Clock, SystemClock};
use crate::engine::config::EngineConfig;
use crate::services::curriculum_progress::build_curriculum_progress;
use crate::services::fact_classifier;
use crate::services::recommendation::recommend_focus;
use crate::services::skill_progress::{compute_skill_progress, ParsedLedger, SkillMembership};
use crate::types::{CurriculumProgress, Operation, RecommendedSkill, SkillProgress};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("profile not found: {0}")]
    ProfileNotFound(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Read-only facade over a mastery ledger.
///
/// Every call performs one ledger read and recomputes from scratch; nothing is
/// memoised between calls.
pub struct MasteryEngine<R: MasteryRepository> {
    repository: Arc<R>,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl<R: MasteryRepository> Clone for MasteryEngine<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: MasteryRepository> MasteryEngine<R> {
    pub fn new(repository: Arc<R>, config: EngineConfig) -> Self {
        Self {
            repository,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Progress on one skill. Core/extension membership is filled in only
    /// when both placement parts are given.
    pub async fn get_skill_progress(
        &self,
        profile_id: &str,
        skill_id: &str,
        country: Option<Country>,
        year_grade: Option<YearGrade>,
    ) -> Result<SkillProgress, EngineError> {
        let skill = get_skill_by_id(skill_id)?;
        let records = self.repository.get_mastery_records(profile_id).await?;
        let ledger = ParsedLedger::new(&records);

        let benchmark = match (country, year_grade) {
            (Some(country), Some(year_grade)) => get_benchmark_skills(country, year_grade),
            _ => None,
        };
        let membership = SkillMembership::from_benchmark(skill.id, benchmark.as_ref());

        let progress = compute_skill_progress(skill, &ledger, membership, &self.config.proficiency);
        tracing::debug!(
            profile_id,
            skill_id,
            proficiency = progress.proficiency.as_str(),
            coverage = progress.coverage,
            accuracy = progress.accuracy,
            "skill progress computed"
        );
        Ok(progress)
    }

    pub async fn get_curriculum_progress(&self, profile_id: &str) -> Result<CurriculumProgress, EngineError> {
        let profile = self
            .repository
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| EngineError::ProfileNotFound(profile_id.to_string()))?;
        let records = self.repository.get_mastery_records(profile_id).await?;
        Ok(build_curriculum_progress(&profile, &records, self.clock.now(), &self.config))
    }

    /// Up to `max` core skills to practise next, strongest need first.
    pub async fn get_recommended_focus(
        &self,
        profile_id: &str,
        max: usize,
    ) -> Result<Vec<RecommendedSkill>, EngineError> {
        let progress = self.get_curriculum_progress(profile_id).await?;
        Ok(self.get_recommended_focus_from(&progress, max))
    }

    /// Ranks an already computed report without touching the ledger.
    pub fn get_recommended_focus_from(&self, progress: &CurriculumProgress, max: usize) -> Vec<RecommendedSkill> {
        let recommendations = recommend_focus(
            &progress.core_skill_progress,
            self.clock.now(),
            max,
            &self.config.recommendation,
        );
        tracing::debug!(
            max,
            returned = recommendations.len(),
            "recommendations ranked"
        );
        recommendations
    }

    pub fn get_benchmark_skills(country: Country, year_grade: YearGrade) -> Option<BenchmarkSkills> {
        get_benchmark_skills(country, year_grade)
    }

    pub fn does_fact_match_skill(fact: &str, operation: Operation, skill_id: &str) -> bool {
        fact_classifier::does_fact_match_skill(fact, operation, skill_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::db::InMemoryLedger;
    use crate::engine::clock::FixedClock;
    use crate::types::{Attempt, LearnerProfile, Proficiency};

    fn engine(ledger: Arc<InMemoryLedger>) -> MasteryEngine<InMemoryLedger> {
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
        MasteryEngine::new(ledger, EngineConfig::default()).with_clock(Arc::new(FixedClock::new(now)))
    }

    #[tokio::test]
    async fn unknown_skill_is_a_catalog_error() {
        let engine = engine(Arc::new(InMemoryLedger::new()));
        let err = engine.get_skill_progress("p1", "NB11", None, None).await.unwrap_err();
        assert!(matches!(err, EngineError::Catalog(CatalogError::UnknownSkill(id)) if id == "NB11"));
    }

    #[tokio::test]
    async fn skill_progress_membership_needs_full_placement() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.record_attempt(&Attempt {
            profile_id: "p1".to_string(),
            fact: "9+11=20".to_string(),
            operation: Operation::Addition,
            correct: true,
            response_time_ms: 1500,
            at: Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap(),
        });
        let engine = engine(ledger);

        let bare = engine.get_skill_progress("p1", "NB20", None, None).await.unwrap();
        assert!(!bare.is_core && !bare.is_extension);
        assert_eq!(bare.proficiency, Proficiency::Developing);

        let half = engine
            .get_skill_progress("p1", "NB20", Some(Country::NewZealand), None)
            .await
            .unwrap();
        assert!(!half.is_core);

        let placed = engine
            .get_skill_progress("p1", "NB20", Some(Country::NewZealand), Some(YearGrade::Year(3)))
            .await
            .unwrap();
        assert!(placed.is_core && !placed.is_extension);
    }

    #[tokio::test]
    async fn missing_profile_is_reported() {
        let engine = engine(Arc::new(InMemoryLedger::new()));
        let err = engine.get_curriculum_progress("ghost").await.unwrap_err();
        assert!(matches!(err, EngineError::ProfileNotFound(id) if id == "ghost"));
        assert!(engine.get_recommended_focus("ghost", 3).await.is_err());
    }

    #[tokio::test]
    async fn report_is_stamped_with_engine_clock() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.upsert_profile(LearnerProfile::new("p1", "Ana").with_placement(Country::Australia, YearGrade::Year(2)));
        let engine = engine(ledger);
        let report = engine.get_curriculum_progress("p1").await.unwrap();
        assert_eq!(report.calculated_at, Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap());
    }
}
