mod common;

use std::sync::Arc;

use tally_mastery::curriculum::{AgeBand, CatalogError};
use tally_mastery::types::{
    LearnerProfile, Operation, OverallStatus, Proficiency, RecommendationReason,
};
use tally_mastery::{Country, EngineError, InMemoryLedger, MasteryEngine, YearGrade};

use common::{attempt, days_ago, engine, nz_year3_core_facts, seed_mastered};

fn nz_year3_ledger() -> Arc<InMemoryLedger> {
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.upsert_profile(
        LearnerProfile::new("kid-1", "Aroha").with_placement(Country::NewZealand, YearGrade::Year(3)),
    );
    ledger
}

#[tokio::test]
async fn fresh_nz_year3_learner_starts_behind() {
    let engine = engine(nz_year3_ledger());

    let progress = engine.get_curriculum_progress("kid-1").await.unwrap();
    assert_eq!(progress.country, Some(Country::NewZealand));
    assert_eq!(progress.year_grade, Some(YearGrade::Year(3)));
    assert_eq!(progress.overall_percentage, 0);
    assert_eq!(progress.overall_status, OverallStatus::Behind);
    assert_eq!(progress.core_skill_counts.not_started, 4);
    assert_eq!(progress.extension_skill_counts.not_started, 3);
    assert!(progress.core_skill_progress.iter().all(|s| s.is_core && !s.is_extension));
    assert!(progress.extension_skill_progress.iter().all(|s| s.is_extension && !s.is_core));

    let focus = engine.get_recommended_focus("kid-1", 3).await.unwrap();
    let ids: Vec<&str> = focus.iter().map(|r| r.skill_id.as_str()).collect();
    assert_eq!(ids, vec!["NB20", "AS20", "DBL_20"]);
    assert!(focus.iter().all(|r| r.reason == RecommendationReason::NextSkill));
    assert_eq!(focus.iter().map(|r| r.priority).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[tokio::test]
async fn fully_mastered_core_is_ahead() {
    let ledger = nz_year3_ledger();
    seed_mastered(&ledger, "kid-1", &nz_year3_core_facts(), days_ago(1));
    let engine = engine(ledger);

    let progress = engine.get_curriculum_progress("kid-1").await.unwrap();
    assert_eq!(progress.core_skill_counts.mastered, 4);
    assert_eq!(progress.overall_percentage, 100);
    assert_eq!(progress.overall_status, OverallStatus::Ahead);

    assert!(engine.get_recommended_focus("kid-1", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn subtraction_gap_keeps_mixed_skill_below_mastered() {
    let ledger = nz_year3_ledger();
    let additions_only: Vec<_> = nz_year3_core_facts()
        .into_iter()
        .filter(|(_, operation)| *operation != Operation::Subtraction)
        .collect();
    seed_mastered(&ledger, "kid-1", &additions_only, days_ago(1));
    let engine = engine(ledger);

    let progress = engine.get_curriculum_progress("kid-1").await.unwrap();
    let as20 = progress
        .core_skill_progress
        .iter()
        .find(|s| s.skill_id == "AS20")
        .unwrap();
    assert_eq!(as20.coverage, 50);
    assert_eq!(as20.proficiency, Proficiency::Proficient);
    assert_eq!(progress.core_skill_counts.mastered, 3);
}

#[tokio::test]
async fn mastered_skills_come_back_for_review_once_stale() {
    let ledger = nz_year3_ledger();
    seed_mastered(&ledger, "kid-1", &nz_year3_core_facts(), days_ago(30));
    let engine = engine(ledger);

    let focus = engine.get_recommended_focus("kid-1", 2).await.unwrap();
    assert_eq!(focus.len(), 2);
    assert!(focus.iter().all(|r| r.reason == RecommendationReason::Review));
    assert_eq!(focus[0].skill_id, "NB20");
}

#[tokio::test]
async fn started_skill_outranks_new_skills() {
    let ledger = nz_year3_ledger();
    for (fact, correct) in [("3+4=7", true), ("12-5=7", true), ("9+6=15", false), ("8+8=16", true)] {
        let operation = if fact.contains('-') { Operation::Subtraction } else { Operation::Addition };
        ledger.record_attempt(&attempt("kid-1", fact, operation, correct, 2500));
    }
    let engine = engine(ledger);

    let focus = engine.get_recommended_focus("kid-1", 1).await.unwrap();
    assert_eq!(focus.len(), 1);
    assert_eq!(focus[0].skill_id, "AS20");
    assert_eq!(focus[0].reason, RecommendationReason::InProgress);
    assert_eq!(focus[0].proficiency, Proficiency::Developing);
}

#[tokio::test]
async fn recommendations_reuse_a_computed_report() {
    let engine = engine(nz_year3_ledger());
    let progress = engine.get_curriculum_progress("kid-1").await.unwrap();
    let from_report = engine.get_recommended_focus_from(&progress, 2);
    let fresh = engine.get_recommended_focus("kid-1", 2).await.unwrap();
    assert_eq!(from_report, fresh);
    assert!(engine.get_recommended_focus_from(&progress, 0).is_empty());
}

#[tokio::test]
async fn year_is_derived_from_age_band() {
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.upsert_profile(
        LearnerProfile::new("kid-2", "Tama").with_age_band(Country::NewZealand, AgeBand::SevenToEight),
    );
    let engine = engine(ledger);

    let progress = engine.get_curriculum_progress("kid-2").await.unwrap();
    assert_eq!(progress.year_grade, Some(YearGrade::Year(3)));
    assert_eq!(progress.core_skill_progress.len(), 4);
}

#[tokio::test]
async fn unconfigured_placement_yields_empty_report() {
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.upsert_profile(LearnerProfile::new("kid-3", "Sam"));
    ledger.upsert_profile(
        LearnerProfile::new("kid-4", "Lee").with_placement(Country::NewZealand, YearGrade::Year(11)),
    );
    ledger.record_attempt(&attempt("kid-3", "3+7=10", Operation::Addition, true, 900));
    let engine = engine(ledger);

    for id in ["kid-3", "kid-4"] {
        let progress = engine.get_curriculum_progress(id).await.unwrap();
        assert!(!progress.has_benchmark());
        assert_eq!(progress.overall_percentage, 0);
        assert_eq!(progress.overall_status, OverallStatus::Behind);
        assert!(engine.get_recommended_focus(id, 3).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn missing_profile_is_an_error() {
    let engine = engine(Arc::new(InMemoryLedger::new()));
    assert!(matches!(
        engine.get_curriculum_progress("nobody").await,
        Err(EngineError::ProfileNotFound(_))
    ));
    assert!(matches!(
        engine.get_recommended_focus("nobody", 3).await,
        Err(EngineError::ProfileNotFound(_))
    ));
}

#[tokio::test]
async fn skill_progress_rejects_unknown_skill() {
    let engine = engine(nz_year3_ledger());
    let err = engine.get_skill_progress("kid-1", "TT_13", None, None).await.unwrap_err();
    assert!(matches!(err, EngineError::Catalog(CatalogError::UnknownSkill(_))));
}

#[tokio::test]
async fn skill_progress_for_profile_without_history_is_not_started() {
    let engine = engine(nz_year3_ledger());
    let progress = engine
        .get_skill_progress("kid-1", "TT_2_5_10", Some(Country::NewZealand), Some(YearGrade::Year(3)))
        .await
        .unwrap();
    assert_eq!(progress.proficiency, Proficiency::NotStarted);
    assert_eq!((progress.accuracy, progress.coverage, progress.total_attempts), (0, 0, 0));
    assert!(progress.last_practiced_at.is_none());
    assert!(progress.is_core);
}

#[test]
fn associated_lookups_delegate_to_curriculum() {
    let benchmark =
        MasteryEngine::<InMemoryLedger>::get_benchmark_skills(Country::NewZealand, YearGrade::Year(3)).unwrap();
    assert_eq!(benchmark.core_skills, vec!["NB20", "AS20", "DBL_20", "TT_2_5_10"]);
    assert!(MasteryEngine::<InMemoryLedger>::does_fact_match_skill("6×7=42", Operation::Multiplication, "TT_1_10_ALL"));
    assert!(!MasteryEngine::<InMemoryLedger>::does_fact_match_skill("6×7=42", Operation::Addition, "TT_1_10_ALL"));
}
