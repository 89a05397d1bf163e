use chrono::{DateTime, Utc};

use crate::curriculum::{get_benchmark_skills, get_skill_by_id, resolve_placement, BenchmarkSkills};
use crate::engine::config::{EngineConfig, ProficiencyThresholds, StatusThresholds};
use crate::services::skill_progress::{compute_skill_progress, ParsedLedger, SkillMembership};
use crate::types::{
    CurriculumProgress, LearnerProfile, MasteryRecord, OverallStatus, Proficiency,
    ProficiencyCounts, SkillProgress,
};

const MASTERED_SCORE: u32 = 100;
const PROFICIENT_SCORE: u32 = 66;
const DEVELOPING_SCORE: u32 = 33;

pub fn skill_score(proficiency: Proficiency) -> u32 {
    match proficiency {
        Proficiency::Mastered => MASTERED_SCORE,
        Proficiency::Proficient => PROFICIENT_SCORE,
        Proficiency::Developing => DEVELOPING_SCORE,
        Proficiency::NotStarted => 0,
    }
}

/// Mean core-skill score, 0 when there are no core skills.
pub fn overall_percentage(core: &[SkillProgress]) -> u8 {
    if core.is_empty() {
        return 0;
    }
    let total: u32 = core.iter().map(|s| skill_score(s.proficiency)).sum();
    (total as f64 / core.len() as f64).round().clamp(0.0, 100.0) as u8
}

pub fn overall_status(
    core_counts: &ProficiencyCounts,
    extension: &[SkillProgress],
    thresholds: &StatusThresholds,
) -> OverallStatus {
    let total = core_counts.total();
    if total == 0 {
        return OverallStatus::Behind;
    }
    let total = total as f64;

    let unfinished = (core_counts.not_started + core_counts.developing) as f64 / total;
    if unfinished > thresholds.behind_fraction {
        return OverallStatus::Behind;
    }

    let mastered = core_counts.mastered as f64 / total;
    let extension_active = extension
        .iter()
        .any(|s| s.proficiency != Proficiency::NotStarted);
    if mastered >= thresholds.ahead_mastered_fraction
        || (extension_active && mastered >= thresholds.ahead_with_extension_fraction)
    {
        OverallStatus::Ahead
    } else {
        OverallStatus::OnTrack
    }
}

/// Progress for each listed skill. A skill that fails to resolve is reported
/// as not started instead of failing the whole list.
pub fn progress_for_skills(
    skill_ids: &[&str],
    ledger: &ParsedLedger<'_>,
    membership: SkillMembership,
    thresholds: &ProficiencyThresholds,
) -> Vec<SkillProgress> {
    skill_ids
        .iter()
        .map(|id| match get_skill_by_id(id) {
            Ok(skill) => compute_skill_progress(skill, ledger, membership, thresholds),
            Err(err) => {
                tracing::warn!(error = %err, skill_id = %id, "benchmark lists an unregistered skill");
                let mut progress = SkillProgress::not_started(*id, *id);
                progress.is_core = membership.is_core;
                progress.is_extension = membership.is_extension;
                progress
            }
        })
        .collect()
}

/// Resolves the learner's benchmark, if the placement is configured.
pub fn benchmark_for(profile: &LearnerProfile) -> Option<BenchmarkSkills> {
    match resolve_placement(profile) {
        (Some(country), Some(year_grade)) => get_benchmark_skills(country, year_grade),
        _ => None,
    }
}

pub fn build_curriculum_progress(
    profile: &LearnerProfile,
    records: &[MasteryRecord],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> CurriculumProgress {
    let (country, year_grade) = resolve_placement(profile);
    let Some(benchmark) = benchmark_for(profile) else {
        tracing::debug!(
            profile_id = %profile.id,
            country = ?country,
            year_grade = ?year_grade,
            "curriculum not configured for profile"
        );
        return CurriculumProgress::unconfigured(country, year_grade, now);
    };

    let ledger = ParsedLedger::new(records);
    let core = progress_for_skills(
        &benchmark.core_skills,
        &ledger,
        SkillMembership::core(),
        &config.proficiency,
    );
    let extension = progress_for_skills(
        &benchmark.extension_skills,
        &ledger,
        SkillMembership::extension(),
        &config.proficiency,
    );

    let core_skill_counts = ProficiencyCounts::tally(&core);
    let extension_skill_counts = ProficiencyCounts::tally(&extension);
    let overall_percentage = overall_percentage(&core);
    let overall_status = overall_status(&core_skill_counts, &extension, &config.status);

    tracing::debug!(
        profile_id = %profile.id,
        records = ledger.len(),
        skipped = ledger.skipped(),
        overall_percentage,
        status = overall_status.as_str(),
        "curriculum progress computed"
    );

    CurriculumProgress {
        country,
        year_grade,
        core_skill_progress: core,
        extension_skill_progress: extension,
        core_skill_counts,
        extension_skill_counts,
        overall_percentage,
        overall_status,
        calculated_at: now,
    }
}
