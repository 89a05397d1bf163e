use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::curriculum::catalog_index;
use crate::engine::config::RecommendationConfig;
use crate::types::{Proficiency, RecommendationReason, RecommendedSkill, SkillProgress};

fn is_stale(progress: &SkillProgress, now: DateTime<Utc>, config: &RecommendationConfig) -> bool {
    progress
        .last_practiced_at
        .is_some_and(|last| now - last >= Duration::days(config.review_after_days))
}

/// Why a core skill should be practised next, or `None` when it needs no
/// attention right now.
pub fn reason_for(
    progress: &SkillProgress,
    now: DateTime<Utc>,
    config: &RecommendationConfig,
) -> Option<RecommendationReason> {
    match progress.proficiency {
        Proficiency::NotStarted => Some(RecommendationReason::NextSkill),
        Proficiency::Developing => {
            let stalled = progress.total_attempts >= config.stalled_attempts
                && progress.mastered_fact_count == 0;
            if progress.accuracy < config.low_accuracy || stalled {
                Some(RecommendationReason::NeedsPractice)
            } else {
                Some(RecommendationReason::InProgress)
            }
        }
        Proficiency::Proficient if is_stale(progress, now, config) => {
            Some(RecommendationReason::Review)
        }
        Proficiency::Proficient => Some(RecommendationReason::InProgress),
        Proficiency::Mastered if is_stale(progress, now, config) => {
            Some(RecommendationReason::Review)
        }
        Proficiency::Mastered => None,
    }
}

/// Ranks core skills into at most `max` recommendations.
///
/// Started work comes before new skills, and new skills before reviews.
/// Within a reason the least covered skill comes first, then catalog order.
/// `priority` is the 1-based rank.
pub fn recommend_focus(
    core: &[SkillProgress],
    now: DateTime<Utc>,
    max: usize,
    config: &RecommendationConfig,
) -> Vec<RecommendedSkill> {
    if max == 0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut candidates: Vec<(RecommendationReason, usize, &SkillProgress)> = core
        .iter()
        .filter(|progress| seen.insert(progress.skill_id.as_str()))
        .filter_map(|progress| {
            let reason = reason_for(progress, now, config)?;
            let order = catalog_index(&progress.skill_id).unwrap_or(usize::MAX);
            Some((reason, order, progress))
        })
        .collect();

    candidates.sort_by_key(|(reason, order, progress)| (reason.band(), progress.coverage, *order));

    candidates
        .into_iter()
        .take(max)
        .enumerate()
        .map(|(rank, (reason, _, progress))| RecommendedSkill {
            skill_id: progress.skill_id.clone(),
            label: progress.label.clone(),
            proficiency: progress.proficiency,
            coverage: progress.coverage,
            reason,
            priority: rank as u32 + 1,
        })
        .collect()
}
