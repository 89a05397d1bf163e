use std::collections::HashSet;

use crate::curriculum::{BenchmarkSkills, FactRule, SkillDefinition};
use crate::engine::config::ProficiencyThresholds;
use crate::services::fact_classifier::{fact_matches, parse_fact, Operator, ParsedFact};
use crate::types::{FactStatus, MasteryRecord, Operation, Proficiency, SkillProgress};

/// A ledger snapshot with every fact parsed once.
///
/// Rows whose fact string cannot be parsed are dropped here so they never
/// reach any skill's statistics.
#[derive(Debug)]
pub struct ParsedLedger<'a> {
    entries: Vec<(ParsedFact, &'a MasteryRecord)>,
    skipped: usize,
}

impl<'a> ParsedLedger<'a> {
    pub fn new(records: &'a [MasteryRecord]) -> Self {
        let mut entries = Vec::with_capacity(records.len());
        let mut skipped = 0;
        for record in records {
            match parse_fact(&record.fact) {
                Some(parsed) => entries.push((parsed, record)),
                None => {
                    skipped += 1;
                    tracing::warn!(
                        profile_id = %record.profile_id,
                        fact = %record.fact,
                        "skipping unparseable mastery record"
                    );
                }
            }
        }
        Self { entries, skipped }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn matching<'s>(
        &'s self,
        rule: &'s FactRule,
    ) -> impl Iterator<Item = (&'s ParsedFact, &'a MasteryRecord)> + 's {
        self.entries
            .iter()
            .filter(move |(parsed, record)| fact_matches(parsed, record.operation, rule))
            .map(|(parsed, record)| (parsed, *record))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillMembership {
    pub is_core: bool,
    pub is_extension: bool,
}

impl SkillMembership {
    pub fn from_benchmark(skill_id: &str, benchmark: Option<&BenchmarkSkills>) -> Self {
        match benchmark {
            Some(b) => Self {
                is_core: b.is_core(skill_id),
                is_extension: b.is_extension(skill_id),
            },
            None => Self::default(),
        }
    }

    pub fn core() -> Self {
        Self {
            is_core: true,
            is_extension: false,
        }
    }

    pub fn extension() -> Self {
        Self {
            is_core: false,
            is_extension: true,
        }
    }
}

fn rounded_percent(numerator: f64, denominator: f64) -> u8 {
    if denominator <= 0.0 {
        return 0;
    }
    (100.0 * numerator / denominator).round().clamp(0.0, 100.0) as u8
}

/// Strictest level first; the first satisfied level wins.
pub fn classify_proficiency(
    coverage: u8,
    accuracy: u8,
    avg_response_time: u32,
    fast_response_ms: u32,
    thresholds: &ProficiencyThresholds,
) -> Proficiency {
    if coverage >= thresholds.mastered_coverage
        && accuracy >= thresholds.mastered_accuracy
        && avg_response_time < fast_response_ms
    {
        Proficiency::Mastered
    } else if coverage >= thresholds.proficient_coverage
        && accuracy >= thresholds.proficient_accuracy
    {
        Proficiency::Proficient
    } else {
        Proficiency::Developing
    }
}

/// Distinct facts counted towards coverage. A rule spanning several
/// operations splits its expected count evenly, and each operation counts at
/// most its share.
fn covered_facts(distinct: &HashSet<(i64, Operator, i64)>, operations: &[Operation], expected: usize) -> usize {
    if operations.len() <= 1 {
        return distinct.len().min(expected);
    }
    let share = (expected / operations.len()).max(1);
    let covered: usize = operations
        .iter()
        .map(|operation| {
            distinct
                .iter()
                .filter(|(_, operator, _)| operator.operation() == *operation)
                .count()
                .min(share)
        })
        .sum();
    covered.min(expected)
}

pub fn compute_skill_progress(
    skill: &SkillDefinition,
    ledger: &ParsedLedger<'_>,
    membership: SkillMembership,
    thresholds: &ProficiencyThresholds,
) -> SkillProgress {
    let mut progress = SkillProgress::not_started(skill.id, skill.label);
    progress.is_core = membership.is_core;
    progress.is_extension = membership.is_extension;

    let mut distinct_facts = HashSet::new();
    let mut total_attempts: u64 = 0;
    let mut total_correct: u64 = 0;
    let mut weighted_time = 0.0;
    let mut mastered_fact_count = 0;
    let mut last_practiced_at = None;

    for (parsed, record) in ledger.matching(&skill.rule) {
        distinct_facts.insert(parsed.key());
        total_attempts += u64::from(record.attempts);
        total_correct += u64::from(record.correct.min(record.attempts));
        weighted_time += record.avg_response_time * f64::from(record.attempts);
        if record.status == FactStatus::Mastered {
            mastered_fact_count += 1;
        }
        if last_practiced_at.map_or(true, |last| record.last_attempt_at > last) {
            last_practiced_at = Some(record.last_attempt_at);
        }
    }

    if total_attempts == 0 {
        return progress;
    }

    let expected = skill.expected_fact_count.max(1) as usize;
    let covered = covered_facts(&distinct_facts, skill.rule.operations(), expected);

    progress.accuracy = rounded_percent(total_correct as f64, total_attempts as f64);
    progress.coverage = rounded_percent(covered as f64, expected as f64);
    progress.avg_response_time = (weighted_time / total_attempts as f64).round().max(0.0) as u32;
    progress.total_attempts = total_attempts;
    progress.total_correct = total_correct;
    progress.mastered_fact_count = mastered_fact_count;
    progress.last_practiced_at = last_practiced_at;
    progress.proficiency = classify_proficiency(
        progress.coverage,
        progress.accuracy,
        progress.avg_response_time,
        skill.fast_response_ms,
        thresholds,
    );
    progress
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::curriculum::get_skill_by_id;
    use crate::types::Operation;

    fn record(fact: &str, operation: Operation, attempts: u32, correct: u32, avg_ms: f64) -> MasteryRecord {
        MasteryRecord {
            profile_id: "p1".to_string(),
            fact: fact.to_string(),
            operation,
            attempts,
            correct,
            avg_response_time: avg_ms,
            last_attempt_at: Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap(),
            status: FactStatus::Learning,
            weight: 1.0,
        }
    }

    fn bonds_to_ten(attempts: u32, correct: u32, avg_ms: f64) -> Vec<MasteryRecord> {
        (0..=10)
            .map(|a| record(&format!("{a}+{}={}", 10 - a, 10), Operation::Addition, attempts, correct, avg_ms))
            .collect()
    }

    fn progress_for(skill_id: &str, records: &[MasteryRecord]) -> SkillProgress {
        let skill = get_skill_by_id(skill_id).unwrap();
        let ledger = ParsedLedger::new(records);
        compute_skill_progress(skill, &ledger, SkillMembership::default(), &ProficiencyThresholds::default())
    }

    #[test]
    fn no_matching_records_is_not_started() {
        let records = vec![record("7×8=56", Operation::Multiplication, 4, 4, 1200.0)];
        let progress = progress_for("NB10", &records);
        assert_eq!(progress.proficiency, Proficiency::NotStarted);
        assert_eq!((progress.accuracy, progress.coverage, progress.total_attempts), (0, 0, 0));
        assert_eq!(progress.last_practiced_at, None);
    }

    #[test]
    fn full_coverage_at_85_percent_fast_is_mastered() {
        let records = bonds_to_ten(20, 17, 1800.0);
        let progress = progress_for("NB10", &records);
        assert_eq!(progress.coverage, 100);
        assert_eq!(progress.accuracy, 85);
        assert_eq!(progress.proficiency, Proficiency::Mastered);
    }

    #[test]
    fn accuracy_84_is_never_mastered() {
        let records = bonds_to_ten(25, 21, 1800.0);
        let progress = progress_for("NB10", &records);
        assert_eq!(progress.accuracy, 84);
        assert_eq!(progress.proficiency, Proficiency::Proficient);
    }

    #[test]
    fn slow_answers_cap_at_proficient() {
        let records = bonds_to_ten(10, 10, 4500.0);
        let progress = progress_for("NB10", &records);
        assert_eq!(progress.proficiency, Proficiency::Proficient);
    }

    #[test]
    fn low_coverage_is_developing() {
        let records = bonds_to_ten(5, 5, 1000.0).into_iter().take(3).collect::<Vec<_>>();
        let progress = progress_for("NB10", &records);
        assert_eq!(progress.coverage, 27);
        assert_eq!(progress.proficiency, Proficiency::Developing);
    }

    #[test]
    fn response_time_is_attempt_weighted() {
        let records = vec![
            record("2+8=10", Operation::Addition, 1, 1, 1000.0),
            record("3+7=10", Operation::Addition, 3, 3, 3000.0),
        ];
        let progress = progress_for("NB10", &records);
        assert_eq!(progress.avg_response_time, 2500);
        assert_eq!(progress.total_attempts, 4);
        assert_eq!(progress.total_correct, 4);
    }

    #[test]
    fn glyph_variants_of_one_fact_cover_once() {
        let records = vec![
            record("3×4=12", Operation::Multiplication, 2, 2, 1500.0),
            record("3 x 4", Operation::Multiplication, 1, 1, 1500.0),
        ];
        let progress = progress_for("TT_CORE", &records);
        assert_eq!(progress.coverage, 3);
        assert_eq!(progress.total_attempts, 3);
    }

    #[test]
    fn tracks_latest_practice_and_mastered_facts() {
        let mut records = bonds_to_ten(3, 3, 1000.0);
        records[4].status = FactStatus::Mastered;
        records[7].status = FactStatus::Mastered;
        let latest = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap() + Duration::days(2);
        records[2].last_attempt_at = latest;
        let progress = progress_for("NB10", &records);
        assert_eq!(progress.mastered_fact_count, 2);
        assert_eq!(progress.last_practiced_at, Some(latest));
    }

    #[test]
    fn unparseable_rows_are_skipped() {
        let records = vec![
            record("three plus seven", Operation::Addition, 9, 0, 9000.0),
            record("3+7=10", Operation::Addition, 1, 1, 900.0),
        ];
        let ledger = ParsedLedger::new(&records);
        assert_eq!((ledger.len(), ledger.skipped()), (1, 1));
        let progress = progress_for("NB10", &records);
        assert_eq!(progress.total_attempts, 1);
        assert_eq!(progress.accuracy, 100);
    }

    fn within_ten(operation: Operation) -> Vec<MasteryRecord> {
        let mut records = Vec::new();
        for a in 0..=10 {
            for b in 0..=10 {
                let fact = match operation {
                    Operation::Addition if a + b <= 10 => format!("{a}+{b}={}", a + b),
                    Operation::Subtraction if b <= a => format!("{a}-{b}={}", a - b),
                    _ => continue,
                };
                records.push(record(&fact, operation, 5, 5, 1000.0));
            }
        }
        records
    }

    #[test]
    fn additions_alone_cannot_master_mixed_skill() {
        let additions = within_ten(Operation::Addition);
        assert_eq!(additions.len(), 66);
        let progress = progress_for("AS10", &additions);
        assert_eq!(progress.coverage, 50);
        assert_eq!(progress.accuracy, 100);
        assert_ne!(progress.proficiency, Proficiency::Mastered);

        let mut both = additions;
        both.extend(within_ten(Operation::Subtraction));
        assert_eq!(both.len(), 132);
        let progress = progress_for("AS10", &both);
        assert_eq!(progress.coverage, 100);
        assert_eq!(progress.proficiency, Proficiency::Mastered);
    }

    #[test]
    fn one_operation_cannot_fill_another_operations_share() {
        let mut records: Vec<MasteryRecord> = (0..=20)
            .flat_map(|a| (0..=20 - a).map(move |b| (a, b)))
            .map(|(a, b)| record(&format!("{a}+{b}={}", a + b), Operation::Addition, 1, 1, 1000.0))
            .collect();
        assert_eq!(records.len(), 231);
        records.push(record("20-7=13", Operation::Subtraction, 1, 1, 1000.0));
        let progress = progress_for("AS20", &records);
        assert_eq!(progress.coverage, 50);
    }

    #[test]
    fn membership_comes_from_benchmark() {
        let skills = crate::curriculum::get_benchmark_skills(
            crate::curriculum::Country::NewZealand,
            crate::curriculum::YearGrade::Year(3),
        );
        let core = SkillMembership::from_benchmark("NB20", skills.as_ref());
        let ext = SkillMembership::from_benchmark("TT_CORE", skills.as_ref());
        let none = SkillMembership::from_benchmark("NB20", None);
        assert_eq!(core, SkillMembership::core());
        assert_eq!(ext, SkillMembership::extension());
        assert_eq!(none, SkillMembership::default());
    }
}
