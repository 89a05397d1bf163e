use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::curriculum::{AgeBand, Country, YearGrade};

const MASTERED_MIN_ATTEMPTS: u32 = 3;
const MASTERED_MIN_ACCURACY: f64 = 0.9;
const MASTERED_MAX_RESPONSE_MS: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "addition" => Some(Self::Addition),
            "subtraction" => Some(Self::Subtraction),
            "multiplication" => Some(Self::Multiplication),
            "division" => Some(Self::Division),
            _ => None,
        }
    }
}

/// Coarse per-fact state written by the attempt-recording path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FactStatus {
    #[default]
    New,
    Learning,
    Mastered,
}

impl FactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Mastered => "mastered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(Self::New),
            "learning" => Some(Self::Learning),
            "mastered" => Some(Self::Mastered),
            _ => None,
        }
    }

    pub fn derive(attempts: u32, correct: u32, avg_response_time: f64) -> Self {
        if attempts == 0 {
            return Self::New;
        }
        let accuracy = correct as f64 / attempts as f64;
        if attempts >= MASTERED_MIN_ATTEMPTS
            && accuracy >= MASTERED_MIN_ACCURACY
            && avg_response_time < MASTERED_MAX_RESPONSE_MS
        {
            Self::Mastered
        } else {
            Self::Learning
        }
    }
}

/// One practice answer as reported by the game loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub profile_id: String,
    pub fact: String,
    pub operation: Operation,
    pub correct: bool,
    pub response_time_ms: u32,
    pub at: DateTime<Utc>,
}

/// One ledger row per distinct fact a learner has attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
    pub profile_id: String,
    pub fact: String,
    pub operation: Operation,
    pub attempts: u32,
    pub correct: u32,
    pub avg_response_time: f64,
    pub last_attempt_at: DateTime<Utc>,
    pub status: FactStatus,
    pub weight: f64,
}

impl MasteryRecord {
    pub fn first_attempt(attempt: &Attempt) -> Self {
        let mut record = Self {
            profile_id: attempt.profile_id.clone(),
            fact: attempt.fact.clone(),
            operation: attempt.operation,
            attempts: 0,
            correct: 0,
            avg_response_time: 0.0,
            last_attempt_at: attempt.at,
            status: FactStatus::New,
            weight: 1.0,
        };
        record.apply_attempt(attempt.correct, attempt.response_time_ms, attempt.at);
        record
    }

    /// Folds one more answer into the counters and the running average.
    pub fn apply_attempt(&mut self, correct: bool, response_time_ms: u32, at: DateTime<Utc>) {
        let previous = self.attempts as f64;
        self.attempts = self.attempts.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
        self.avg_response_time =
            (self.avg_response_time * previous + response_time_ms as f64) / self.attempts as f64;
        if at > self.last_attempt_at {
            self.last_attempt_at = at;
        }
        self.status = FactStatus::derive(self.attempts, self.correct, self.avg_response_time);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub id: String,
    pub name: String,
    pub country: Option<Country>,
    pub year_grade: Option<YearGrade>,
    pub age_band: Option<AgeBand>,
}

impl LearnerProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            country: None,
            year_grade: None,
            age_band: None,
        }
    }

    pub fn with_placement(mut self, country: Country, year_grade: YearGrade) -> Self {
        self.country = Some(country);
        self.year_grade = Some(year_grade);
        self
    }

    pub fn with_age_band(mut self, country: Country, age_band: AgeBand) -> Self {
        self.country = Some(country);
        self.age_band = Some(age_band);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Proficiency {
    NotStarted,
    Developing,
    Proficient,
    Mastered,
}

impl Proficiency {
    pub const ALL: [Proficiency; 4] = [
        Proficiency::NotStarted,
        Proficiency::Developing,
        Proficiency::Proficient,
        Proficiency::Mastered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::Developing => "developing",
            Self::Proficient => "proficient",
            Self::Mastered => "mastered",
        }
    }
}

/// Number of skills in each proficiency bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProficiencyCounts {
    #[serde(rename = "not-started")]
    pub not_started: usize,
    pub developing: usize,
    pub proficient: usize,
    pub mastered: usize,
}

impl ProficiencyCounts {
    pub fn tally<'a>(skills: impl IntoIterator<Item = &'a SkillProgress>) -> Self {
        let mut counts = Self::default();
        for skill in skills {
            match skill.proficiency {
                Proficiency::NotStarted => counts.not_started += 1,
                Proficiency::Developing => counts.developing += 1,
                Proficiency::Proficient => counts.proficient += 1,
                Proficiency::Mastered => counts.mastered += 1,
            }
        }
        counts
    }

    pub fn get(&self, proficiency: Proficiency) -> usize {
        match proficiency {
            Proficiency::NotStarted => self.not_started,
            Proficiency::Developing => self.developing,
            Proficiency::Proficient => self.proficient,
            Proficiency::Mastered => self.mastered,
        }
    }

    pub fn total(&self) -> usize {
        self.not_started + self.developing + self.proficient + self.mastered
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgress {
    pub skill_id: String,
    pub label: String,
    pub proficiency: Proficiency,
    pub accuracy: u8,
    pub coverage: u8,
    pub total_attempts: u64,
    pub total_correct: u64,
    pub avg_response_time: u32,
    pub mastered_fact_count: usize,
    pub is_core: bool,
    pub is_extension: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_practiced_at: Option<DateTime<Utc>>,
}

impl SkillProgress {
    pub fn not_started(skill_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            label: label.into(),
            proficiency: Proficiency::NotStarted,
            accuracy: 0,
            coverage: 0,
            total_attempts: 0,
            total_correct: 0,
            avg_response_time: 0,
            mastered_fact_count: 0,
            is_core: false,
            is_extension: false,
            last_practiced_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OverallStatus {
    #[default]
    Behind,
    OnTrack,
    Ahead,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Behind => "behind",
            Self::OnTrack => "on-track",
            Self::Ahead => "ahead",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumProgress {
    pub country: Option<Country>,
    pub year_grade: Option<YearGrade>,
    pub core_skill_progress: Vec<SkillProgress>,
    pub extension_skill_progress: Vec<SkillProgress>,
    pub core_skill_counts: ProficiencyCounts,
    pub extension_skill_counts: ProficiencyCounts,
    pub overall_percentage: u8,
    pub overall_status: OverallStatus,
    pub calculated_at: DateTime<Utc>,
}

impl CurriculumProgress {
    /// Report for a learner whose curriculum is not configured yet.
    pub fn unconfigured(
        country: Option<Country>,
        year_grade: Option<YearGrade>,
        calculated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            country,
            year_grade,
            core_skill_progress: Vec::new(),
            extension_skill_progress: Vec::new(),
            core_skill_counts: ProficiencyCounts::default(),
            extension_skill_counts: ProficiencyCounts::default(),
            overall_percentage: 0,
            overall_status: OverallStatus::default(),
            calculated_at,
        }
    }

    pub fn has_benchmark(&self) -> bool {
        !self.core_skill_progress.is_empty() || !self.extension_skill_progress.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationReason {
    NeedsPractice,
    InProgress,
    NextSkill,
    Review,
}

impl RecommendationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsPractice => "needs-practice",
            Self::InProgress => "in-progress",
            Self::NextSkill => "next-skill",
            Self::Review => "review",
        }
    }

    /// Ranking band; lower bands are recommended first.
    pub fn band(&self) -> u8 {
        match self {
            Self::NeedsPractice => 0,
            Self::InProgress => 1,
            Self::NextSkill => 2,
            Self::Review => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedSkill {
    pub skill_id: String,
    pub label: String,
    pub proficiency: Proficiency,
    pub coverage: u8,
    pub reason: RecommendationReason,
    pub priority: u32,
}
