pub mod benchmarks;
pub mod catalog;
pub mod placement;

pub use benchmarks::{get_benchmark_skills, supported_benchmarks, BenchmarkSkills};
pub use catalog::{all_skills, catalog_index, get_skill_by_id, CatalogError, FactRule, SkillDefinition};
pub use placement::{year_for_age, AgeBand, Country, PlacementError, YearGrade};

use crate::types::LearnerProfile;

/// Country and year for a learner, deriving the year from the age band when
/// it has not been set. The country is never guessed.
pub fn resolve_placement(profile: &LearnerProfile) -> (Option<Country>, Option<YearGrade>) {
    let year_grade = match (profile.year_grade, profile.country, profile.age_band) {
        (Some(year), _, _) => Some(year),
        (None, Some(country), Some(band)) => Some(year_for_age(country, band)),
        _ => None,
    };
    (profile.country, year_grade)
}
