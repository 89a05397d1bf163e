use serde::Serialize;

use super::placement::{Country, YearGrade};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSkills {
    pub core_skills: Vec<&'static str>,
    pub extension_skills: Vec<&'static str>,
}

impl BenchmarkSkills {
    pub fn is_core(&self, skill_id: &str) -> bool {
        self.core_skills.contains(&skill_id)
    }

    pub fn is_extension(&self, skill_id: &str) -> bool {
        self.extension_skills.contains(&skill_id)
    }
}

struct Benchmark {
    country: Country,
    year_grade: YearGrade,
    core: &'static [&'static str],
    extension: &'static [&'static str],
}

const fn benchmark(
    country: Country,
    year_grade: YearGrade,
    core: &'static [&'static str],
    extension: &'static [&'static str],
) -> Benchmark {
    Benchmark {
        country,
        year_grade,
        core,
        extension,
    }
}

use Country::{Australia as AU, NewZealand as NZ, UnitedKingdom as UK, UnitedStates as US};
use YearGrade::{Foundation, Grade, Kindergarten, Reception, Year};

static BENCHMARKS: &[Benchmark] = &[
    benchmark(NZ, Year(1), &["NB10", "AS10", "DBL_10"], &["NB20", "DBL_20"]),
    benchmark(NZ, Year(2), &["NB10", "NB20", "AS10", "DBL_10", "DBL_20"], &["AS20", "TT_2_5_10"]),
    benchmark(NZ, Year(3), &["NB20", "AS20", "DBL_20", "TT_2_5_10"], &["NB100", "TT_CORE", "DIV_2_5_10"]),
    benchmark(
        NZ,
        Year(4),
        &["NB100", "AS20", "TT_2_5_10", "TT_CORE", "DIV_2_5_10"],
        &["AS100", "DBL_100", "TT_1_10_ALL", "DIV_CORE"],
    ),
    benchmark(
        NZ,
        Year(5),
        &["NB100", "AS100", "DBL_100", "TT_CORE", "TT_1_10_ALL", "DIV_CORE"],
        &["DIV_1_10_ALL", "SQ_1_10"],
    ),
    benchmark(
        NZ,
        Year(6),
        &["AS100", "TT_1_10_ALL", "DIV_CORE", "DIV_1_10_ALL", "SQ_1_10"],
        &["TT_1_12_ALL", "DIV_1_12_ALL"],
    ),
    benchmark(NZ, Year(7), &["TT_1_10_ALL", "TT_1_12_ALL", "DIV_1_10_ALL", "SQ_1_10"], &["DIV_1_12_ALL", "SQ_1_12"]),
    benchmark(NZ, Year(8), &["TT_1_12_ALL", "DIV_1_12_ALL", "SQ_1_10", "SQ_1_12"], &[]),
    benchmark(AU, Foundation, &["NB10", "AS10"], &["DBL_10"]),
    benchmark(AU, Year(1), &["NB10", "AS10", "DBL_10"], &["NB20", "AS20"]),
    benchmark(AU, Year(2), &["NB20", "AS20", "DBL_20", "TT_2_5_10"], &["NB100", "TT_CORE"]),
    benchmark(
        AU,
        Year(3),
        &["NB100", "AS20", "TT_2_5_10", "TT_CORE", "DIV_2_5_10"],
        &["AS100", "TT_1_10_ALL"],
    ),
    benchmark(AU, Year(4), &["AS100", "DBL_100", "TT_1_10_ALL", "DIV_CORE"], &["DIV_1_10_ALL", "SQ_1_10"]),
    benchmark(AU, Year(5), &["TT_1_10_ALL", "DIV_1_10_ALL", "SQ_1_10"], &["TT_1_12_ALL", "DIV_1_12_ALL"]),
    benchmark(AU, Year(6), &["TT_1_12_ALL", "DIV_1_12_ALL", "SQ_1_10"], &["SQ_1_12"]),
    benchmark(UK, Reception, &["NB10"], &["AS10", "DBL_10"]),
    benchmark(UK, Year(1), &["NB10", "AS10", "DBL_10"], &["NB20", "AS20", "TT_2_5_10"]),
    benchmark(
        UK,
        Year(2),
        &["NB20", "AS20", "DBL_20", "TT_2_5_10", "DIV_2_5_10"],
        &["NB100", "TT_CORE"],
    ),
    benchmark(UK, Year(3), &["NB100", "AS100", "TT_CORE", "DIV_CORE"], &["DBL_100", "TT_1_10_ALL"]),
    benchmark(
        UK,
        Year(4),
        &["TT_1_10_ALL", "TT_1_12_ALL", "DIV_1_10_ALL", "DIV_1_12_ALL"],
        &["SQ_1_10", "SQ_1_12"],
    ),
    benchmark(UK, Year(5), &["TT_1_12_ALL", "DIV_1_12_ALL", "SQ_1_10"], &["SQ_1_12"]),
    benchmark(UK, Year(6), &["TT_1_12_ALL", "DIV_1_12_ALL", "SQ_1_12"], &[]),
    benchmark(US, Kindergarten, &["NB10", "AS10"], &["DBL_10"]),
    benchmark(US, Grade(1), &["NB10", "AS10", "AS20", "DBL_10"], &["NB20", "DBL_20"]),
    benchmark(US, Grade(2), &["NB20", "AS20", "DBL_20"], &["NB100", "AS100", "TT_2_5_10"]),
    benchmark(
        US,
        Grade(3),
        &["AS100", "TT_2_5_10", "TT_CORE", "TT_1_10_ALL", "DIV_2_5_10", "DIV_CORE", "DIV_1_10_ALL"],
        &["TT_1_12_ALL", "SQ_1_10"],
    ),
    benchmark(US, Grade(4), &["TT_1_10_ALL", "DIV_1_10_ALL", "SQ_1_10"], &["TT_1_12_ALL", "DIV_1_12_ALL"]),
    benchmark(US, Grade(5), &["TT_1_12_ALL", "DIV_1_12_ALL", "SQ_1_10"], &["SQ_1_12"]),
    benchmark(US, Grade(6), &["TT_1_12_ALL", "DIV_1_12_ALL", "SQ_1_12"], &[]),
];

/// Core and extension skills for a placement, or `None` when the
/// curriculum for that placement is not configured.
pub fn get_benchmark_skills(country: Country, year_grade: YearGrade) -> Option<BenchmarkSkills> {
    BENCHMARKS
        .iter()
        .find(|b| b.country == country && b.year_grade == year_grade)
        .map(|b| BenchmarkSkills {
            core_skills: b.core.to_vec(),
            extension_skills: b.extension.to_vec(),
        })
}

pub fn supported_benchmarks() -> impl Iterator<Item = (Country, YearGrade)> {
    BENCHMARKS.iter().map(|b| (b.country, b.year_grade))
}
