//! Static registry of curriculum skills.
//!
//! Skills are listed in catalog order; that order is what ranking falls back
//! to when nothing else separates two skills.

use crate::types::Operation;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown skill: {0}")]
    UnknownSkill(String),
}

const CORE_FACTORS: &[i64] = &[2, 3, 4, 5, 8, 10];
const EARLY_FACTORS: &[i64] = &[2, 5, 10];

/// Which historical facts count as practice of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactRule {
    /// Addition whose result is exactly `target`.
    NumberBond { target: i64 },
    /// Addition or subtraction with operands and result in `0..=max`.
    Within { max: i64 },
    /// Multiplication with both factors drawn from `factors`.
    TableSubset { factors: &'static [i64] },
    /// Multiplication with both factors in `1..=max`.
    TableRange { max: i64 },
    /// Division with divisor and quotient drawn from `factors`.
    DivisionSubset { factors: &'static [i64] },
    /// Division with divisor and quotient in `1..=max`.
    DivisionRange { max: i64 },
    /// Addition of a number to itself, addend in `1..=max_addend`.
    Doubles { max_addend: i64 },
    /// Multiplication of a number by itself in `1..=max`.
    Squares { max: i64 },
}

impl FactRule {
    pub fn operations(&self) -> &'static [Operation] {
        match self {
            Self::NumberBond { .. } | Self::Doubles { .. } => &[Operation::Addition],
            Self::Within { .. } => &[Operation::Addition, Operation::Subtraction],
            Self::TableSubset { .. } | Self::TableRange { .. } | Self::Squares { .. } => {
                &[Operation::Multiplication]
            }
            Self::DivisionSubset { .. } | Self::DivisionRange { .. } => &[Operation::Division],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDefinition {
    pub id: &'static str,
    pub label: &'static str,
    /// Distinct facts that together represent full coverage of the skill.
    pub expected_fact_count: u32,
    pub rule: FactRule,
    /// Average response time below which the skill counts as fluent.
    pub fast_response_ms: u32,
}

const fn skill(
    id: &'static str,
    label: &'static str,
    expected_fact_count: u32,
    rule: FactRule,
    fast_response_ms: u32,
) -> SkillDefinition {
    SkillDefinition {
        id,
        label,
        expected_fact_count,
        rule,
        fast_response_ms,
    }
}

static SKILLS: &[SkillDefinition] = &[
    skill("NB10", "Number bonds to 10", 11, FactRule::NumberBond { target: 10 }, 3000),
    skill("NB20", "Number bonds to 20", 21, FactRule::NumberBond { target: 20 }, 3000),
    skill("NB100", "Number bonds to 100", 11, FactRule::NumberBond { target: 100 }, 3000),
    skill("AS10", "Addition and subtraction within 10", 132, FactRule::Within { max: 10 }, 3000),
    skill("AS20", "Addition and subtraction within 20", 462, FactRule::Within { max: 20 }, 4000),
    skill("AS100", "Addition and subtraction within 100", 200, FactRule::Within { max: 100 }, 5000),
    skill("DBL_10", "Doubles to 10", 5, FactRule::Doubles { max_addend: 5 }, 3000),
    skill("DBL_20", "Doubles to 20", 10, FactRule::Doubles { max_addend: 10 }, 3000),
    skill("DBL_100", "Doubles to 100", 50, FactRule::Doubles { max_addend: 50 }, 3000),
    skill("TT_2_5_10", "Times tables: 2, 5 and 10", 9, FactRule::TableSubset { factors: EARLY_FACTORS }, 4000),
    skill("TT_CORE", "Times tables: 2, 3, 4, 5, 8 and 10", 36, FactRule::TableSubset { factors: CORE_FACTORS }, 4000),
    skill("TT_1_10_ALL", "All times tables to 10 × 10", 100, FactRule::TableRange { max: 10 }, 4000),
    skill("TT_1_12_ALL", "All times tables to 12 × 12", 144, FactRule::TableRange { max: 12 }, 4000),
    skill("DIV_2_5_10", "Division facts: 2, 5 and 10", 9, FactRule::DivisionSubset { factors: EARLY_FACTORS }, 5000),
    skill("DIV_CORE", "Division facts: 2, 3, 4, 5, 8 and 10", 36, FactRule::DivisionSubset { factors: CORE_FACTORS }, 5000),
    skill("DIV_1_10_ALL", "All division facts to 100 ÷ 10", 100, FactRule::DivisionRange { max: 10 }, 5000),
    skill("DIV_1_12_ALL", "All division facts to 144 ÷ 12", 144, FactRule::DivisionRange { max: 12 }, 5000),
    skill("SQ_1_10", "Square numbers to 10 × 10", 10, FactRule::Squares { max: 10 }, 3000),
    skill("SQ_1_12", "Square numbers to 12 × 12", 12, FactRule::Squares { max: 12 }, 3000),
];

pub fn all_skills() -> &'static [SkillDefinition] {
    SKILLS
}

pub fn get_skill_by_id(id: &str) -> Result<&'static SkillDefinition, CatalogError> {
    SKILLS
        .iter()
        .find(|skill| skill.id == id)
        .ok_or_else(|| CatalogError::UnknownSkill(id.to_string()))
}

/// Position of a skill in catalog order, if registered.
pub fn catalog_index(id: &str) -> Option<usize> {
    SKILLS.iter().position(|skill| skill.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn skill_ids_are_unique() {
        let ids: HashSet<&str> = all_skills().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), all_skills().len());
    }

    #[test]
    fn lookup_by_id() {
        let skill = get_skill_by_id("TT_CORE").unwrap();
        assert_eq!(skill.expected_fact_count, 36);
        assert_eq!(catalog_index("NB10"), Some(0));
    }

    #[test]
    fn unknown_skill_is_an_error() {
        assert_eq!(
            get_skill_by_id("TT_99"),
            Err(CatalogError::UnknownSkill("TT_99".to_string()))
        );
        assert_eq!(catalog_index("TT_99"), None);
    }

    #[test]
    fn every_skill_expects_at_least_one_fact() {
        assert!(all_skills()
            .iter()
            .all(|s| s.expected_fact_count > 0 && s.fast_response_ms > 0));
    }
}
