//! Maps stored arithmetic facts onto curriculum skills.
//!
//! Upstream writers encode facts with mixed glyphs (`7×8`, `7x8=56`,
//! `56 ÷ 8`, `12−5=7`), so every call site goes through [`parse_fact`].

use crate::curriculum::{get_skill_by_id, FactRule};
use crate::types::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Self::Add),
            '-' | '−' | '–' => Some(Self::Subtract),
            '×' | 'x' | 'X' | '*' | '·' => Some(Self::Multiply),
            '÷' | '/' | ':' => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Add => Operation::Addition,
            Self::Subtract => Operation::Subtraction,
            Self::Multiply => Operation::Multiplication,
            Self::Divide => Operation::Division,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedFact {
    pub left: i64,
    pub operator: Operator,
    pub right: i64,
    /// Result as written in the stored fact, if any.
    pub written_result: Option<i64>,
}

impl ParsedFact {
    /// The written result when present, otherwise the computed one.
    /// Inexact division has no result.
    pub fn result(&self) -> Option<i64> {
        if let Some(result) = self.written_result {
            return Some(result);
        }
        match self.operator {
            Operator::Add => self.left.checked_add(self.right),
            Operator::Subtract => self.left.checked_sub(self.right),
            Operator::Multiply => self.left.checked_mul(self.right),
            Operator::Divide => {
                if self.right != 0 && self.left % self.right == 0 {
                    Some(self.left / self.right)
                } else {
                    None
                }
            }
        }
    }

    /// Identity of the question irrespective of glyph or written result.
    pub fn key(&self) -> (i64, Operator, i64) {
        (self.left, self.operator, self.right)
    }
}

fn parse_operand(text: &str) -> Option<i64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parses `a<op>b` or `a<op>b=c`, ignoring whitespace.
pub fn parse_fact(fact: &str) -> Option<ParsedFact> {
    let compact: String = fact.chars().filter(|c| !c.is_whitespace()).collect();
    let (expr, written_result) = match compact.split_once('=') {
        Some((expr, result)) => (expr, Some(parse_operand(result)?)),
        None => (compact.as_str(), None),
    };

    let (split_at, glyph) = expr.char_indices().find(|(_, c)| !c.is_ascii_digit())?;
    let operator = Operator::from_glyph(glyph)?;
    let left = parse_operand(&expr[..split_at])?;
    let right = parse_operand(&expr[split_at + glyph.len_utf8()..])?;

    Some(ParsedFact {
        left,
        operator,
        right,
        written_result,
    })
}

fn in_range(value: i64, min: i64, max: i64) -> bool {
    (min..=max).contains(&value)
}

/// Rule-level match for an already parsed fact.
pub fn fact_matches(parsed: &ParsedFact, operation: Operation, rule: &FactRule) -> bool {
    if parsed.operator.operation() != operation || !rule.operations().contains(&operation) {
        return false;
    }

    let ParsedFact { left, right, .. } = *parsed;
    match *rule {
        FactRule::NumberBond { target } => parsed.result() == Some(target),
        FactRule::Within { max } => {
            in_range(left, 0, max)
                && in_range(right, 0, max)
                && parsed.result().is_some_and(|r| in_range(r, 0, max))
        }
        FactRule::TableSubset { factors } => factors.contains(&left) && factors.contains(&right),
        FactRule::TableRange { max } => in_range(left, 1, max) && in_range(right, 1, max),
        FactRule::DivisionSubset { factors } => parsed
            .result()
            .is_some_and(|quotient| factors.contains(&right) && factors.contains(&quotient)),
        FactRule::DivisionRange { max } => parsed
            .result()
            .is_some_and(|quotient| in_range(right, 1, max) && in_range(quotient, 1, max)),
        FactRule::Doubles { max_addend } => left == right && in_range(left, 1, max_addend),
        FactRule::Squares { max } => left == right && in_range(left, 1, max),
    }
}

/// Whether a stored attempt counts as practice of `skill_id`.
///
/// Malformed facts and unregistered skills never match.
pub fn does_fact_match_skill(fact: &str, operation: Operation, skill_id: &str) -> bool {
    let skill = match get_skill_by_id(skill_id) {
        Ok(skill) => skill,
        Err(err) => {
            tracing::warn!(error = %err, fact, "classifier asked about unregistered skill");
            return false;
        }
    };
    parse_fact(fact).is_some_and(|parsed| fact_matches(&parsed, operation, &skill.rule))
}
