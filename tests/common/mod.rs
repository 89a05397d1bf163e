#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use tally_mastery::types::{Attempt, FactStatus, MasteryRecord, Operation};
use tally_mastery::{EngineConfig, FixedClock, InMemoryLedger, MasteryEngine, MasteryRepository};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 14, 16, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub fn engine_at<R: MasteryRepository>(repository: Arc<R>, at: DateTime<Utc>) -> MasteryEngine<R> {
    MasteryEngine::new(repository, EngineConfig::default()).with_clock(Arc::new(FixedClock::new(at)))
}

pub fn engine<R: MasteryRepository>(repository: Arc<R>) -> MasteryEngine<R> {
    engine_at(repository, now())
}

pub fn attempt(profile_id: &str, fact: &str, operation: Operation, correct: bool, ms: u32) -> Attempt {
    Attempt {
        profile_id: profile_id.to_string(),
        fact: fact.to_string(),
        operation,
        correct,
        response_time_ms: ms,
        at: days_ago(1),
    }
}

/// A fact answered five times, all correct and quickly.
pub fn mastered_record(profile_id: &str, fact: &str, operation: Operation, at: DateTime<Utc>) -> MasteryRecord {
    MasteryRecord {
        profile_id: profile_id.to_string(),
        fact: fact.to_string(),
        operation,
        attempts: 5,
        correct: 5,
        avg_response_time: 1000.0,
        last_attempt_at: at,
        status: FactStatus::Mastered,
        weight: 1.0,
    }
}

/// Every fact of the NZ Year 3 core skills, each one mastered. Additions and
/// subtractions within 20 cover number bonds and doubles as well.
pub fn nz_year3_core_facts() -> Vec<(String, Operation)> {
    let mut facts = Vec::new();
    for a in 0..=20 {
        for b in 0..=(20 - a) {
            facts.push((format!("{}+{}={}", a, b, a + b), Operation::Addition));
        }
        for b in 0..=a {
            facts.push((format!("{}-{}={}", a, b, a - b), Operation::Subtraction));
        }
    }
    for a in [2, 5, 10] {
        for b in [2, 5, 10] {
            facts.push((format!("{}×{}={}", a, b, a * b), Operation::Multiplication));
        }
    }
    facts
}

pub fn seed_mastered(ledger: &InMemoryLedger, profile_id: &str, facts: &[(String, Operation)], at: DateTime<Utc>) {
    for (fact, operation) in facts {
        ledger.insert_record(mastered_record(profile_id, fact, *operation, at));
    }
}
