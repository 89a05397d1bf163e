use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::sqlite_schema::apply_schema;
use super::{MasteryRepository, RepositoryError};
use crate::curriculum::{AgeBand, Country, YearGrade};
use crate::types::{Attempt, FactStatus, LearnerProfile, MasteryRecord, Operation};

const RECORD_COLUMNS: &str = r#""profileId","fact","operation","attempts","correct","avgResponseTime","lastAttemptAt","status","weight""#;

/// Platform data directory location of the on-device ledger.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tally-mastery")
        .join("ledger.db")
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| RepositoryError::InvalidValue {
            column: "lastAttemptAt",
            value: value.to_string(),
        })
}

fn parse_optional<T: FromStr>(
    row: &SqliteRow,
    column: &'static str,
) -> Result<Option<T>, RepositoryError> {
    let raw: Option<String> = row.try_get(column)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| RepositoryError::InvalidValue {
                column,
                value: value.to_string(),
            }),
    }
}

fn map_profile_row(row: &SqliteRow) -> Result<LearnerProfile, RepositoryError> {
    Ok(LearnerProfile {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        country: parse_optional::<Country>(row, "country")?,
        year_grade: parse_optional::<YearGrade>(row, "yearGrade")?,
        age_band: parse_optional::<AgeBand>(row, "ageBand")?,
    })
}

fn count_column(row: &SqliteRow, column: &'static str) -> Result<u32, RepositoryError> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).map_err(|_| RepositoryError::InvalidValue {
        column,
        value: value.to_string(),
    })
}

fn map_record_row(row: &SqliteRow) -> Result<MasteryRecord, RepositoryError> {
    let operation: String = row.try_get("operation")?;
    let status: String = row.try_get("status")?;
    let last_attempt_at: String = row.try_get("lastAttemptAt")?;

    Ok(MasteryRecord {
        profile_id: row.try_get("profileId")?,
        fact: row.try_get("fact")?,
        operation: Operation::parse(&operation).ok_or_else(|| RepositoryError::InvalidValue {
            column: "operation",
            value: operation.clone(),
        })?,
        attempts: count_column(row, "attempts")?,
        correct: count_column(row, "correct")?,
        avg_response_time: row.try_get("avgResponseTime")?,
        last_attempt_at: parse_timestamp(&last_attempt_at)?,
        status: FactStatus::parse(&status).ok_or_else(|| RepositoryError::InvalidValue {
            column: "status",
            value: status.clone(),
        })?,
        weight: row.try_get("weight")?,
    })
}

/// Mastery ledger stored in a local SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RepositoryError::Io(e.to_string()))?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let options = SqliteConnectOptions::from_str(&db_url)
            .map_err(|e| RepositoryError::Config(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        apply_schema(&pool).await?;
        tracing::info!(path = %db_path.display(), "mastery ledger opened");
        Ok(Self { pool })
    }

    pub async fn open_default() -> Result<Self, RepositoryError> {
        Self::open(default_db_path()).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn upsert_profile(&self, profile: &LearnerProfile) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO "profiles" ("id", "name", "country", "yearGrade", "ageBand")
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT ("id") DO UPDATE SET
              "name" = excluded."name",
              "country" = excluded."country",
              "yearGrade" = excluded."yearGrade",
              "ageBand" = excluded."ageBand"
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(profile.country.map(|c| c.to_string()))
        .bind(profile.year_grade.map(|y| y.to_string()))
        .bind(profile.age_band.map(|a| a.to_string()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Writes a row exactly as given, replacing the row for the same fact.
    pub async fn insert_record(&self, record: &MasteryRecord) -> Result<(), RepositoryError> {
        let sql = format!(
            r#"INSERT OR REPLACE INTO "mastery_records" ({RECORD_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#
        );
        sqlx::query(&sql)
            .bind(&record.profile_id)
            .bind(&record.fact)
            .bind(record.operation.as_str())
            .bind(i64::from(record.attempts))
            .bind(i64::from(record.correct))
            .bind(record.avg_response_time)
            .bind(format_timestamp(&record.last_attempt_at))
            .bind(record.status.as_str())
            .bind(record.weight)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Creates or updates the row for `(profile, fact)` inside one transaction.
    pub async fn record_attempt(&self, attempt: &Attempt) -> Result<MasteryRecord, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            r#"SELECT {RECORD_COLUMNS} FROM "mastery_records" WHERE "profileId" = ? AND "fact" = ?"#
        );
        let existing = sqlx::query(&select)
            .bind(&attempt.profile_id)
            .bind(&attempt.fact)
            .fetch_optional(&mut *tx)
            .await?;

        let record = match existing {
            Some(row) => {
                let mut record = map_record_row(&row)?;
                record.apply_attempt(attempt.correct, attempt.response_time_ms, attempt.at);
                record
            }
            None => MasteryRecord::first_attempt(attempt),
        };

        sqlx::query(
            r#"
            INSERT INTO "mastery_records"
              ("profileId","fact","operation","attempts","correct","avgResponseTime","lastAttemptAt","status","weight")
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT ("profileId","fact") DO UPDATE SET
              "attempts" = excluded."attempts",
              "correct" = excluded."correct",
              "avgResponseTime" = excluded."avgResponseTime",
              "lastAttemptAt" = excluded."lastAttemptAt",
              "status" = excluded."status"
            "#,
        )
        .bind(&record.profile_id)
        .bind(&record.fact)
        .bind(record.operation.as_str())
        .bind(i64::from(record.attempts))
        .bind(i64::from(record.correct))
        .bind(record.avg_response_time)
        .bind(format_timestamp(&record.last_attempt_at))
        .bind(record.status.as_str())
        .bind(record.weight)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    /// Deletes the profile; its mastery records go with it.
    pub async fn delete_profile(&self, profile_id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(r#"DELETE FROM "profiles" WHERE "id" = ?"#)
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl MasteryRepository for SqliteLedger {
    async fn get_mastery_records(&self, profile_id: &str) -> Result<Vec<MasteryRecord>, RepositoryError> {
        let sql = format!(
            r#"SELECT {RECORD_COLUMNS} FROM "mastery_records" WHERE "profileId" = ? ORDER BY "fact""#
        );
        let rows = sqlx::query(&sql)
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match map_record_row(row) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(error = %err, profile_id, "skipping unreadable mastery record"),
            }
        }
        Ok(records)
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<LearnerProfile>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT "id","name","country","yearGrade","ageBand" FROM "profiles" WHERE "id" = ? LIMIT 1"#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_profile_row).transpose()
    }
}
