use sqlx::SqlitePool;

use super::RepositoryError;

pub const LEDGER_SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");
pub const LEDGER_SCHEMA_VERSION: &str = "1";

/// Splits a script on `;`, ignoring separators inside quoted text.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for ch in sql.chars() {
        match ch {
            '\'' if !in_double_quote => in_single_quote = !in_single_quote,
            '"' if !in_single_quote => in_double_quote = !in_double_quote,
            ';' if !in_single_quote && !in_double_quote => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

fn strip_comment_lines(stmt: &str) -> String {
    stmt.lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Creates the ledger tables unless this database already carries them.
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), RepositoryError> {
    let version: Option<String> =
        sqlx::query_scalar(r#"SELECT "value" FROM "_db_metadata" WHERE "key" = 'schema_version'"#)
            .fetch_optional(pool)
            .await
            .unwrap_or(None);

    if version.as_deref() == Some(LEDGER_SCHEMA_VERSION) {
        return Ok(());
    }

    for stmt in split_sql_statements(LEDGER_SCHEMA_SQL) {
        let sql = strip_comment_lines(&stmt);
        let sql = sql.trim();
        if sql.is_empty() {
            continue;
        }
        sqlx::query(sql).execute(pool).await?;
    }

    sqlx::query(r#"INSERT OR REPLACE INTO "_db_metadata" ("key", "value") VALUES ('schema_version', ?)"#)
        .bind(LEDGER_SCHEMA_VERSION)
        .execute(pool)
        .await?;

    tracing::info!(version = LEDGER_SCHEMA_VERSION, "mastery ledger schema applied");
    Ok(())
}
