//! Code store - SQLite table of issued codes
//!
//! Rows are created by the issuer and mutated exactly once by
//! [`CodeStore::consume`]; nothing is ever deleted.

use std::path::Path;

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// A persisted redemption code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRecord {
    pub id: i64,
    pub code: String,
    pub used: bool,
    /// RFC 3339 creation timestamp
    pub issued_at: String,
    /// RFC 3339 consumption timestamp, set when `used` flips
    pub used_at: Option<String>,
}

/// SQLite-backed store of issued codes
#[derive(Clone)]
pub struct CodeStore {
    pool: SqlitePool,
}

impl CodeStore {
    /// Connect to the store at the given sqlx URL and ensure the schema
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePool::connect(url).await?;
        let store = Self { pool };
        store.init().await?;
        info!(%url, "code store ready");
        Ok(store)
    }

    /// Open a store backed by a database file, creating it if missing
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self, sqlx::Error> {
        let url = format!("sqlite:{}?mode=rwc", db_path.as_ref().display());
        Self::connect(&url).await
    }

    /// Initialize the schema
    async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS codes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT NOT NULL UNIQUE,
                used INTEGER NOT NULL DEFAULT 0,
                issued_at TEXT NOT NULL,
                used_at TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a freshly generated code as unused.
    ///
    /// Returns `false` when the code already exists (UNIQUE violation);
    /// every other failure is a database error.
    pub async fn try_insert(&self, code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO codes (code, used, issued_at)
            VALUES (?, 0, ?)
            "#,
        )
        .bind(code)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) if e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation()) =>
            {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Atomically consume a code: mark it used if and only if it exists and
    /// is still unused.
    ///
    /// The compare-and-set lives in the UPDATE itself, so two concurrent
    /// callers racing on the same code see at most one `true` between them.
    pub async fn consume(&self, code: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE codes
            SET used = 1, used_at = ?
            WHERE code = ? AND used = 0
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Look up a code record by exact string match
    pub async fn get(&self, code: &str) -> Result<Option<CodeRecord>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, code, used, issued_at, used_at
            FROM codes
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| CodeRecord {
            id: row.get("id"),
            code: row.get("code"),
            used: row.get::<i64, _>("used") != 0,
            issued_at: row.get("issued_at"),
            used_at: row.get("used_at"),
        }))
    }
}
