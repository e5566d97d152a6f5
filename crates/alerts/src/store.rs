//! SQL storage for pending alerts.
//!
//! The store is the sole source of truth for alert existence: an alert is
//! pending exactly as long as its row exists. Every mutating call commits
//! immediately; there are no transactions spanning calls.

use chrono::{DateTime, Utc};
use pricewatch_core::{normalize_symbol, Alert, Direction};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("corrupt alert row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

type AlertRow = (i64, String, String, String, f64, String, DateTime<Utc>);

/// Database handle for alerts.
///
/// Constructed once at startup and cloned into every component that needs
/// it; the pool inside is shared.
#[derive(Clone)]
pub struct AlertStore {
    pool: SqlitePool,
}

impl AlertStore {
    /// Open the database at the given URL and create the schema if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        // A single pooled connection serializes writers and keeps
        // `sqlite::memory:` databases visible across calls.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alerts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id TEXT NOT NULL,
                chat_id TEXT NOT NULL,
                symbol TEXT NOT NULL,
                target REAL NOT NULL,
                direction TEXT NOT NULL,
                created_at DATETIME NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_alerts_owner
            ON alerts(owner_id, created_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new alert and return it with its assigned id.
    /// Duplicate content is permitted; ids are monotonically increasing.
    pub async fn insert(
        &self,
        owner_id: &str,
        chat_id: &str,
        symbol: &str,
        target: f64,
        direction: Direction,
    ) -> Result<Alert, StoreError> {
        let symbol = normalize_symbol(symbol);
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO alerts (owner_id, chat_id, symbol, target, direction, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(owner_id)
        .bind(chat_id)
        .bind(&symbol)
        .bind(target)
        .bind(direction.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Alert {
            id: result.last_insert_rowid(),
            owner_id: owner_id.to_string(),
            chat_id: chat_id.to_string(),
            symbol,
            target,
            direction,
            created_at,
        })
    }

    /// List one owner's alerts, newest first, bounded by `limit`.
    pub async fn list_by_owner(&self, owner_id: &str, limit: i64) -> Result<Vec<Alert>, StoreError> {
        let rows = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT id, owner_id, chat_id, symbol, target, direction, created_at
            FROM alerts
            WHERE owner_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_alert).collect()
    }

    /// Delete an alert only if it belongs to `owner_id`.
    /// Returns whether a row was actually removed.
    pub async fn delete_by_owner(&self, id: i64, owner_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Unconditional deletion, used by the evaluator after a trigger.
    /// Deleting an id that no longer exists is a no-op.
    pub async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM alerts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Full-table read, one per evaluation cycle.
    pub async fn scan_all(&self) -> Result<Vec<Alert>, StoreError> {
        let rows = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT id, owner_id, chat_id, symbol, target, direction, created_at
            FROM alerts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_alert).collect()
    }
}

fn row_to_alert(row: AlertRow) -> Result<Alert, StoreError> {
    let (id, owner_id, chat_id, symbol, target, direction, created_at) = row;
    let direction = direction
        .parse::<Direction>()
        .map_err(|e| StoreError::CorruptRow {
            id,
            reason: e.to_string(),
        })?;

    Ok(Alert {
        id,
        owner_id,
        chat_id,
        symbol,
        target,
        direction,
        created_at,
    })
}
