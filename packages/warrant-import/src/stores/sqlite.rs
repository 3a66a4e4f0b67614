//! SQLite dedup store.
//!
//! A single-file store holding every warrant number ever seen, plus the
//! fugitive each warrant points at. All queries are parameterized.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{StoreError, StoreResult};
use crate::traits::WarrantStore;
use crate::types::{Fugitive, Warrant};

/// SQLite-backed dedup store.
///
/// Uses a single connection: the importer is the only writer. Foreign keys are
/// enforced, so a warrant's fugitive must be recorded before the warrant.
pub struct SqliteWarrantStore {
    pool: SqlitePool,
}

impl SqliteWarrantStore {
    /// Open (or create) the store at `path`.
    pub async fn open(path: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .synchronous(SqliteSynchronous::Full);
        Self::connect(options).await
    }

    /// Create an in-memory store (for testing).
    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect(SqliteConnectOptions::from_str("sqlite::memory:")?).await
    }

    async fn connect(options: SqliteConnectOptions) -> StoreResult<Self> {
        // Keep the one connection alive forever; an in-memory database dies with it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fugitives (
                detail_url TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                dob DATE NOT NULL,
                sex TEXT NOT NULL,
                race TEXT NOT NULL,
                address TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS warrants (
                number TEXT UNIQUE,
                issue_date DATE,
                type TEXT,
                offense TEXT,
                bail_amount TEXT,
                fugitive TEXT,
                FOREIGN KEY(fugitive) REFERENCES fugitives(detail_url)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up a recorded warrant.
    pub async fn get_warrant(&self, number: &str) -> StoreResult<Option<Warrant>> {
        let row = sqlx::query_as::<_, WarrantRow>(
            "SELECT number, issue_date, type, offense, bail_amount, fugitive FROM warrants WHERE number = ?",
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WarrantRow::into_warrant).transpose()
    }

    /// Close the underlying pool, flushing any pending work.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[derive(Debug, FromRow)]
struct WarrantRow {
    number: String,
    issue_date: NaiveDate,
    #[sqlx(rename = "type")]
    kind: String,
    offense: String,
    bail_amount: Option<String>,
    fugitive: String,
}

impl WarrantRow {
    fn into_warrant(self) -> StoreResult<Warrant> {
        let bail_amount = self
            .bail_amount
            .map(|text| Decimal::from_str(&text))
            .transpose()
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok(Warrant {
            number: self.number,
            issue_date: self.issue_date,
            kind: self.kind,
            offense: self.offense,
            bail_amount,
            fugitive_url: self.fugitive,
        })
    }
}

#[async_trait]
impl WarrantStore for SqliteWarrantStore {
    async fn exists(&self, number: &str) -> StoreResult<bool> {
        let found = sqlx::query_scalar::<_, i64>("SELECT 1 FROM warrants WHERE number = ?")
            .bind(number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn insert(&self, warrant: &Warrant) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO warrants (number, issue_date, type, offense, bail_amount, fugitive)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&warrant.number)
        .bind(warrant.issue_date)
        .bind(&warrant.kind)
        .bind(&warrant.offense)
        .bind(warrant.bail_amount.map(|amount| amount.to_string()))
        .bind(&warrant.fugitive_url)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => StoreError::Duplicate {
                number: warrant.number.clone(),
            },
            other => StoreError::Database(other),
        })?;

        Ok(())
    }

    async fn record_fugitive(&self, fugitive: &Fugitive) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO fugitives (detail_url, name, dob, sex, race, address)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fugitive.detail_url)
        .bind(&fugitive.name)
        .bind(fugitive.dob)
        .bind(&fugitive.sex)
        .bind(&fugitive.race)
        .bind(&fugitive.address)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count(&self) -> StoreResult<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM warrants")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as usize)
    }
}
