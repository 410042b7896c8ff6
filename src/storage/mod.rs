//! Persistence layer.
//!
//! A small SQLite record store used as a cache for FPL API payloads.
//! Payloads are stored as JSON text alongside the time they were fetched
//! and, for picks, whether the gameweek was already finished.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::{debug, info};

use crate::types::{BootstrapStatic, GameweekPicks};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS bootstrap_cache (
        gameweek    INTEGER PRIMARY KEY,
        data        TEXT NOT NULL,
        fetched_at  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS manager_picks (
        manager_id    INTEGER NOT NULL,
        gameweek      INTEGER NOT NULL,
        data          TEXT NOT NULL,
        is_completed  INTEGER NOT NULL DEFAULT 0,
        fetched_at    TEXT NOT NULL,
        PRIMARY KEY (manager_id, gameweek)
    )
    "#,
];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A cached payload with its fetch metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord<T> {
    pub data: T,
    pub fetched_at: DateTime<Utc>,
    /// Completed gameweeks never change upstream, so they never expire.
    pub is_completed: bool,
}

impl<T> CacheRecord<T> {
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    /// Whether the record can be served without refetching.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.is_completed || self.age(now) < ttl
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// SQLite-backed cache store. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct CacheStore {
    pool: SqlitePool,
}

impl CacheStore {
    /// Open (creating if needed) the database at `database_url` and make
    /// sure the cache tables exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid cache database URL: {database_url}"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open cache database: {database_url}"))?;

        let store = Self { pool };
        store.init_schema().await?;
        info!(database_url, "Cache store ready");
        Ok(store)
    }

    /// A private in-memory database. A single pinned connection keeps the
    /// data alive for the lifetime of the pool.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory cache database")?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to create cache schema")?;
        }
        Ok(())
    }

    // -- Bootstrap -------------------------------------------------------

    pub async fn get_bootstrap(&self, gameweek: u32) -> Result<Option<CacheRecord<BootstrapStatic>>> {
        let row = sqlx::query(
            "SELECT data, fetched_at, 0 AS is_completed FROM bootstrap_cache WHERE gameweek = ?",
        )
        .bind(i64::from(gameweek))
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read bootstrap cache")?;

        row.as_ref().map(record_from_row).transpose()
    }

    pub async fn put_bootstrap(
        &self,
        gameweek: u32,
        data: &BootstrapStatic,
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bootstrap_cache (gameweek, data, fetched_at)
            VALUES (?, ?, ?)
            ON CONFLICT (gameweek) DO UPDATE SET
                data = excluded.data,
                fetched_at = excluded.fetched_at
            "#,
        )
        .bind(i64::from(gameweek))
        .bind(to_json(data)?)
        .bind(fetched_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to write bootstrap cache")?;

        debug!(gameweek, "Bootstrap cached");
        Ok(())
    }

    // -- Manager picks ---------------------------------------------------

    pub async fn get_picks(
        &self,
        manager_id: u64,
        gameweek: u32,
    ) -> Result<Option<CacheRecord<GameweekPicks>>> {
        let row = sqlx::query(
            r#"
            SELECT data, fetched_at, is_completed FROM manager_picks
            WHERE manager_id = ? AND gameweek = ?
            "#,
        )
        .bind(manager_id as i64)
        .bind(i64::from(gameweek))
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to read picks cache for manager {manager_id}"))?;

        row.as_ref().map(record_from_row).transpose()
    }

    /// Every cached picks record for a manager, ordered by gameweek.
    pub async fn all_picks(&self, manager_id: u64) -> Result<Vec<(u32, CacheRecord<GameweekPicks>)>> {
        let rows = sqlx::query(
            r#"
            SELECT gameweek, data, fetched_at, is_completed FROM manager_picks
            WHERE manager_id = ?
            ORDER BY gameweek
            "#,
        )
        .bind(manager_id as i64)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to read picks cache for manager {manager_id}"))?;

        rows.iter()
            .map(|row| -> Result<(u32, CacheRecord<GameweekPicks>)> {
                let gameweek: i64 = row.try_get("gameweek")?;
                Ok((gameweek as u32, record_from_row(row)?))
            })
            .collect()
    }

    pub async fn put_picks(
        &self,
        manager_id: u64,
        gameweek: u32,
        data: &GameweekPicks,
        is_completed: bool,
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO manager_picks (manager_id, gameweek, data, is_completed, fetched_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (manager_id, gameweek) DO UPDATE SET
                data = excluded.data,
                is_completed = excluded.is_completed,
                fetched_at = excluded.fetched_at
            "#,
        )
        .bind(manager_id as i64)
        .bind(i64::from(gameweek))
        .bind(to_json(data)?)
        .bind(is_completed)
        .bind(fetched_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write picks cache for manager {manager_id}"))?;

        debug!(manager_id, gameweek, is_completed, "Picks cached");
        Ok(())
    }
}

fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string(data).context("Failed to serialise cache payload")
}

fn record_from_row<T: DeserializeOwned>(row: &SqliteRow) -> Result<CacheRecord<T>> {
    let data: String = row.try_get("data")?;
    let fetched_at: String = row.try_get("fetched_at")?;
    let is_completed: i64 = row.try_get("is_completed")?;

    Ok(CacheRecord {
        data: serde_json::from_str(&data).context("Failed to parse cached payload")?,
        fetched_at: DateTime::parse_from_rfc3339(&fetched_at)
            .with_context(|| format!("Invalid cached timestamp: {fetched_at}"))?
            .with_timezone(&Utc),
        is_completed: is_completed != 0,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
