//! SQLite shortlist repository implementation.
//!
//! Implements `ShortlistRepository` from `shortlist-core` using sqlx with
//! split read/write pools. JSON columns are stored as TEXT and timestamps as
//! fixed-width RFC 3339 strings so that they sort chronologically.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use shortlist_core::repository::shortlist::{ShortlistRepository, rows_to_evict};
use shortlist_types::error::RepositoryError;
use shortlist_types::health::HealthCheck;
use shortlist_types::shortlist::{Shortlist, ShortlistId, ShortlistResult, StoreMetadata};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ShortlistRepository`.
pub struct SqliteShortlistRepository {
    pool: DatabasePool,
}

impl SqliteShortlistRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to a domain `Shortlist`.
struct ShortlistRow {
    id: String,
    session_id: String,
    need: String,
    requirements: String,
    weights: String,
    excluded_vendors: String,
    results: String,
    created_at: String,
}

impl ShortlistRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            need: row.try_get("need")?,
            requirements: row.try_get("requirements")?,
            weights: row.try_get("weights")?,
            excluded_vendors: row.try_get("excluded_vendors")?,
            results: row.try_get("results")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_shortlist(self) -> Result<Shortlist, RepositoryError> {
        let id = self
            .id
            .parse::<ShortlistId>()
            .map_err(|e| RepositoryError::Query(format!("invalid shortlist id: {e}")))?;

        let requirements: Vec<String> = parse_json(&self.requirements, "requirements")?;
        let weights: BTreeMap<String, u8> = parse_json(&self.weights, "weights")?;
        let excluded_vendors: Vec<String> =
            parse_json(&self.excluded_vendors, "excluded_vendors")?;
        let results: ShortlistResult = parse_json(&self.results, "results")?;

        Ok(Shortlist {
            id,
            session_id: self.session_id,
            need: self.need,
            requirements,
            weights,
            excluded_vendors,
            results,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(
    raw: &str,
    column: &str,
) -> Result<T, RepositoryError> {
    serde_json::from_str(raw)
        .map_err(|e| RepositoryError::Query(format!("invalid {column} JSON: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|e| RepositoryError::Query(e.to_string()))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

impl ShortlistRepository for SqliteShortlistRepository {
    fn backend_name(&self) -> &str {
        "SQLite (Local)"
    }

    async fn save(&self, shortlist: &Shortlist, max_per_session: u32) -> Result<(), RepositoryError> {
        let requirements = to_json(&shortlist.requirements)?;
        let weights = to_json(&shortlist.weights)?;
        let excluded_vendors = to_json(&shortlist.excluded_vendors)?;
        let results = to_json(&shortlist.results)?;

        // Prune and insert atomically: prune the oldest rows of this session, then upsert.
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let (existing,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM shortlists WHERE session_id = ?")
                .bind(&shortlist.session_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(query_err)?;

        let evict = rows_to_evict(existing, max_per_session);
        if evict > 0 {
            let deleted = sqlx::query(
                "DELETE FROM shortlists WHERE id IN (
                    SELECT id FROM shortlists WHERE session_id = ? ORDER BY created_at ASC LIMIT ?
                 )",
            )
            .bind(&shortlist.session_id)
            .bind(evict)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
            tracing::debug!(
                session = %shortlist.session_id,
                evicted = deleted.rows_affected(),
                "pruned oldest shortlists"
            );
        }

        sqlx::query(
            "INSERT INTO shortlists (id, session_id, need, requirements, weights, excluded_vendors, results, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
               results = excluded.results,
               created_at = excluded.created_at",
        )
        .bind(shortlist.id.to_string())
        .bind(&shortlist.session_id)
        .bind(&shortlist.need)
        .bind(&requirements)
        .bind(&weights)
        .bind(&excluded_vendors)
        .bind(&results)
        .bind(format_datetime(&shortlist.created_at))
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn get_by_id(&self, id: &ShortlistId) -> Result<Option<Shortlist>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM shortlists WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let row = ShortlistRow::from_row(&row).map_err(query_err)?;
                Ok(Some(row.into_shortlist()?))
            }
            None => Ok(None),
        }
    }

    async fn list_recent(&self, session_id: &str, limit: u32) -> Result<Vec<Shortlist>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM shortlists WHERE session_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(session_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        rows.iter()
            .map(|row| {
                ShortlistRow::from_row(row)
                    .map_err(query_err)
                    .and_then(ShortlistRow::into_shortlist)
            })
            .collect()
    }

    async fn metadata(&self) -> Result<StoreMetadata, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shortlists")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;

        let (bytes,): (i64,) = sqlx::query_as(
            "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let size_mb = (bytes as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0;
        Ok(StoreMetadata { count, size_mb })
    }

    async fn health(&self) -> HealthCheck {
        match sqlx::query("SELECT 1").execute(&self.pool.reader).await {
            Ok(_) => HealthCheck::ok("SQLite (Local) connected & persistent"),
            Err(e) => HealthCheck::failed(format!("SQLite error: {e}")),
        }
    }
}
