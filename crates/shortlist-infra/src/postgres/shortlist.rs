//! PostgreSQL shortlist repository implementation.
//!
//! Same prune-then-upsert semantics as the SQLite store. JSON columns are
//! JSONB; values are bound as text and cast in SQL.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use shortlist_core::repository::shortlist::{ShortlistRepository, rows_to_evict};
use shortlist_types::error::RepositoryError;
use shortlist_types::health::HealthCheck;
use shortlist_types::shortlist::{Shortlist, ShortlistId, ShortlistResult, StoreMetadata};

const SELECT_COLUMNS: &str = "SELECT id::text AS id, session_id, need, requirements::text AS requirements, \
     weights::text AS weights, excluded_vendors::text AS excluded_vendors, results::text AS results, created_at \
     FROM shortlists";

pub struct PgShortlistRepository {
    pool: PgPool,
}

impl PgShortlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
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

fn row_to_shortlist(row: &PgRow) -> Result<Shortlist, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_err)?;
    let requirements: String = row.try_get("requirements").map_err(query_err)?;
    let weights: String = row.try_get("weights").map_err(query_err)?;
    let excluded_vendors: String = row.try_get("excluded_vendors").map_err(query_err)?;
    let results: String = row.try_get("results").map_err(query_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(query_err)?;

    let weights: BTreeMap<String, u8> = parse_json(&weights, "weights")?;
    let results: ShortlistResult = parse_json(&results, "results")?;

    Ok(Shortlist {
        id: id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid shortlist id: {e}")))?,
        session_id: row.try_get("session_id").map_err(query_err)?,
        need: row.try_get("need").map_err(query_err)?,
        requirements: parse_json(&requirements, "requirements")?,
        weights,
        excluded_vendors: parse_json(&excluded_vendors, "excluded_vendors")?,
        results,
        created_at,
    })
}

impl ShortlistRepository for PgShortlistRepository {
    fn backend_name(&self) -> &str {
        "PostgreSQL"
    }

    async fn save(&self, shortlist: &Shortlist, max_per_session: u32) -> Result<(), RepositoryError> {
        let requirements = to_json(&shortlist.requirements)?;
        let weights = to_json(&shortlist.weights)?;
        let excluded_vendors = to_json(&shortlist.excluded_vendors)?;
        let results = to_json(&shortlist.results)?;

        let mut tx = self.pool.begin().await.map_err(query_err)?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shortlists WHERE session_id = $1")
                .bind(&shortlist.session_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(query_err)?;

        let evict = rows_to_evict(existing, max_per_session);
        if evict > 0 {
            sqlx::query(
                "DELETE FROM shortlists WHERE id IN (
                    SELECT id FROM shortlists WHERE session_id = $1 ORDER BY created_at ASC LIMIT $2
                 )",
            )
            .bind(&shortlist.session_id)
            .bind(evict)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        sqlx::query(
            "INSERT INTO shortlists (id, session_id, need, requirements, weights, excluded_vendors, results, created_at)
             VALUES ($1::uuid, $2, $3, $4::jsonb, $5::jsonb, $6::jsonb, $7::jsonb, $8)
             ON CONFLICT (id) DO UPDATE
               SET results = EXCLUDED.results, created_at = EXCLUDED.created_at",
        )
        .bind(shortlist.id.to_string())
        .bind(&shortlist.session_id)
        .bind(&shortlist.need)
        .bind(&requirements)
        .bind(&weights)
        .bind(&excluded_vendors)
        .bind(&results)
        .bind(shortlist.created_at)
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn get_by_id(&self, id: &ShortlistId) -> Result<Option<Shortlist>, RepositoryError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = $1::uuid");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_err)?;

        row.as_ref().map(row_to_shortlist).transpose()
    }

    async fn list_recent(&self, session_id: &str, limit: u32) -> Result<Vec<Shortlist>, RepositoryError> {
        let sql =
            format!("{SELECT_COLUMNS} WHERE session_id = $1 ORDER BY created_at DESC LIMIT $2");
        let rows = sqlx::query(&sql)
            .bind(session_id)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(query_err)?;

        rows.iter().map(row_to_shortlist).collect()
    }

    async fn metadata(&self) -> Result<StoreMetadata, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortlists")
            .fetch_one(&self.pool)
            .await
            .map_err(query_err)?;

        // Database size needs privileges a hosted role often lacks.
        Ok(StoreMetadata {
            count,
            size_mb: 0.0,
        })
    }

    async fn health(&self) -> HealthCheck {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => HealthCheck::ok("PostgreSQL connected"),
            Err(e) => HealthCheck::failed(format!("PostgreSQL error: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlist_types::shortlist::ShortlistInput;

    /// These tests need a live server: set `TEST_DATABASE_URL` to run them.
    async fn test_repo() -> Option<PgShortlistRepository> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = super::super::connect(&url).await.unwrap();
        Some(PgShortlistRepository::new(pool))
    }

    fn make_shortlist(session: &str) -> Shortlist {
        let input = ShortlistInput {
            need: "Payroll for a remote team".to_string(),
            requirements: vec!["Contractors".to_string()],
            weights: BTreeMap::from([("Contractors".to_string(), 8)]),
            excluded_vendors: vec![],
        };
        let results = ShortlistResult {
            summary: "Payroll providers.".to_string(),
            vendors: vec![],
            recommendation: String::new(),
            generated_at: None,
            quota_exhausted: Some(true),
        };
        Shortlist::new(ShortlistId::new(), session, input, results)
    }

    #[tokio::test]
    async fn test_save_get_and_evict() {
        let Some(repo) = test_repo().await else {
            return;
        };
        let session = format!("test-{}", ShortlistId::new().short());

        let first = make_shortlist(&session);
        repo.save(&first, 2).await.unwrap();
        let found = repo.get_by_id(&first.id).await.unwrap().unwrap();
        assert_eq!(found.need, first.need);
        assert_eq!(found.results.quota_exhausted, Some(true));

        for _ in 0..2 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            repo.save(&make_shortlist(&session), 2).await.unwrap();
        }
        assert!(repo.get_by_id(&first.id).await.unwrap().is_none());
        assert_eq!(repo.list_recent(&session, 5).await.unwrap().len(), 2);
        assert!(repo.health().await.healthy);
    }
}
