//! Shortlist repository trait definition.

use shortlist_types::error::RepositoryError;
use shortlist_types::health::HealthCheck;
use shortlist_types::shortlist::{Shortlist, ShortlistId, StoreMetadata};

/// Repository trait for shortlist persistence.
///
/// Implementations live in shortlist-infra (SQLite and PostgreSQL).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ShortlistRepository: Send + Sync {
    /// Human-readable backend name (e.g., "SQLite (Local)").
    fn backend_name(&self) -> &str;

    /// Persist a shortlist, evicting the session's oldest records first so
    /// that at most `max_per_session` remain after the write.
    ///
    /// Saving an id that already exists refreshes its results and timestamp.
    fn save(
        &self,
        shortlist: &Shortlist,
        max_per_session: u32,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a shortlist by its unique ID.
    fn get_by_id(
        &self,
        id: &ShortlistId,
    ) -> impl std::future::Future<Output = Result<Option<Shortlist>, RepositoryError>> + Send;

    /// Most recent shortlists of one session, newest first.
    fn list_recent(
        &self,
        session_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Shortlist>, RepositoryError>> + Send;

    /// Total row count and on-disk size.
    fn metadata(
        &self,
    ) -> impl std::future::Future<Output = Result<StoreMetadata, RepositoryError>> + Send;

    /// Probe the connection with a trivial query.
    fn health(&self) -> impl std::future::Future<Output = HealthCheck> + Send;
}

/// Number of rows to delete so that one more insert stays within the cap.
///
/// A cap of zero is treated as one: the newest shortlist is always kept.
pub fn rows_to_evict(existing: i64, max_per_session: u32) -> i64 {
    let cap = i64::from(max_per_session.max(1));
    (existing - cap + 1).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_to_evict_under_cap() {
        assert_eq!(rows_to_evict(0, 20), 0);
        assert_eq!(rows_to_evict(19, 20), 0);
    }

    #[test]
    fn test_rows_to_evict_at_and_over_cap() {
        assert_eq!(rows_to_evict(20, 20), 1);
        assert_eq!(rows_to_evict(25, 20), 6);
    }

    #[test]
    fn test_rows_to_evict_zero_cap_keeps_one() {
        assert_eq!(rows_to_evict(3, 0), 3);
        assert_eq!(rows_to_evict(0, 0), 0);
    }
}
