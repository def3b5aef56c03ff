//! Backend selection for the shortlist store.

use std::path::Path;

use tracing::info;

use shortlist_core::repository::shortlist::ShortlistRepository;
use shortlist_types::error::RepositoryError;
use shortlist_types::health::HealthCheck;
use shortlist_types::shortlist::{Shortlist, ShortlistId, StoreMetadata};

use crate::postgres::{self, shortlist::PgShortlistRepository};
use crate::sqlite::pool::DatabasePool;
use crate::sqlite::shortlist::SqliteShortlistRepository;

/// The configured shortlist store.
pub enum ShortlistStore {
    Sqlite(SqliteShortlistRepository),
    Postgres(PgShortlistRepository),
}

impl ShortlistStore {
    /// PostgreSQL when `database_url` is given, otherwise the local SQLite
    /// file `<data_dir>/shortlists.db`.
    pub async fn connect(
        database_url: Option<&str>,
        data_dir: &Path,
    ) -> Result<Self, RepositoryError> {
        match database_url.filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                let pool = postgres::connect(url)
                    .await
                    .map_err(|e| RepositoryError::Connection(e.to_string()))?;
                info!("using PostgreSQL shortlist store");
                Ok(Self::Postgres(PgShortlistRepository::new(pool)))
            }
            None => {
                let pool = DatabasePool::open_in(data_dir)
                    .await
                    .map_err(|e| RepositoryError::Connection(e.to_string()))?;
                info!(data_dir = %data_dir.display(), "using local SQLite shortlist store");
                Ok(Self::Sqlite(SqliteShortlistRepository::new(pool)))
            }
        }
    }
}

impl ShortlistRepository for ShortlistStore {
    fn backend_name(&self) -> &str {
        match self {
            Self::Sqlite(repo) => repo.backend_name(),
            Self::Postgres(repo) => repo.backend_name(),
        }
    }

    async fn save(&self, shortlist: &Shortlist, max_per_session: u32) -> Result<(), RepositoryError> {
        match self {
            Self::Sqlite(repo) => repo.save(shortlist, max_per_session).await,
            Self::Postgres(repo) => repo.save(shortlist, max_per_session).await,
        }
    }

    async fn get_by_id(&self, id: &ShortlistId) -> Result<Option<Shortlist>, RepositoryError> {
        match self {
            Self::Sqlite(repo) => repo.get_by_id(id).await,
            Self::Postgres(repo) => repo.get_by_id(id).await,
        }
    }

    async fn list_recent(&self, session_id: &str, limit: u32) -> Result<Vec<Shortlist>, RepositoryError> {
        match self {
            Self::Sqlite(repo) => repo.list_recent(session_id, limit).await,
            Self::Postgres(repo) => repo.list_recent(session_id, limit).await,
        }
    }

    async fn metadata(&self) -> Result<StoreMetadata, RepositoryError> {
        match self {
            Self::Sqlite(repo) => repo.metadata().await,
            Self::Postgres(repo) => repo.metadata().await,
        }
    }

    async fn health(&self) -> HealthCheck {
        match self {
            Self::Sqlite(repo) => repo.health().await,
            Self::Postgres(repo) => repo.health().await,
        }
    }
}
