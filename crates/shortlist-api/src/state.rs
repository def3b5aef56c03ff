//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. `ShortlistService` is generic over its repository; here it
//! is pinned to the backend chosen at startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shortlist_core::llm::box_provider::BoxLlmProvider;
use shortlist_core::service::health::HealthService;
use shortlist_core::service::shortlist::ShortlistService;
use shortlist_infra::config::{load_config, resolve_data_dir};
use shortlist_infra::llm::provider_from_env;
use shortlist_infra::store::ShortlistStore;
use shortlist_types::config::AppConfig;
use shortlist_types::health::HealthReport;

/// Environment variable selecting PostgreSQL instead of the local SQLite file.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

pub type ConcreteShortlistService = ShortlistService<ShortlistStore>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub shortlist_service: Arc<ConcreteShortlistService>,
    pub health_service: Arc<HealthService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect the store,
    /// pick up the LLM key.
    pub async fn init(data_dir: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir(data_dir);
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let database_url = std::env::var(DATABASE_URL_ENV).ok();
        let store = ShortlistStore::connect(database_url.as_deref(), &data_dir).await?;
        let provider = provider_from_env(&config.llm);

        Ok(Self::from_parts(store, provider, config, data_dir))
    }

    /// Wire state from already-built parts.
    pub fn from_parts(
        store: ShortlistStore,
        provider: Option<BoxLlmProvider>,
        config: AppConfig,
        data_dir: PathBuf,
    ) -> Self {
        let shortlist_service = ShortlistService::new(
            store,
            provider,
            config.llm.clone(),
            config.retention.clone(),
        );

        Self {
            shortlist_service: Arc::new(shortlist_service),
            health_service: Arc::new(HealthService::new(env!("CARGO_PKG_VERSION"))),
            config: Arc::new(config),
            data_dir,
        }
    }

    pub async fn health_report(&self) -> HealthReport {
        self.health_service
            .report(
                self.shortlist_service.repo(),
                self.shortlist_service.provider(),
            )
            .await
    }
}
