//! Aggregated health reporting.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::debug;

use shortlist_types::health::{
    HealthCheck, HealthChecks, HealthMetadata, HealthReport, HealthStatus, SystemInfo,
};

use crate::llm::box_provider::BoxLlmProvider;
use crate::repository::shortlist::ShortlistRepository;

/// Upper bound on the LLM probe.
pub const LLM_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub const STATIC_MODE_MESSAGE: &str = "Static mode — add GROQ_API_KEY for live AI results";

pub struct HealthService {
    started_at: Instant,
    version: String,
}

impl HealthService {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            started_at: Instant::now(),
            version: version.into(),
        }
    }

    /// Probe the store and the LLM provider.
    ///
    /// The report is `degraded` when any check fails. Store metadata is
    /// omitted if it cannot be read.
    pub async fn report<R: ShortlistRepository>(
        &self,
        repo: &R,
        provider: Option<&BoxLlmProvider>,
    ) -> HealthReport {
        let start = Instant::now();

        let backend = HealthCheck::ok("API server running");
        let db = repo.health().await;
        let metadata = match repo.metadata().await {
            Ok(meta) => Some(HealthMetadata {
                shortlist_count: meta.count,
                db_size_mb: meta.size_mb,
            }),
            Err(e) => {
                debug!(error = %e, "store metadata unavailable");
                None
            }
        };
        let llm = match provider {
            None => HealthCheck::ok(STATIC_MODE_MESSAGE),
            Some(provider) => match tokio::time::timeout(LLM_PROBE_TIMEOUT, provider.health()).await {
                Ok(check) => check,
                Err(_) => HealthCheck::failed(format!(
                    "LLM health check timed out after {}s",
                    LLM_PROBE_TIMEOUT.as_secs()
                )),
            },
        };

        let checks = HealthChecks { backend, db, llm };
        let status = if checks.all_healthy() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };

        HealthReport {
            status,
            response_time_ms: start.elapsed().as_millis() as u64,
            checks,
            timestamp: Utc::now().to_rfc3339(),
            system: SystemInfo {
                version: self.version.clone(),
                platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
                uptime: self.started_at.elapsed().as_secs(),
            },
            metadata,
        }
    }
}
