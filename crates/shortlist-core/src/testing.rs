//! In-memory test doubles for the repository and LLM ports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use shortlist_types::error::RepositoryError;
use shortlist_types::health::HealthCheck;
use shortlist_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};
use shortlist_types::shortlist::{Shortlist, ShortlistId, StoreMetadata};

use crate::llm::provider::LlmProvider;
use crate::repository::shortlist::{ShortlistRepository, rows_to_evict};

/// Provider that replays scripted replies in order.
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    delay: Option<Duration>,
    health: HealthCheck,
    stop_reason: StopReason,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            delay: None,
            health: HealthCheck::ok("mock provider ready"),
            stop_reason: StopReason::EndTurn,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(content: &str) -> Self {
        Self::new(vec![Ok(content.to_string())])
    }

    pub fn failing(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_stop_reason(mut self, stop_reason: StopReason) -> Self {
        self.stop_reason = stop_reason;
        self
    }

    pub fn with_health(mut self, health: HealthCheck) -> Self {
        self.health = health;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidRequest("no scripted reply".into())));
        reply.map(|content| CompletionResponse {
            content,
            model: request.model.clone(),
            stop_reason: self.stop_reason,
            usage: Usage::default(),
        })
    }

    async fn health(&self) -> HealthCheck {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.health.clone()
    }
}

/// Vec-backed repository with the same eviction rule as the SQL stores.
#[derive(Default)]
pub struct InMemoryRepository {
    rows: Mutex<Vec<Shortlist>>,
    broken: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every operation fails.
    pub fn broken() -> Self {
        Self {
            rows: Mutex::default(),
            broken: true,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn insert_raw(&self, shortlist: Shortlist) {
        self.rows.lock().unwrap().push(shortlist);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.broken {
            return Err(RepositoryError::Connection("store unavailable".into()));
        }
        Ok(())
    }
}

impl ShortlistRepository for InMemoryRepository {
    fn backend_name(&self) -> &str {
        "In-memory"
    }

    async fn save(&self, shortlist: &Shortlist, max_per_session: u32) -> Result<(), RepositoryError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();

        let mut session_rows: Vec<(usize, chrono::DateTime<chrono::Utc>)> = rows
            .iter()
            .enumerate()
            .filter(|(_, s)| s.session_id == shortlist.session_id)
            .map(|(i, s)| (i, s.created_at))
            .collect();
        session_rows.sort_by_key(|(_, created_at)| *created_at);
        let evict = rows_to_evict(session_rows.len() as i64, max_per_session) as usize;
        let mut doomed: Vec<usize> = session_rows.iter().take(evict).map(|(i, _)| *i).collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        for index in doomed {
            rows.remove(index);
        }

        match rows.iter_mut().find(|s| s.id == shortlist.id) {
            Some(existing) => {
                existing.results = shortlist.results.clone();
                existing.created_at = shortlist.created_at;
            }
            None => rows.push(shortlist.clone()),
        }
        Ok(())
    }

    async fn get_by_id(&self, id: &ShortlistId) -> Result<Option<Shortlist>, RepositoryError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().iter().find(|s| &s.id == id).cloned())
    }

    async fn list_recent(&self, session_id: &str, limit: u32) -> Result<Vec<Shortlist>, RepositoryError> {
        self.check()?;
        let mut matching: Vec<Shortlist> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.session_id == session_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn metadata(&self) -> Result<StoreMetadata, RepositoryError> {
        self.check()?;
        Ok(StoreMetadata {
            count: self.rows.lock().unwrap().len() as i64,
            size_mb: 0.0,
        })
    }

    async fn health(&self) -> HealthCheck {
        match self.check() {
            Ok(()) => HealthCheck::ok("In-memory connected"),
            Err(e) => HealthCheck::failed(e.to_string()),
        }
    }
}
