//! Shortlist build, lookup and history.
//!
//! Orchestrates one build: ask the LLM (or the static catalogue), then
//! persist the record under the caller's session with the retention cap.

use std::time::Duration;

use tracing::{Instrument, debug, info, info_span, warn};

use shortlist_types::config::{LlmConfig, RetentionConfig};
use shortlist_types::error::ShortlistError;
use shortlist_types::llm::{LlmError, StopReason};
use shortlist_types::shortlist::{
    Shortlist, ShortlistId, ShortlistInput, ShortlistResult, StoreMetadata,
};

use crate::catalog;
use crate::llm::box_provider::BoxLlmProvider;
use crate::prompt;
use crate::repository::shortlist::ShortlistRepository;

/// Service owning the shortlist store and the optional LLM provider.
///
/// Without a provider every build is answered from the static catalogue.
pub struct ShortlistService<R: ShortlistRepository> {
    repo: R,
    provider: Option<BoxLlmProvider>,
    llm: LlmConfig,
    retention: RetentionConfig,
}

impl<R: ShortlistRepository> ShortlistService<R> {
    pub fn new(
        repo: R,
        provider: Option<BoxLlmProvider>,
        llm: LlmConfig,
        retention: RetentionConfig,
    ) -> Self {
        Self {
            repo,
            provider,
            llm,
            retention,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn provider(&self) -> Option<&BoxLlmProvider> {
        self.provider.as_ref()
    }

    /// Whether builds are served from the static catalogue.
    pub fn is_static_mode(&self) -> bool {
        self.provider.is_none()
    }

    /// Build and persist a shortlist for `session_id`.
    pub async fn build(
        &self,
        input: ShortlistInput,
        session_id: &str,
    ) -> Result<Shortlist, ShortlistError> {
        let results = self.generate(&input).await?;
        let shortlist = Shortlist::new(ShortlistId::new(), session_id, input, results);

        self.repo
            .save(&shortlist, self.retention.max_per_session)
            .await?;

        info!(
            id = %shortlist.id,
            session = session_id,
            vendors = shortlist.results.vendors.len(),
            "shortlist saved"
        );
        Ok(shortlist)
    }

    /// Produce a result without persisting it.
    ///
    /// Quota exhaustion degrades to the static catalogue with
    /// `quotaExhausted` set; every other provider failure is returned.
    pub async fn generate(&self, input: &ShortlistInput) -> Result<ShortlistResult, ShortlistError> {
        let Some(provider) = &self.provider else {
            debug!("no LLM provider configured, serving static results");
            return Ok(catalog::static_result(input));
        };

        let request = prompt::build_request(input, &self.llm);
        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = request.temperature,
            shortlist.requirements = input.requirements.len(),
        );

        let limit = Duration::from_secs(self.llm.timeout_secs);
        let outcome = match tokio::time::timeout(limit, provider.complete(&request))
            .instrument(span)
            .await
        {
            Ok(response) => response,
            Err(_) => Err(LlmError::Timeout(self.llm.timeout_secs)),
        };

        let parsed = outcome.and_then(|response| {
            debug!(
                gen_ai.response.model = %response.model,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                stop_reason = ?response.stop_reason,
                "completion received"
            );
            if response.stop_reason == StopReason::MaxTokens {
                warn!(
                    max_tokens = request.max_tokens,
                    "completion hit max_tokens, response JSON is likely truncated"
                );
            }
            prompt::parse_response(&response.content, input)
        });

        match parsed {
            Ok(result) => Ok(result),
            Err(e) if e.is_quota_exhausted() => {
                warn!(error = %e, "LLM quota exhausted, falling back to static results");
                let mut result = catalog::static_result(input);
                result.quota_exhausted = Some(true);
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "shortlist generation failed");
                Err(e.into())
            }
        }
    }

    pub async fn get(&self, id: &ShortlistId) -> Result<Shortlist, ShortlistError> {
        self.repo
            .get_by_id(id)
            .await?
            .map(Shortlist::with_generated_at_fallback)
            .ok_or(ShortlistError::NotFound)
    }

    /// Most recent shortlists of a session, newest first.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Shortlist>, ShortlistError> {
        let rows = self
            .repo
            .list_recent(session_id, self.retention.history_limit)
            .await?;
        Ok(rows
            .into_iter()
            .map(Shortlist::with_generated_at_fallback)
            .collect())
    }

    pub async fn metadata(&self) -> Result<StoreMetadata, ShortlistError> {
        Ok(self.repo.metadata().await?)
    }
}
