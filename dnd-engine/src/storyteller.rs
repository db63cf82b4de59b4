//! The completion collaborator that writes the story.
//!
//! [`Storyteller`] is the seam the game service talks to. [`ClaudeStoryteller`]
//! backs it with the Claude Messages API and [`ResilientStoryteller`] adds a
//! per-attempt deadline plus bounded retries on timeouts.

use crate::config::RetryConfig;
use async_trait::async_trait;
use claude::{Claude, Message, Request};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from a storyteller call.
#[derive(Debug, Clone, Error)]
pub enum StorytellerError {
    #[error("storyteller timed out")]
    Timeout,

    #[error("storyteller failed: {0}")]
    Upstream(String),
}

impl StorytellerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorytellerError::Timeout)
    }
}

impl From<claude::Error> for StorytellerError {
    fn from(e: claude::Error) -> Self {
        match e {
            claude::Error::Timeout => StorytellerError::Timeout,
            other => StorytellerError::Upstream(other.to_string()),
        }
    }
}

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[async_trait]
pub trait Storyteller: Send + Sync {
    async fn complete(&self, request: &StoryRequest) -> Result<String, StorytellerError>;
}

/// Storyteller backed by Claude.
#[derive(Debug, Clone)]
pub struct ClaudeStoryteller {
    client: Claude,
}

impl ClaudeStoryteller {
    pub fn new(client: Claude) -> Self {
        Self { client }
    }

    /// Build from the ANTHROPIC_API_KEY environment variable.
    pub fn from_env() -> Result<Self, claude::Error> {
        Claude::from_env().map(Self::new)
    }
}

#[async_trait]
impl Storyteller for ClaudeStoryteller {
    async fn complete(&self, request: &StoryRequest) -> Result<String, StorytellerError> {
        let api_request = Request::new(vec![Message::user(request.prompt.clone())])
            .with_system(request.system.clone())
            .with_max_tokens(request.max_tokens)
            .with_temperature(request.temperature);

        let response = self.client.complete(api_request).await?;
        let text = response.text.trim();
        if text.is_empty() {
            return Err(StorytellerError::Upstream(
                "empty response from model".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

/// Wraps any storyteller with a deadline per attempt and retries on timeout.
pub struct ResilientStoryteller {
    inner: Arc<dyn Storyteller>,
    config: RetryConfig,
}

impl ResilientStoryteller {
    pub fn new(inner: Arc<dyn Storyteller>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Exponential backoff with jitter: base * 2^(attempt-1), capped.
    fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.config.base_delay_ms;
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        let millis = if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        };
        Duration::from_millis(millis)
    }

    async fn attempt(&self, request: &StoryRequest) -> Result<String, StorytellerError> {
        match tokio::time::timeout(self.config.timeout, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(StorytellerError::Timeout),
        }
    }
}

#[async_trait]
impl Storyteller for ResilientStoryteller {
    async fn complete(&self, request: &StoryRequest) -> Result<String, StorytellerError> {
        let mut attempt = 0;
        loop {
            match self.attempt(request).await {
                Ok(text) => {
                    if attempt > 0 {
                        tracing::info!(attempt = attempt + 1, "storyteller succeeded after retry");
                    }
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "storyteller call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(attempts = attempt + 1, error = %e, "storyteller call failed");
                    return Err(e);
                }
            }
        }
    }
}
