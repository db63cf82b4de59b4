//! Storyteller configuration.

use crate::prompts::DM_SYSTEM_PROMPT;
use std::time::Duration;

/// Parameters sent with every completion request.
#[derive(Debug, Clone)]
pub struct StorytellerConfig {
    /// System instruction for the model.
    pub system_prompt: String,

    /// Maximum tokens generated per reply.
    pub max_tokens: usize,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for StorytellerConfig {
    fn default() -> Self {
        Self {
            system_prompt: DM_SYSTEM_PROMPT.to_string(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl StorytellerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Timeout and retry behaviour around a storyteller call.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Deadline for a single attempt.
    pub timeout: Duration,
    /// Retries after the first attempt (0 = single attempt).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay_ms: u64,
    /// Cap on the exponential delay.
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) applied around each delay.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 5000,
            jitter_factor: 0.2,
        }
    }
}

impl RetryConfig {
    /// One attempt, no retries.
    pub fn no_retry(timeout: Duration) -> Self {
        Self {
            timeout,
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}
