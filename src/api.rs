//! Summarization service client with exponential backoff retry logic.
//!
//! This module provides the interface to the external summarization model,
//! an OpenAI-compatible LLM reached through `awful_aj`. It includes
//! automatic retry logic with exponential backoff and jitter to handle
//! transient failures.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async text-in/text-out interaction
//! - [`LlmService`]: Wraps the `awful_aj` library's `ask` function
//! - [`RetryAsk`]: Decorator that adds retry logic to any `AskAsync` implementation
//!
//! # Retry Strategy
//!
//! - Configurable number of retry attempts
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to every delay

use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Trait for async text-in/text-out services.
///
/// Implementors send text to a model and receive a response. This
/// abstraction allows for different backends, decorators (like retry
/// logic), and in-process fakes.
pub trait AskAsync {
    /// The type of response returned by the service.
    type Response;

    /// Send text to the service and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    /// The underlying client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap.
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Create a new retry wrapper around an existing [`AskAsync`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let service = LlmService::new(config, template);
    /// let retrying = RetryAsk::new(service, 2, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        let factor = 1u32.checked_shl(shift).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => {
                    return Ok(resp);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                            elapsed_ms_total = total_dt.as_millis() as u128,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.backoff(attempt) + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Returned when the model answers with nothing but whitespace.
#[derive(Debug)]
pub struct EmptyResponse;

impl fmt::Display for EmptyResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "summarization model returned an empty response")
    }
}

impl Error for EmptyResponse {}

/// The summarization model: `awful_aj::api::ask` behind [`AskAsync`].
///
/// Config and template are loaded once at startup and shared read-only,
/// so cloning an `LlmService` is cheap.
#[derive(Clone)]
pub struct LlmService {
    /// LLM configuration (API keys, endpoints, model settings).
    config: Arc<AwfulJadeConfig>,
    /// Chat template carrying the summarization system prompt.
    template: Arc<ChatTemplate>,
}

impl LlmService {
    pub fn new(config: AwfulJadeConfig, template: ChatTemplate) -> Self {
        Self {
            config: Arc::new(config),
            template: Arc::new(template),
        }
    }
}

impl fmt::Debug for LlmService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmService").finish_non_exhaustive()
    }
}

impl AskAsync for LlmService {
    type Response = String;

    #[instrument(level = "info", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(&self.config, text.to_string(), &self.template, None, None).await;
        let dt = t0.elapsed();

        match res {
            Ok(answer) if answer.trim().is_empty() => {
                warn!(elapsed_ms = dt.as_millis() as u128, "API call returned empty text");
                Err(Box::new(EmptyResponse))
            }
            Ok(answer) => Ok(answer.trim().to_string()),
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "API call failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first `failures` calls, then echoes the input.
    #[derive(Debug)]
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    impl AskAsync for Flaky {
        type Response = String;

        async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(Box::new(EmptyResponse))
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_after_transient_failures() {
        let flaky = Flaky {
            failures: 2,
            calls: AtomicUsize::new(0),
        };
        let api = RetryAsk::new(flaky, 2, StdDuration::from_millis(1));
        let answer = api.ask("hello").await.unwrap();
        assert_eq!(answer, "HELLO");
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_retries() {
        let flaky = Flaky {
            failures: 10,
            calls: AtomicUsize::new(0),
        };
        let api = RetryAsk::new(flaky, 1, StdDuration::from_millis(1));
        assert!(api.ask("hello").await.is_err());
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_backoff_doubles_then_caps_without_overflow() {
        let api = RetryAsk::new(
            Flaky {
                failures: 0,
                calls: AtomicUsize::new(0),
            },
            100,
            StdDuration::from_secs(1),
        );
        assert_eq!(api.backoff(1), StdDuration::from_secs(1));
        assert_eq!(api.backoff(2), StdDuration::from_secs(2));
        assert_eq!(api.backoff(4), StdDuration::from_secs(8));
        assert_eq!(api.backoff(6), StdDuration::from_secs(30));
        assert_eq!(api.backoff(33), StdDuration::from_secs(30));
        assert_eq!(api.backoff(64), StdDuration::from_secs(30));
        assert_eq!(api.backoff(usize::MAX), StdDuration::from_secs(30));
    }

    #[test]
    fn test_retry_debug_hides_inner() {
        let flaky = Flaky {
            failures: 0,
            calls: AtomicUsize::new(0),
        };
        let api = RetryAsk::new(flaky, 3, StdDuration::from_secs(1));
        let dbg = format!("{:?}", api);
        assert!(dbg.contains("max_retries: 3"));
        assert!(!dbg.contains("Flaky"));
    }
}
