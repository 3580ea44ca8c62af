//! Retry policy: budget, condition, delay, and per-request overrides.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::backoff::exponential_delay;
use crate::classify::retry_condition;
use crate::error::SendError;
use crate::request::IDEMPOTENT_HTTP_METHODS;

/// Predicate deciding whether a failed attempt should be retried.
pub type RetryCondition = Arc<dyn Fn(&SendError) -> bool + Send + Sync>;

/// Maps the post-increment retry count to a backoff delay.
pub type RetryDelay = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Effective retry policy for one logical request.
#[derive(Clone)]
pub struct RetryPolicy {
    /// Maximum number of resubmissions (not counting the initial attempt).
    pub retries: u32,
    pub retry_condition: RetryCondition,
    pub retry_delay: RetryDelay,
    /// When true, every resubmission gets the full configured timeout instead
    /// of the remaining budget.
    pub should_reset_timeout: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            retry_condition: retry_condition(IDEMPOTENT_HTTP_METHODS),
            retry_delay: Arc::new(exponential_delay),
            should_reset_timeout: false,
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("retries", &self.retries)
            .field("should_reset_timeout", &self.should_reset_timeout)
            .finish_non_exhaustive()
    }
}

/// Per-request overrides carried in the request's namespaced retry slot.
/// Unset fields fall back to the layer's default policy.
#[derive(Clone, Default)]
pub struct RetryOverrides {
    pub retries: Option<u32>,
    pub retry_condition: Option<RetryCondition>,
    pub retry_delay: Option<RetryDelay>,
    pub should_reset_timeout: Option<bool>,
}

impl fmt::Debug for RetryOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOverrides")
            .field("retries", &self.retries)
            .field("should_reset_timeout", &self.should_reset_timeout)
            .finish_non_exhaustive()
    }
}

/// Merge request-level overrides over the default policy, field by field.
pub fn resolve_policy(overrides: Option<&RetryOverrides>, defaults: &RetryPolicy) -> RetryPolicy {
    let Some(overrides) = overrides else {
        return defaults.clone();
    };
    RetryPolicy {
        retries: overrides.retries.unwrap_or(defaults.retries),
        retry_condition: overrides
            .retry_condition
            .clone()
            .unwrap_or_else(|| defaults.retry_condition.clone()),
        retry_delay: overrides
            .retry_delay
            .clone()
            .unwrap_or_else(|| defaults.retry_delay.clone()),
        should_reset_timeout: overrides
            .should_reset_timeout
            .unwrap_or(defaults.should_reset_timeout),
    }
}
