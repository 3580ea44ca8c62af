//! Retry settings as an application config section (`[retry]` in config.toml).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backoff::exponential_delay;
use crate::classify::retry_condition;
use crate::error::UnknownMethod;
use crate::policy::RetryPolicy;
use crate::request::{Method, IDEMPOTENT_HTTP_METHODS};

/// Declarative retry parameters, for applications that configure the layer
/// from a TOML/JSON config file. Conditions and delay functions are code, not
/// data, so the file surface covers the budget, the timeout behavior, and the
/// retriable-method set; the rest stays at its defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of resubmissions per request.
    pub retries: u32,
    /// Give every resubmission the full timeout instead of the remaining budget.
    #[serde(default)]
    pub should_reset_timeout: bool,
    /// Method names eligible for retry (case-insensitive). Missing means the
    /// idempotent set; an unknown name is rejected outright rather than
    /// silently narrowing the set.
    #[serde(default)]
    pub retriable_methods: Option<Vec<String>>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            should_reset_timeout: false,
            retriable_methods: None,
        }
    }
}

impl RetryConfig {
    pub fn into_policy(self) -> Result<RetryPolicy, UnknownMethod> {
        let methods: Vec<Method> = match self.retriable_methods {
            None => IDEMPOTENT_HTTP_METHODS.to_vec(),
            Some(names) => names
                .iter()
                .map(|name| name.parse())
                .collect::<Result<_, _>>()?,
        };
        Ok(RetryPolicy {
            retries: self.retries,
            retry_condition: retry_condition(methods),
            retry_delay: Arc::new(exponential_delay),
            should_reset_timeout: self.should_reset_timeout,
        })
    }
}
