//! Classify send failures into retryable and non-retryable.

use std::sync::Arc;

use crate::error::{SendError, TransportCode};
use crate::policy::RetryCondition;
use crate::request::Method;

/// A network-level failure worth retrying: no response came back, the
/// transport produced a classifiable code, the request was not aborted by the
/// caller, and the failure class is judged safe to repeat.
pub fn is_network_error(error: &SendError) -> bool {
    error.status.is_none()
        && match error.code {
            Some(TransportCode::Aborted) => false,
            Some(code) => code.is_retry_allowed(),
            None => false,
        }
}

/// Default retryability rules, evaluated in order:
///
/// 1. No request context: origin unknown, not retryable.
/// 2. Method outside `retriable_methods`: not retryable.
/// 3. Retryable network failure: retryable.
/// 4. Any other no-response condition (e.g. outright connection failure
///    without a code): retryable.
/// 5. Server error status in [500, 599]: retryable.
/// 6. Everything else: not retryable.
pub fn is_retryable_error(error: &SendError, retriable_methods: &[Method]) -> bool {
    let Some(context) = &error.context else {
        return false;
    };

    if !retriable_methods.contains(&context.method) {
        return false;
    }

    if is_network_error(error) {
        return true;
    }

    if error.status.is_none() {
        return true;
    }

    matches!(error.status, Some(status) if (500..=599).contains(&status))
}

/// Build the default retry condition over a retriable-method set. Exported so
/// callers composing custom policies can reuse it, e.g. with
/// [`HTTP_METHODS`](crate::request::HTTP_METHODS) to accept POST retries.
pub fn retry_condition(retriable_methods: impl Into<Vec<Method>>) -> RetryCondition {
    let methods: Vec<Method> = retriable_methods.into();
    Arc::new(move |error| is_retryable_error(error, &methods))
}
