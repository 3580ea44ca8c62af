//! Retry orchestration: the per-request send loop.

use crate::error::SendError;
use crate::policy::{resolve_policy, RetryPolicy};
use crate::request::{RequestContext, Response};
use crate::revise::revise;
use crate::state::RetryState;
use crate::transport::Transport;

/// The retry layer installed over an HTTP client. Holds the transport and the
/// default policy; per-request overrides ride in the request's retry slot.
pub struct RetryLayer<T> {
    transport: T,
    defaults: RetryPolicy,
}

impl<T: Transport> RetryLayer<T> {
    pub fn new(transport: T, defaults: RetryPolicy) -> Self {
        Self {
            transport,
            defaults,
        }
    }

    /// Send one logical request, transparently reissuing failed attempts.
    ///
    /// Each iteration is one physical send: stamp the send time, hand the
    /// context to the transport, and on failure decide whether to reissue.
    /// A retry revises the context (timeout budget, agents, body mode, URL)
    /// and suspends for the backoff delay before looping; the chain is
    /// strictly sequential, so only one attempt is ever in flight. The caller
    /// observes only the final outcome: the first successful response, or the
    /// last failure verbatim.
    pub async fn send(&self, mut ctx: RequestContext) -> Result<Response, SendError> {
        let mut state = RetryState::default();
        loop {
            state.record_send();
            let error = match self.transport.send(&mut ctx).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            // No request context on the error: nothing to reissue.
            if error.context.is_none() {
                return Err(error);
            }

            let policy = resolve_policy(ctx.retry.as_ref(), &self.defaults);
            if !(policy.retry_condition)(&error) || state.retry_count() >= policy.retries {
                tracing::debug!(
                    url = %ctx.url,
                    retries = state.retry_count(),
                    error = %error,
                    "giving up"
                );
                return Err(error);
            }

            state.increment();
            let delay = (policy.retry_delay)(state.retry_count());
            let elapsed = state.elapsed_since_last_send();
            revise(
                &mut ctx,
                self.transport.defaults(),
                elapsed,
                delay,
                policy.should_reset_timeout,
            );
            tracing::debug!(
                url = %ctx.url,
                retry = state.retry_count(),
                delay_ms = delay.as_millis() as u64,
                "scheduling retry"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportCode;
    use crate::policy::RetryOverrides;
    use crate::request::{BodyMode, Method};
    use crate::transport::ClientDefaults;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Transport that replays a scripted sequence of outcomes and records the
    /// context it was handed on every send.
    struct ScriptedTransport {
        defaults: ClientDefaults,
        script: Mutex<VecDeque<Result<Response, SendError>>>,
        seen: Mutex<Vec<RequestContext>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<Response, SendError>>) -> Self {
            Self {
                defaults: ClientDefaults::default(),
                script: Mutex::new(script.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn sends(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn seen(&self, attempt: usize) -> RequestContext {
            self.seen.lock().unwrap()[attempt].clone()
        }
    }

    impl Transport for &ScriptedTransport {
        fn defaults(&self) -> &ClientDefaults {
            &self.defaults
        }

        async fn send(&self, ctx: &mut RequestContext) -> Result<Response, SendError> {
            self.seen.lock().unwrap().push(ctx.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted")
        }
    }

    fn ok_response() -> Result<Response, SendError> {
        Ok(Response {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
        })
    }

    fn network_error(method: Method) -> SendError {
        SendError::from_transport(
            &RequestContext::new(method, "/admin/endpoint"),
            TransportCode::ConnectionReset,
            "connection reset by peer",
        )
    }

    fn status_error(method: Method, status: u16) -> SendError {
        SendError::from_status(&RequestContext::new(method, "/admin/endpoint"), status)
    }

    /// Policy with an instant, deterministic delay so tests stay exact.
    fn fast_policy(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            retry_delay: Arc::new(|_| Duration::from_millis(200)),
            ..RetryPolicy::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn success_passes_through_untouched() {
        let transport = ScriptedTransport::new(vec![ok_response()]);
        let layer = RetryLayer::new(&transport, fast_policy(3));
        let response = layer
            .send(RequestContext::new(Method::Get, "/admin/endpoint"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.sends(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_reissued_until_success() {
        let transport = ScriptedTransport::new(vec![
            Err(network_error(Method::Get)),
            Err(status_error(Method::Get, 502)),
            ok_response(),
        ]);
        let layer = RetryLayer::new(&transport, fast_policy(3));
        let response = layer
            .send(RequestContext::new(Method::Get, "/admin/endpoint"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(transport.sends(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_exhaustion_propagates_the_last_error() {
        let transport = ScriptedTransport::new(vec![
            Err(network_error(Method::Get)),
            Err(network_error(Method::Get)),
            Err(SendError::from_transport(
                &RequestContext::new(Method::Get, "/admin/endpoint"),
                TransportCode::ConnectionReset,
                "third and final reset",
            )),
        ]);
        let layer = RetryLayer::new(&transport, fast_policy(2));
        let err = layer
            .send(RequestContext::new(Method::Get, "/admin/endpoint"))
            .await
            .unwrap_err();
        // Two resubmissions, then the third error verbatim.
        assert_eq!(transport.sends(), 3);
        assert_eq!(err.to_string(), "third and final reset");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_a_single_send() {
        let transport = ScriptedTransport::new(vec![Err(network_error(Method::Get))]);
        let layer = RetryLayer::new(&transport, fast_policy(0));
        layer
            .send(RequestContext::new(Method::Get, "/admin/endpoint"))
            .await
            .unwrap_err();
        assert_eq!(transport.sends(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unattributable_error_skips_the_classifier() {
        let transport =
            ScriptedTransport::new(vec![Err(SendError::unattributable("lost in the pipeline"))]);
        let policy = RetryPolicy {
            retry_condition: Arc::new(|_| panic!("classifier must not run")),
            ..fast_policy(3)
        };
        let layer = RetryLayer::new(&transport, policy);
        let err = layer
            .send(RequestContext::new(Method::Get, "/admin/endpoint"))
            .await
            .unwrap_err();
        assert_eq!(transport.sends(), 1);
        assert_eq!(err.to_string(), "lost in the pipeline");
    }

    #[tokio::test(start_paused = true)]
    async fn non_retriable_status_is_not_reissued() {
        let transport = ScriptedTransport::new(vec![Err(status_error(Method::Get, 404))]);
        let layer = RetryLayer::new(&transport, fast_policy(3));
        let err = layer
            .send(RequestContext::new(Method::Get, "/admin/endpoint"))
            .await
            .unwrap_err();
        assert_eq!(transport.sends(), 1);
        assert_eq!(err.status, Some(404));
    }

    #[tokio::test(start_paused = true)]
    async fn post_is_not_reissued_under_the_default_condition() {
        let transport = ScriptedTransport::new(vec![Err(status_error(Method::Post, 500))]);
        let layer = RetryLayer::new(&transport, fast_policy(3));
        layer
            .send(RequestContext::new(Method::Post, "/submit"))
            .await
            .unwrap_err();
        assert_eq!(transport.sends(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn request_overrides_beat_layer_defaults() {
        let transport = ScriptedTransport::new(vec![
            Err(network_error(Method::Get)),
            Err(network_error(Method::Get)),
        ]);
        let layer = RetryLayer::new(&transport, fast_policy(3));
        let mut ctx = RequestContext::new(Method::Get, "/admin/endpoint");
        ctx.retry = Some(RetryOverrides {
            retries: Some(1),
            ..RetryOverrides::default()
        });
        layer.send(ctx).await.unwrap_err();
        assert_eq!(transport.sends(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn resubmission_carries_the_revised_context() {
        let transport = ScriptedTransport::new(vec![
            Err(network_error(Method::Get)),
            ok_response(),
        ]);
        let layer = RetryLayer::new(&transport, fast_policy(3));
        let mut ctx = RequestContext::new(Method::Get, "http://api.example.com/admin/endpoint");
        ctx.base_url = Some("http://api.example.com".to_string());
        ctx.timeout = Some(Duration::from_millis(1000));
        layer.send(ctx).await.unwrap();

        let first = transport.seen(0);
        assert_eq!(first.url, "http://api.example.com/admin/endpoint");
        assert_eq!(first.body_mode, BodyMode::Transform);
        assert_eq!(first.timeout, Some(Duration::from_millis(1000)));

        // Second attempt: base prefix stripped, body raw, timeout shrunk by
        // the 200ms planned delay plus however long the first send took.
        let second = transport.seen(1);
        assert_eq!(second.url, "/admin/endpoint");
        assert_eq!(second.body_mode, BodyMode::Raw);
        let timeout = second.timeout.unwrap();
        assert!(timeout <= Duration::from_millis(800));
        assert!(timeout > Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_delay_suspends_between_attempts() {
        let transport = ScriptedTransport::new(vec![
            Err(network_error(Method::Get)),
            Err(network_error(Method::Get)),
            ok_response(),
        ]);
        let layer = RetryLayer::new(&transport, fast_policy(3));
        let started = tokio::time::Instant::now();
        layer
            .send(RequestContext::new(Method::Get, "/admin/endpoint"))
            .await
            .unwrap();
        // Two scheduled retries at 200ms each under the paused clock.
        assert!(started.elapsed() >= Duration::from_millis(400));
    }
}
