//! Interface to the underlying HTTP client.

use std::future::Future;

use crate::error::SendError;
use crate::request::{Agent, RequestContext, Response};

/// Read-only snapshot of the client's default configuration, taken so the
/// reviser can compare per-request values against it without reaching into
/// client internals.
#[derive(Debug, Clone, Default)]
pub struct ClientDefaults {
    pub base_url: Option<String>,
    pub agent: Option<Agent>,
    pub http_agent: Option<Agent>,
    pub https_agent: Option<Agent>,
}

/// The retry layer's view of the HTTP client: one physical send plus read
/// access to the client's defaults. The client keeps full ownership of
/// connection handling; the layer only decides whether and when to call
/// `send` again.
pub trait Transport {
    fn defaults(&self) -> &ClientDefaults;

    /// Issue one physical send. The context may have been revised since the
    /// previous attempt (timeout, url, agents, body mode).
    fn send(
        &self,
        ctx: &mut RequestContext,
    ) -> impl Future<Output = Result<Response, SendError>> + Send;
}
