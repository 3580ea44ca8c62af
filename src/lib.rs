//! Transparent retry layer for HTTP clients.
//!
//! `reissue` sits between a caller and an HTTP client and reissues failed
//! requests according to a configurable policy: classify whether the failure
//! is transient (network blip, 5xx), back off exponentially with jitter, and
//! resubmit a revised copy of the request. The client itself stays out of
//! scope; it is modeled by the [`Transport`] trait.
//!
//! ```no_run
//! use reissue::{Method, RequestContext, RetryLayer, RetryPolicy};
//! # use reissue::{ClientDefaults, Response, SendError, Transport};
//! # struct MyClient;
//! # impl Transport for MyClient {
//! #     fn defaults(&self) -> &ClientDefaults { unimplemented!() }
//! #     async fn send(&self, _: &mut RequestContext) -> Result<Response, SendError> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! # async fn demo(client: MyClient) -> Result<(), SendError> {
//! let layer = RetryLayer::new(client, RetryPolicy::default());
//! let response = layer
//!     .send(RequestContext::new(Method::Get, "/admin/endpoint"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod classify;
pub mod config;
pub mod error;
pub mod policy;
pub mod request;
pub mod revise;
pub mod run;
pub mod state;
pub mod transport;

pub use backoff::exponential_delay;
pub use classify::{is_network_error, is_retryable_error, retry_condition};
pub use config::RetryConfig;
pub use error::{ErrorContext, SendError, TransportCode, UnknownMethod};
pub use policy::{resolve_policy, RetryCondition, RetryDelay, RetryOverrides, RetryPolicy};
pub use request::{
    Agent, BodyMode, Method, RequestContext, Response, HTTP_METHODS, IDEMPOTENT_HTTP_METHODS,
};
pub use run::RetryLayer;
pub use state::RetryState;
pub use transport::{ClientDefaults, Transport};
