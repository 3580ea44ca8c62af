//! Send failure type the transport reports, shaped for retry classification.

use thiserror::Error;

use crate::request::{Method, RequestContext};

/// Transport-level failure class, below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    /// Request cancelled by the caller or timed out client-side. Never retried.
    Aborted,
    /// Connect or read deadline exceeded on the wire.
    TimedOut,
    ConnectionReset,
    ConnectionRefused,
    HostUnreachable,
    NetworkUnreachable,
    /// Hostname did not resolve.
    DnsFailure,
    /// Certificate or handshake failure.
    TlsFailure,
    BrokenPipe,
}

impl TransportCode {
    /// Whether a failure of this class is safe to retry. Excludes classes
    /// where the condition is permanent (bad DNS, broken route, TLS trust)
    /// rather than transient.
    pub fn is_retry_allowed(self) -> bool {
        !matches!(
            self,
            TransportCode::DnsFailure
                | TransportCode::NetworkUnreachable
                | TransportCode::TlsFailure
        )
    }
}

/// Originating request, as much of it as the transport could attribute.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub method: Method,
    pub url: String,
}

/// Error surfaced by the transport for one physical send attempt.
///
/// Carries the originating request descriptor when the failure could be
/// attributed (`context`), the response status when a response arrived before
/// the failure (`status`), and the transport failure class when it did not
/// (`code`). The retry layer propagates non-retried errors verbatim, message
/// included, so downstream handling is unaffected by its presence.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SendError {
    pub context: Option<ErrorContext>,
    pub status: Option<u16>,
    pub code: Option<TransportCode>,
    pub message: String,
}

impl SendError {
    /// A response was received but carried a failure status.
    pub fn from_status(ctx: &RequestContext, status: u16) -> Self {
        Self {
            context: Some(ErrorContext {
                method: ctx.method,
                url: ctx.url.clone(),
            }),
            status: Some(status),
            code: None,
            message: format!("HTTP {status}"),
        }
    }

    /// The send failed below the HTTP layer with a classifiable code.
    pub fn from_transport(ctx: &RequestContext, code: TransportCode, message: impl Into<String>) -> Self {
        Self {
            context: Some(ErrorContext {
                method: ctx.method,
                url: ctx.url.clone(),
            }),
            status: None,
            code: Some(code),
            message: message.into(),
        }
    }

    /// Connection failed outright without a classifiable code.
    pub fn from_connection(ctx: &RequestContext, message: impl Into<String>) -> Self {
        Self {
            context: Some(ErrorContext {
                method: ctx.method,
                url: ctx.url.clone(),
            }),
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// Failure that cannot be traced back to a request. Always propagated.
    pub fn unattributable(message: impl Into<String>) -> Self {
        Self {
            context: None,
            status: None,
            code: None,
            message: message.into(),
        }
    }
}

/// A method name from configuration did not match any supported HTTP method.
#[derive(Debug, Clone, Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);
