//! Request and response descriptors shared with the underlying HTTP client.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::UnknownMethod;
use crate::policy::RetryOverrides;

/// HTTP method of an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Options,
    Post,
    Put,
    Delete,
}

/// Methods safe to repeat without unintended side effects. POST is excluded
/// because it is not guaranteed idempotent.
pub const IDEMPOTENT_HTTP_METHODS: [Method; 5] = [
    Method::Get,
    Method::Head,
    Method::Options,
    Method::Put,
    Method::Delete,
];

/// All supported methods, for callers who accept retrying non-idempotent requests.
pub const HTTP_METHODS: [Method; 6] = [
    Method::Get,
    Method::Head,
    Method::Options,
    Method::Post,
    Method::Put,
    Method::Delete,
];

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Case-normalized parse, so "get" and "GET" denote the same method.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "head" => Ok(Method::Head),
            "options" => Ok(Method::Options),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "delete" => Ok(Method::Delete),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

#[derive(Debug)]
struct AgentInner {
    label: String,
}

/// Opaque handle to a transport agent (connection pool, TLS stack, proxy).
///
/// Clones share the same underlying agent; equality is identity, not
/// contents, so two agents built from the same settings still differ.
#[derive(Debug, Clone)]
pub struct Agent {
    inner: Arc<AgentInner>,
}

impl Agent {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(AgentInner {
                label: label.into(),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }
}

impl PartialEq for Agent {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Agent {}

/// How the transport should treat the request body when sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyMode {
    /// Run the client's body transforms (serialization) before sending.
    #[default]
    Transform,
    /// Send the body bytes as-is. Set on resubmission, because the body was
    /// already transformed on the first send and must not be transformed twice.
    Raw,
}

/// Mutable descriptor of one logical HTTP request as it flows through the
/// client. Owned by the caller for construction; owned and mutated by the
/// retry layer during the retry lifecycle.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub url: String,
    /// Base URL the client prepends to relative `url`s; mirrors the client
    /// default at construction time.
    pub base_url: Option<String>,
    pub headers: HashMap<String, String>,
    /// Per-attempt timeout. `Some(Duration::ZERO)` means "no timeout" to most
    /// transports and is left alone by the reviser.
    pub timeout: Option<Duration>,
    pub agent: Option<Agent>,
    pub http_agent: Option<Agent>,
    pub https_agent: Option<Agent>,
    pub body: Option<Vec<u8>>,
    pub body_mode: BodyMode,
    /// Per-request retry overrides (the namespaced retry slot).
    pub retry: Option<RetryOverrides>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            method: Method::Get,
            url: String::new(),
            base_url: None,
            headers: HashMap::new(),
            timeout: None,
            agent: None,
            http_agent: None,
            https_agent: None,
            body: None,
            body_mode: BodyMode::Transform,
            retry: None,
        }
    }
}

impl RequestContext {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Response produced by the transport for a completed send.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}
