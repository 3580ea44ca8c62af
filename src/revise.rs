//! Revise an outgoing request before resubmission.

use std::time::Duration;

use url::Url;

use crate::request::{BodyMode, RequestContext};
use crate::transport::ClientDefaults;

/// Prepare a request context for its next send.
///
/// Four fixes, all required for the client to accept the resubmitted request
/// as if it were fresh:
///
/// - drop per-request agents that merely mirror the client defaults, so the
///   client's config merge does not choke on duplicated structures;
/// - shrink the timeout to the remaining budget (unless the policy resets it);
/// - mark the body raw, because it was already transformed on the first send;
/// - strip the base-URL prefix from an absolute URL, so the client does not
///   prepend the base again and produce a doubled prefix.
pub fn revise(
    ctx: &mut RequestContext,
    defaults: &ClientDefaults,
    elapsed_since_last_send: Option<Duration>,
    planned_delay: Duration,
    should_reset_timeout: bool,
) {
    if ctx.agent.is_some() && ctx.agent == defaults.agent {
        ctx.agent = None;
    }
    if ctx.http_agent.is_some() && ctx.http_agent == defaults.http_agent {
        ctx.http_agent = None;
    }
    if ctx.https_agent.is_some() && ctx.https_agent == defaults.https_agent {
        ctx.https_agent = None;
    }

    if !should_reset_timeout {
        // Remaining budget is chained from the previous send, not the first
        // one. Clamped to 1ms because a zero timeout means "no timeout" to
        // most transports.
        if let (Some(timeout), Some(elapsed)) = (ctx.timeout, elapsed_since_last_send) {
            if timeout > Duration::ZERO {
                let remaining = timeout
                    .saturating_sub(elapsed)
                    .saturating_sub(planned_delay)
                    .max(Duration::from_millis(1));
                ctx.timeout = Some(remaining);
            }
        }
    }

    ctx.body_mode = BodyMode::Raw;

    if Url::parse(&ctx.url).is_ok() {
        let base_url = ctx.base_url.as_deref().or(defaults.base_url.as_deref());
        let stripped = base_url
            .filter(|base| !base.is_empty())
            .and_then(|base| ctx.url.strip_prefix(base))
            .map(str::to_string);
        if let Some(stripped) = stripped {
            ctx.url = stripped;
        }
    }
}
