//! Exponential backoff with jitter.

use std::time::Duration;

/// Default backoff: `2^retry_number * 100` ms plus a uniformly random jitter
/// in `[0, 20%)` of that base. `retry_number` is the attempt count after
/// increment, so the first retry (1) waits roughly 200 ms, the second 400 ms,
/// and so on. The jitter desynchronizes concurrent retriers so a shared
/// outage does not produce a synchronized retry storm.
pub fn exponential_delay(retry_number: u32) -> Duration {
    let base_ms = 2u64.saturating_pow(retry_number).saturating_mul(100);
    let jitter_ms = base_ms as f64 * 0.2 * rand::random::<f64>();
    Duration::from_millis(base_ms) + Duration::from_secs_f64(jitter_ms / 1000.0)
}
