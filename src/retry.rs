//! Fixed retry policy for PUT delivery.

use std::time::Duration;

/// Returns `true` when a non-2xx status warrants another attempt.
///
/// Server errors (500-599), request timeout (408) and rate limiting (429)
/// are retried. Every other status is terminal.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500..=599)
}

/// Delay inserted before attempt number `attempt` (1-based).
///
/// The first attempt is immediate; attempt `n >= 2` waits `base * 2^(n-2)`,
/// saturating at [`Duration::MAX`].
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    if attempt <= 1 || base.is_zero() {
        return Duration::ZERO;
    }
    match 2u32.checked_pow(attempt - 2) {
        Some(multiplier) => base.saturating_mul(multiplier),
        None => Duration::MAX,
    }
}
