//! Process-wide switch for logging raw server payloads.

use std::sync::atomic::{AtomicBool, Ordering};

static PAYLOAD_LOGGING: AtomicBool = AtomicBool::new(false);

/// Placeholder used when payload logging is disabled.
pub const REDACTED_VALUE: &str = "[REDACTED]";

pub fn set_payload_logging(enabled: bool) {
    PAYLOAD_LOGGING.store(enabled, Ordering::Release);
}

/// Returns true if raw payloads may be written to logs.
pub fn payload_logging_enabled() -> bool {
    PAYLOAD_LOGGING.load(Ordering::Relaxed)
}

/// Returns the value when payload logging is enabled, otherwise a redacted token.
pub fn redact_payload(value: &str) -> &str {
    if payload_logging_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}
