//! services/auth_client/src/adapters/clock.rs

use auth_session_core::ports::Clock;
use chrono::Utc;

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
