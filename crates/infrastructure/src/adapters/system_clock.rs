//! Wall clock used for token expiry checks.

use chrono::{DateTime, Utc};
use portal_application::ports::Clock;

/// Reads the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_seconds_follow_wall_clock() {
        let before = Utc::now().timestamp();
        let now = SystemClock.now_secs();
        assert!(now >= before && now - before < 5);
    }
}
