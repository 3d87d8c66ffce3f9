//! Clock port for token expiry checks

use chrono::{DateTime, Utc};

/// Port for reading wall-clock time.
///
/// Token expiry is compared against this clock, so tests can pin "now"
/// relative to the `exp` claims they mint.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time as seconds since the Unix epoch.
    fn now_secs(&self) -> i64 {
        self.now().timestamp()
    }
}
