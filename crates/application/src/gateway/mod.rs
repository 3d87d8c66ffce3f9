//! Authenticated request gateway.
//!
//! Every call to the portal API goes through [`Gateway::send`], which
//! attaches the current bearer token, refreshes it when it has expired or the
//! server rejects it, and retries the request at most once.

mod client;
mod refresh;

pub use client::{DEFAULT_REFRESH_TIMEOUT, Gateway, GatewayConfig, RetryContext};
pub use refresh::RefreshCoordinator;
