//! Transport, upload and clock adapters.

mod multipart;
mod reqwest_client;
mod system_clock;

pub use multipart::attach_file;
pub use reqwest_client::{ReqwestHttpClient, TransportOptions};
pub use system_clock::SystemClock;
