//! HTTP request types sent through the gateway

mod body;
mod header;
mod method;
mod spec;

pub use body::{MultipartField, RequestBody};
pub use header::{AUTHORIZATION, Header, Headers};
pub use method::HttpMethod;
pub use spec::ApiRequest;
