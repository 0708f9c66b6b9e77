//! HTTP protocol layer module
//!
//! Request/response value types and the extension→MIME table, independent of
//! how a request is dispatched.

pub mod mime;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::ServletRequest;
pub use response::{build_400_response, build_413_response, ServletResponse};
