//! Request handler module
//!
//! Request entry, the filter chain that picks a servlet or a static file, and
//! static file loading.

pub mod filter_chain;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use filter_chain::{DispatchOutcome, FilterChain};
pub use router::{dispatch, handle_request};
