//! Servlet module
//!
//! Application handlers exposing one method per HTTP verb, and the registry
//! that maps request URLs to them.

mod health;
mod registry;

pub use health::HealthServlet;
pub use registry::ServletRegistry;

use hyper::{Method, StatusCode};

use crate::http::{ServletRequest, ServletResponse};

const ALLOWED_VERBS: &str = "GET, POST, PUT, DELETE, OPTIONS, TRACE";

/// Application handler
///
/// Every verb defaults to 405; implementors override the ones they support.
pub trait Servlet: Send + Sync {
    fn do_get(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
        method_not_allowed(resp);
    }

    fn do_post(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
        method_not_allowed(resp);
    }

    fn do_put(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
        method_not_allowed(resp);
    }

    fn do_delete(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
        method_not_allowed(resp);
    }

    fn do_options(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
        method_not_allowed(resp);
    }

    fn do_trace(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
        method_not_allowed(resp);
    }
}

fn method_not_allowed(resp: &mut ServletResponse) {
    resp.set_status(StatusCode::METHOD_NOT_ALLOWED);
    resp.set_header("Allow", ALLOWED_VERBS);
    resp.set_header("Content-Type", "text/plain");
    resp.write(b"405 Method Not Allowed");
}

/// HTTP verbs a servlet can handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Trace,
}

impl HttpVerb {
    /// `None` for methods without a servlet entry point (HEAD, PATCH, CONNECT, ...)
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::POST => Some(Self::Post),
            Method::PUT => Some(Self::Put),
            Method::DELETE => Some(Self::Delete),
            Method::OPTIONS => Some(Self::Options),
            Method::TRACE => Some(Self::Trace),
            _ => None,
        }
    }

    /// Call the servlet method for this verb, exactly once
    pub fn invoke(self, servlet: &dyn Servlet, req: &ServletRequest, resp: &mut ServletResponse) {
        match self {
            Self::Get => servlet.do_get(req, resp),
            Self::Post => servlet.do_post(req, resp),
            Self::Put => servlet.do_put(req, resp),
            Self::Delete => servlet.do_delete(req, resp),
            Self::Options => servlet.do_options(req, resp),
            Self::Trace => servlet.do_trace(req, resp),
        }
    }
}
