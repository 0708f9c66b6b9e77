//! Servlet request module
//!
//! Read-only view of one HTTP request as seen by the filter chain.

use hyper::body::Bytes;
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method};
use percent_encoding::percent_decode_str;

/// Request handed to the filter chain and to servlets
#[derive(Debug, Clone)]
pub struct ServletRequest {
    method: Method,
    /// Decoded request path, e.g. `/img/logo.png`
    url: String,
    /// Document root the URL is resolved against
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl ServletRequest {
    pub fn new(method: Method, url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Build from `hyper` request parts and an already collected body
    pub fn from_parts(parts: &Parts, body: Bytes, document_root: &str) -> Self {
        Self {
            method: parts.method.clone(),
            url: decode_path(parts.uri.path()),
            path: document_root.to_string(),
            query: parts.uri.query().map(ToString::to_string),
            headers: parts.headers.clone(),
            body,
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn request_url(&self) -> &str {
        &self.url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text; non-ASCII values are treated as absent
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Percent-decode a request path, keeping the raw form if it is not UTF-8
pub fn decode_path(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_string(), |decoded| decoded.into_owned())
}
