//! HTTP response module
//!
//! `ServletResponse` is the sink the filter chain and servlets write into.
//! It is serialized to a `hyper` response once dispatch is done. The plain
//! builders below answer requests that never reach dispatch.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::mime::TEXT_HTML_UTF8;

/// Response accumulated during dispatch
///
/// Headers keep insertion order on the wire.
#[derive(Debug, Clone)]
pub struct ServletResponse {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Default for ServletResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ServletResponse {
    pub const fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Append a header, keeping any existing header of the same name
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Replace the first header with this name in place, or append it
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// First value of a header, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn write(&mut self, data: &[u8]) {
        self.body.extend_from_slice(data);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the body with an HTML error page carrying `message`
    pub fn send_error(&mut self, status: StatusCode, message: &str) {
        self.status = status;
        self.set_header("Content-Type", TEXT_HTML_UTF8);
        self.body = error_page(status, Some(message)).into_bytes();
    }

    /// Serialize into a `hyper` response
    ///
    /// `Content-Length` always reflects the full body; HEAD requests get no body.
    pub fn into_hyper(self, server_name: &str, is_head: bool) -> Response<Full<Bytes>> {
        let content_length = self.body.len();
        let mut builder = Response::builder().status(self.status);

        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if self.header("Content-Length").is_none() {
            builder = builder.header("Content-Length", content_length);
        }
        if !server_name.is_empty() && self.header("Server").is_none() {
            builder = builder.header("Server", server_name);
        }

        let body = if is_head {
            Bytes::new()
        } else {
            Bytes::from(self.body)
        };

        builder.body(Full::new(body)).unwrap_or_else(|e| {
            log_build_error(self.status.as_str(), &e);
            let mut fallback = Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

/// Small HTML page for a status, with an optional detail line
pub fn error_page(status: StatusCode, detail: Option<&str>) -> String {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let detail = detail
        .map(|d| format!("<p>{}</p>", escape_html(d)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body><h1>{title}</h1>{detail}</body>\n</html>"
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build 400 Bad Request response
pub fn build_400_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(400)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("400 Bad Request")))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("400 Bad Request")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
