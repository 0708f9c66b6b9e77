//! Request entry module
//!
//! Turns a `hyper` request into a `ServletRequest`, runs it through the filter
//! chain with the servlet registered for its URL, and writes the access log.

use crate::config::AppState;
use crate::handler::filter_chain::{DispatchOutcome, FilterChain};
use crate::http::{self, ServletRequest, ServletResponse};
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let started = Instant::now();
    let max_body_size = state.config.http.max_body_size;

    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Ok(resp);
    }

    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            return Ok(http::build_413_response());
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Ok(http::build_400_response());
        }
    };

    let servlet_req = ServletRequest::from_parts(&parts, body, &state.config.dispatch.document_root);
    let (resp, outcome) = dispatch(&servlet_req, &state).await;

    if state.access_log_enabled() {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = resp.status().as_u16();
        entry.body_bytes = resp.body().len();
        entry.referer = servlet_req.header("referer").map(ToString::to_string);
        entry.user_agent = servlet_req.header("user-agent").map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        entry.handled_by = outcome.label();
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    let is_head = parts.method == Method::HEAD;
    Ok(resp.into_hyper(&state.config.http.server_name, is_head))
}

/// Run one request through the filter chain
pub async fn dispatch(req: &ServletRequest, state: &AppState) -> (ServletResponse, DispatchOutcome) {
    let servlet = state.servlets.lookup(req.request_url());
    let chain = FilterChain::new(servlet, &state.config.dispatch);

    let mut resp = ServletResponse::new();
    let outcome = chain.do_filter(req, &mut resp).await;
    (resp, outcome)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
