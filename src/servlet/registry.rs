//! Servlet registry
//!
//! Exact URL patterns take priority; patterns ending in `/*` match every path
//! below their prefix, longest prefix first.

use std::collections::HashMap;
use std::sync::Arc;

use super::Servlet;

#[derive(Default, Clone)]
pub struct ServletRegistry {
    exact: HashMap<String, Arc<dyn Servlet>>,
    /// Kept sorted by descending prefix length
    prefixes: Vec<(String, Arc<dyn Servlet>)>,
}

impl ServletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a servlet, replacing any servlet already bound to `pattern`
    pub fn register(&mut self, pattern: &str, servlet: Arc<dyn Servlet>) {
        if let Some(prefix) = pattern.strip_suffix("/*") {
            self.prefixes.retain(|(p, _)| p != prefix);
            self.prefixes.push((prefix.to_string(), servlet));
            self.prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        } else {
            self.exact.insert(pattern.to_string(), servlet);
        }
    }

    /// Servlet bound to a request URL, if any
    pub fn lookup(&self, url: &str) -> Option<Arc<dyn Servlet>> {
        if let Some(servlet) = self.exact.get(url) {
            return Some(Arc::clone(servlet));
        }

        self.prefixes
            .iter()
            .find(|(prefix, _)| matches_prefix(prefix, url))
            .map(|(_, servlet)| Arc::clone(servlet))
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `/api` matches `/api` and `/api/...` but not `/apis`; the empty prefix matches all
fn matches_prefix(prefix: &str, url: &str) -> bool {
    url.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || prefix.is_empty())
}
