//! Filter chain
//!
//! The dispatch point for one request: a registered servlet gets the verb
//! method matching the request, otherwise the URL is served as a static file
//! or forwarded to an index/status page.

use hyper::StatusCode;
use std::sync::Arc;

use super::static_files;
use crate::config::DispatchConfig;
use crate::http::mime::{self, TEXT_HTML_UTF8};
use crate::http::response::error_page;
use crate::http::{ServletRequest, ServletResponse};
use crate::logger;
use crate::servlet::{HttpVerb, Servlet};

/// How a request was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The servlet method for this verb ran
    Servlet(HttpVerb),
    /// A servlet is registered but has no method for the request's verb
    Ignored,
    /// Served from disk or forwarded
    Static,
}

impl DispatchOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Servlet(_) => "servlet",
            Self::Ignored => "ignored",
            Self::Static => "static",
        }
    }
}

pub struct FilterChain<'a> {
    servlet: Option<Arc<dyn Servlet>>,
    config: &'a DispatchConfig,
}

impl<'a> FilterChain<'a> {
    pub fn new(servlet: Option<Arc<dyn Servlet>>, config: &'a DispatchConfig) -> Self {
        Self { servlet, config }
    }

    pub async fn do_filter(
        &self,
        req: &ServletRequest,
        resp: &mut ServletResponse,
    ) -> DispatchOutcome {
        if let Some(servlet) = &self.servlet {
            let Some(verb) = HttpVerb::from_method(req.method()) else {
                logger::log_debug(&format!(
                    "No servlet method for {} {}, response left untouched",
                    req.method(),
                    req.request_url()
                ));
                return DispatchOutcome::Ignored;
            };
            verb.invoke(servlet.as_ref(), req, resp);
            return DispatchOutcome::Servlet(verb);
        }

        self.serve_static(req, resp).await;
        DispatchOutcome::Static
    }

    async fn serve_static(&self, req: &ServletRequest, resp: &mut ServletResponse) {
        let url = req.request_url();

        if url.is_empty() || url == "/" {
            self.forward(&self.config.index_page, req, resp).await;
            return;
        }

        let extension = mime::file_extension(url);
        if extension.as_deref() == Some("ini") && !self.may_serve_ini(url) {
            logger::log_warning(&format!("Refused access to server configuration: {url}"));
            resp.set_status(StatusCode::UNAUTHORIZED);
            self.forward(&self.config.status_401_page, req, resp).await;
            return;
        }

        match extension.as_deref().and_then(mime::get_content_type) {
            Some(content_type) => self.write_file(req, url, content_type, resp).await,
            None => {
                resp.set_status(StatusCode::NOT_FOUND);
                resp.set_header("Content-Type", TEXT_HTML_UTF8);
                self.forward(&self.config.status_404_page, req, resp).await;
            }
        }
    }

    /// The server's own config file is only served when access is enabled
    fn may_serve_ini(&self, url: &str) -> bool {
        self.config.access_server_pages
            || !mime::file_name(url).eq_ignore_ascii_case(&self.config.config_file_name)
    }

    async fn write_file(
        &self,
        req: &ServletRequest,
        url: &str,
        content_type: &str,
        resp: &mut ServletResponse,
    ) {
        match static_files::read_file(req.path(), url, self.config.max_file_size).await {
            Ok(data) => {
                resp.set_header("Content-Type", content_type);
                resp.write(&data);
            }
            Err(e) => {
                let status = static_files::error_status(&e);
                if status == StatusCode::NOT_FOUND {
                    logger::log_debug(&format!("Static file not found: {url}: {e}"));
                } else {
                    logger::log_warning(&format!("Failed to read '{url}': {e}"));
                }
                resp.send_error(status, &e.to_string());
            }
        }
    }

    /// Serve `target` for this request without a client-visible redirect
    ///
    /// The status already set on `resp` is kept. A forward does not forward
    /// again: an unreadable target gets a built-in page for that status.
    pub async fn forward(&self, target: &str, req: &ServletRequest, resp: &mut ServletResponse) {
        match static_files::read_file(req.path(), target, self.config.max_file_size).await {
            Ok(data) => {
                let content_type = mime::content_type_for_url(target).unwrap_or(TEXT_HTML_UTF8);
                resp.set_header("Content-Type", content_type);
                resp.write(&data);
            }
            Err(e) => {
                logger::log_debug(&format!("Forward target '{target}' unavailable: {e}"));
                if resp.status() == StatusCode::OK {
                    resp.set_status(StatusCode::NOT_FOUND);
                }
                resp.set_header("Content-Type", TEXT_HTML_UTF8);
                resp.write(error_page(resp.status(), None).as_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Method;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        root: PathBuf,
        config: DispatchConfig,
    }

    impl Fixture {
        /// Document root is `<tempdir>/www` so tests can place files outside it
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path().join("www");
            std::fs::create_dir(&root).unwrap();
            let config = DispatchConfig {
                document_root: root.to_str().unwrap().to_string(),
                ..DispatchConfig::default()
            };
            Self { dir, root, config }
        }

        fn file(&self, rel: &str, content: &[u8]) {
            let path = self.root.join(rel.trim_start_matches('/'));
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }

        async fn get(&self, url: &str) -> ServletResponse {
            self.request(Method::GET, url, None).await.0
        }

        async fn request(
            &self,
            method: Method,
            url: &str,
            servlet: Option<Arc<dyn Servlet>>,
        ) -> (ServletResponse, DispatchOutcome) {
            let req = ServletRequest::new(method, url, self.config.document_root.as_str());
            let mut resp = ServletResponse::new();
            let outcome = FilterChain::new(servlet, &self.config)
                .do_filter(&req, &mut resp)
                .await;
            (resp, outcome)
        }
    }

    fn body_text(resp: &ServletResponse) -> String {
        String::from_utf8(resp.body().to_vec()).unwrap()
    }

    /// Records every servlet method call
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<HttpVerb>>,
    }

    impl Recorder {
        fn record(&self, verb: HttpVerb, resp: &mut ServletResponse) {
            self.calls.lock().unwrap().push(verb);
            resp.write(format!("{verb:?}").as_bytes());
        }

        fn calls(&self) -> Vec<HttpVerb> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Servlet for Recorder {
        fn do_get(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
            self.record(HttpVerb::Get, resp);
        }
        fn do_post(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
            self.record(HttpVerb::Post, resp);
        }
        fn do_put(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
            self.record(HttpVerb::Put, resp);
        }
        fn do_delete(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
            self.record(HttpVerb::Delete, resp);
        }
        fn do_options(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
            self.record(HttpVerb::Options, resp);
        }
        fn do_trace(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
            self.record(HttpVerb::Trace, resp);
        }
    }

    #[tokio::test]
    async fn test_known_extensions_content_type() {
        let fixture = Fixture::new();
        let table = [
            ("html", "text/html; charset=UTF-8"),
            ("htm", "text/html; charset=UTF-8"),
            ("css", "text/css; charset=UTF-8"),
            ("txt", "text/plain; charset=UTF-8"),
            ("php", "text/php; charset=UTF-8"),
            ("ini", "text/ini; charset=UTF-8"),
            ("ico", "image/vnd.microsoft.icon"),
            ("png", "image/png"),
            ("gif", "image/gif"),
            ("bmp", "image/bmp"),
            ("jpe", "image/jpeg"),
            ("jpg", "image/jpeg"),
            ("tif", "image/tiff"),
            ("tiff", "image/tiff"),
            ("svg", "image/svg+xml"),
            ("svgz", "image/svg+xml"),
            ("pdf", "application/pdf"),
            ("xml", "application/xml"),
            ("json", "application/json"),
            ("zip", "application/zip"),
            ("mp3", "audio/mp3"),
            ("mp4", "audio/mp4"),
            ("flv", "video/flv"),
            ("doc", "application/msword"),
            ("rtf", "application/rtf"),
            ("xls", "application/vnd.ms-excel"),
            ("ppt", "application/vnd.ms-powerpoint"),
            ("js", "application/javascript"),
            ("odt", "application/vnd.oasis.opendocument.text"),
            ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
            ("swf", "application/x-shockwave-flash"),
            ("rar", "application/x-rar-compressed"),
            ("exe", "application/x-msdownload"),
            ("msi", "application/x-msdownload"),
            ("cab", "application/vnd.ms-cab-compressed"),
            ("psd", "image/vnd.adobe.photoshop"),
            ("ai", "application/postscript"),
            ("eps", "application/postscript"),
            ("ps", "application/postscript"),
        ];

        for (ext, expected) in table {
            let url = format!("/files/sample.{ext}");
            fixture.file(&url, ext.as_bytes());

            let resp = fixture.get(&url).await;
            assert_eq!(resp.status(), StatusCode::OK, "status for .{ext}");
            assert_eq!(resp.header("Content-Type"), Some(expected), "type for .{ext}");
            assert_eq!(resp.body(), ext.as_bytes(), "body for .{ext}");
        }
    }

    #[tokio::test]
    async fn test_uppercase_extension() {
        let fixture = Fixture::new();
        fixture.file("/LOGO.PNG", b"png");

        let resp = fixture.get("/LOGO.PNG").await;
        assert_eq!(resp.header("Content-Type"), Some("image/png"));
    }

    #[tokio::test]
    async fn test_root_forwards_to_index() {
        let fixture = Fixture::new();
        fixture.file("/index.html", b"<h1>home</h1>");

        for url in ["/", ""] {
            let resp = fixture.get(url).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.header("Content-Type"), Some(TEXT_HTML_UTF8));
            assert_eq!(body_text(&resp), "<h1>home</h1>");
        }
    }

    #[tokio::test]
    async fn test_root_forwards_to_configured_index() {
        let mut fixture = Fixture::new();
        fixture.config.index_page = "/app/start.htm".to_string();
        fixture.file("/index.html", b"default");
        fixture.file("/app/start.htm", b"configured");

        let resp = fixture.get("/").await;
        assert_eq!(body_text(&resp), "configured");
    }

    #[tokio::test]
    async fn test_missing_index_is_404() {
        let fixture = Fixture::new();

        let resp = fixture.get("/").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.header("Content-Type"), Some(TEXT_HTML_UTF8));
        assert!(body_text(&resp).contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_protected_config_without_access() {
        let fixture = Fixture::new();
        fixture.file("/CPPWeb.ini", b"[config]\nsecret=1");
        fixture.file("/config/pages/401.html", b"<h1>go away</h1>");

        let resp = fixture.get("/CPPWeb.ini").await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.header("Content-Type"), Some(TEXT_HTML_UTF8));
        assert_eq!(body_text(&resp), "<h1>go away</h1>");
    }

    #[tokio::test]
    async fn test_protected_config_in_subdirectory() {
        let fixture = Fixture::new();
        fixture.file("/config/cppweb.INI", b"secret=1");

        let resp = fixture.get("/config/cppweb.INI").await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(!body_text(&resp).contains("secret"));
        // No 401 page on disk: built-in page
        assert!(body_text(&resp).contains("401 Unauthorized"));
    }

    #[tokio::test]
    async fn test_protected_config_with_access() {
        let mut fixture = Fixture::new();
        fixture.config.access_server_pages = true;
        fixture.file("/CPPWeb.ini", b"[config]\nsecret=1");

        let resp = fixture.get("/CPPWeb.ini").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.header("Content-Type"), Some("text/ini; charset=UTF-8"));
        assert_eq!(body_text(&resp), "[config]\nsecret=1");
    }

    #[tokio::test]
    async fn test_other_ini_served() {
        let fixture = Fixture::new();
        fixture.file("/app.ini", b"name=app");

        let resp = fixture.get("/app.ini").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.header("Content-Type"), Some("text/ini; charset=UTF-8"));
    }

    #[tokio::test]
    async fn test_unknown_extension_forwards_to_404() {
        let fixture = Fixture::new();
        fixture.file("/data.bin", b"\x00\x01");
        fixture.file("/config/pages/404.html", b"<h1>lost</h1>");

        let resp = fixture.get("/data.bin").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.header("Content-Type"), Some(TEXT_HTML_UTF8));
        assert_eq!(body_text(&resp), "<h1>lost</h1>");
        // Content-Type is set once, not duplicated by the forward
        let count = resp
            .headers()
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case("content-type"))
            .count();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_no_extension_forwards_to_404() {
        let fixture = Fixture::new();

        let resp = fixture.get("/about").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.header("Content-Type"), Some(TEXT_HTML_UTF8));
        assert!(body_text(&resp).contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_missing_file_reports_os_error() {
        let fixture = Fixture::new();
        let os_message = std::fs::canonicalize(fixture.root.join("missing.css"))
            .unwrap_err()
            .to_string();

        let resp = fixture.get("/missing.css").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.header("Content-Type"), Some(TEXT_HTML_UTF8));
        assert!(body_text(&resp).contains(&os_message));
    }

    #[tokio::test]
    async fn test_traversal_is_forbidden() {
        let fixture = Fixture::new();
        std::fs::write(fixture.dir.path().join("outside.txt"), b"outside secret").unwrap();

        let resp = fixture.get("/../outside.txt").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(!body_text(&resp).contains("outside secret"));
    }

    #[tokio::test]
    async fn test_oversize_file_is_refused() {
        let mut fixture = Fixture::new();
        fixture.config.max_file_size = 8;
        fixture.file("/big.txt", b"way more than eight bytes");

        let resp = fixture.get("/big.txt").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(&resp).contains("byte limit"));
    }

    #[tokio::test]
    async fn test_servlet_verb_invoked_once() {
        let fixture = Fixture::new();
        let cases = [
            (Method::GET, HttpVerb::Get),
            (Method::POST, HttpVerb::Post),
            (Method::PUT, HttpVerb::Put),
            (Method::DELETE, HttpVerb::Delete),
            (Method::OPTIONS, HttpVerb::Options),
            (Method::TRACE, HttpVerb::Trace),
        ];

        for (method, verb) in cases {
            let recorder = Arc::new(Recorder::default());
            let servlet: Arc<dyn Servlet> = recorder.clone();

            let (resp, outcome) = fixture.request(method, "/app", Some(servlet)).await;
            assert_eq!(outcome, DispatchOutcome::Servlet(verb));
            assert_eq!(recorder.calls(), vec![verb]);
            assert_eq!(body_text(&resp), format!("{verb:?}"));
        }
    }

    #[tokio::test]
    async fn test_unknown_verb_is_ignored() {
        let fixture = Fixture::new();

        for method in [Method::HEAD, Method::PATCH, Method::CONNECT] {
            let recorder = Arc::new(Recorder::default());
            let servlet: Arc<dyn Servlet> = recorder.clone();

            let (resp, outcome) = fixture.request(method, "/app", Some(servlet)).await;
            assert_eq!(outcome, DispatchOutcome::Ignored);
            assert!(recorder.calls().is_empty());
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(resp.headers().is_empty());
            assert!(resp.body().is_empty());
        }
    }

    #[tokio::test]
    async fn test_servlet_shadows_static_file() {
        let fixture = Fixture::new();
        fixture.file("/report.pdf", b"%PDF");
        let recorder = Arc::new(Recorder::default());
        let servlet: Arc<dyn Servlet> = recorder.clone();

        let (resp, outcome) = fixture.request(Method::GET, "/report.pdf", Some(servlet)).await;
        assert_eq!(outcome, DispatchOutcome::Servlet(HttpVerb::Get));
        assert_eq!(body_text(&resp), "Get");
        assert!(resp.header("Content-Type").is_none());
    }

    #[tokio::test]
    async fn test_static_ignores_method() {
        let fixture = Fixture::new();
        fixture.file("/form.html", b"<form>");

        let (resp, outcome) = fixture.request(Method::POST, "/form.html", None).await;
        assert_eq!(outcome, DispatchOutcome::Static);
        assert_eq!(body_text(&resp), "<form>");
    }
}
