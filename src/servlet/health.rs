// Liveness probe servlet

use super::Servlet;
use crate::http::{ServletRequest, ServletResponse};

pub struct HealthServlet;

impl Servlet for HealthServlet {
    fn do_get(&self, _req: &ServletRequest, resp: &mut ServletResponse) {
        resp.set_header("Content-Type", "text/plain");
        resp.set_header("Cache-Control", "no-cache");
        resp.write(b"ok");
    }
}
