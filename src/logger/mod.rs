//! Logger module
//!
//! Logging utilities for the servlet server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled debug/info/warn/error lines to stdout/stderr or files

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    /// Parse a configured level name, defaulting to `Info`
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        Level::parse(&config.logging.level),
    )
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None => match level {
            Level::Debug => {}
            Level::Info => println!("{message}"),
            Level::Warn | Level::Error => eprintln!("{message}"),
        },
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write(Level::Info, "======================================");
    write(Level::Info, "Servlet server started successfully");
    write(Level::Info, &format!("Listening on: http://{addr}"));
    write(
        Level::Info,
        &format!("Document root: {}", config.dispatch.document_root),
    );
    write(
        Level::Info,
        &format!("Index page: {}", config.dispatch.index_page),
    );
    write(Level::Info, &format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write(Level::Info, &format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Info, &format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Info, &format!("Error log: {path}"));
    }
    write(Level::Info, "======================================\n");
}

pub fn log_servlet_registered(pattern: &str) {
    write(Level::Info, &format!("[Servlet] Registered: {pattern}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(Level::Debug, &format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_debug(message: &str) {
    write(Level::Debug, &format!("[DEBUG] {message}"));
}

pub fn log_info(message: &str) {
    write(Level::Info, &format!("[INFO] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
