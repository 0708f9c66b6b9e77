//! Servlet-style front controller
//!
//! Each request is either handed to the servlet registered for its URL, by
//! HTTP verb, or served as a static file from the document root with a
//! `Content-Type` chosen by extension.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod servlet;
