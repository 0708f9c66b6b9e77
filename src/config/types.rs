// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub servlets: ServletsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: debug, info, warn or error
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Static dispatch configuration, consumed by the filter chain
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Filesystem prefix every request URL is resolved against
    pub document_root: String,
    /// Forward target for `/`
    pub index_page: String,
    /// Forward target when the protected config file is requested without access
    pub status_401_page: String,
    /// Forward target for unknown extensions
    pub status_404_page: String,
    /// Name of the server's own configuration file
    pub config_file_name: String,
    /// Allow serving `config_file_name` as a static file
    pub access_server_pages: bool,
    /// Largest static file read into memory, in bytes
    pub max_file_size: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            document_root: "./www".to_string(),
            index_page: "/index.html".to_string(),
            status_401_page: "/config/pages/401.html".to_string(),
            status_404_page: "/config/pages/404.html".to_string(),
            config_file_name: "CPPWeb.ini".to_string(),
            access_server_pages: false,
            max_file_size: 32 * 1024 * 1024,
        }
    }
}

/// Built-in servlets
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServletsConfig {
    #[serde(default = "default_health_enabled")]
    pub health_enabled: bool,
    #[serde(default = "default_liveness_path")]
    pub liveness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_liveness_path() -> String {
    "/healthz".to_string()
}

impl Default for ServletsConfig {
    fn default() -> Self {
        Self {
            health_enabled: default_health_enabled(),
            liveness_path: default_liveness_path(),
        }
    }
}
