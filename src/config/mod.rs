// Configuration module entry point
// Loads the layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, DispatchConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    ServletsConfig,
};

/// Config file used when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `SERVER_*` environment variables override it,
    /// with `__` separating nested keys (`SERVER_DISPATCH__INDEX_PAGE`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let dispatch = DispatchConfig::default();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "rust_servlet/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("dispatch.document_root", dispatch.document_root)?
            .set_default("dispatch.index_page", dispatch.index_page)?
            .set_default("dispatch.status_401_page", dispatch.status_401_page)?
            .set_default("dispatch.status_404_page", dispatch.status_404_page)?
            .set_default("dispatch.config_file_name", dispatch.config_file_name)?
            .set_default("dispatch.access_server_pages", dispatch.access_server_pages)?
            .set_default("dispatch.max_file_size", dispatch.max_file_size)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
