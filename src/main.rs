use std::sync::Arc;

use rust_servlet::config::{self, AppState, Config};
use rust_servlet::logger;
use rust_servlet::server::{self, signal};
use rust_servlet::servlet::{HealthServlet, ServletRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(AppState::new(&cfg, builtin_servlets(&cfg)));
    logger::log_server_start(&addr, &cfg);

    let signals = Arc::new(signal::SignalHandler::new());
    signal::start_signal_handler(Arc::clone(&signals));

    // Connections are served with spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run(listener, state, Arc::clone(&signals.shutdown)))
        .await
}

fn builtin_servlets(cfg: &Config) -> ServletRegistry {
    let mut servlets = ServletRegistry::new();
    if cfg.servlets.health_enabled {
        servlets.register(&cfg.servlets.liveness_path, Arc::new(HealthServlet));
        logger::log_servlet_registered(&cfg.servlets.liveness_path);
    }
    servlets
}
