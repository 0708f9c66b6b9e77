// Server loop module
// Accepts connections until shutdown, then waits for in-flight connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop on a `LocalSet` until `shutdown` is notified
///
/// After shutdown, in-flight connections get up to the configured write
/// timeout to finish before the function returns.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                logger::log_info("Listener closed, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);
    let grace = Duration::from_secs(state.config.performance.write_timeout);
    drain_connections(&active_connections, grace).await;
    Ok(())
}

/// Wait until no connection is active or `grace` has elapsed
async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            logger::log_info("All connections closed, shutdown complete");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {active} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
