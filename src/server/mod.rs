//! Server module
//!
//! Listener creation, connection handling, the accept loop and signal-driven shutdown.

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;

use crate::config::{AppState, Config};
use crate::error::StartupError;
use crate::logger;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::{start_signal_handler, SignalHandler};

/// Build state, bind, and serve until SIGTERM/SIGINT
pub async fn run(config: Config) -> Result<(), StartupError> {
    let addr = config.get_socket_addr()?;
    let listener =
        create_listener(addr).map_err(|source| StartupError::Bind { addr, source })?;
    let state = Arc::new(AppState::new(config)?);

    logger::log_server_start(&addr, &state.config);

    let signals = Arc::new(SignalHandler::new());
    start_signal_handler(Arc::clone(&signals));

    start_server_loop(listener, state, signals).await;
    Ok(())
}
