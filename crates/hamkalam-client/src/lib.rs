//! Page-side chat components.
//!
//! Each component is a thin, independent handler owning its dependencies
//! explicitly — the API handle, the socket command sender and the counterpart
//! user id are injected at construction, never read from shared globals.

pub mod actions;
pub mod api;
pub mod attachment;
pub mod config;
pub mod prompt;
pub mod push;
pub mod realtime;
pub mod search;
pub mod theme;
pub mod view;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise structured logging for the client. Respects `RUST_LOG`.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hamkalam_client=debug,hamkalam_net=debug,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
