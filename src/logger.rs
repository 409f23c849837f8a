use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "HYPERLOAD_LOG";

/// Installs the global `tracing` subscriber. Later calls are ignored.
///
/// While the dashboard owns the terminal the default level drops to `warn`.
pub fn init_logging(verbose: bool, no_color: bool, ui_active: bool) {
    let filter = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(default_directive(verbose, ui_active)),
            |value| {
                EnvFilter::try_new(value)
                    .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, ui_active)))
            },
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi_enabled(no_color, std::io::stderr().is_terminal()))
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Escape codes only reach a terminal, and never with `--no-color`.
pub(crate) const fn ansi_enabled(no_color: bool, stderr_is_terminal: bool) -> bool {
    !no_color && stderr_is_terminal
}

pub(crate) const fn default_directive(verbose: bool, ui_active: bool) -> &'static str {
    match (verbose, ui_active) {
        (_, true) => "warn",
        (true, false) => "debug",
        (false, false) => "info",
    }
}
