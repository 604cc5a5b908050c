use crate::constants::LOG_DIR_ENV_VAR;
use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging. Console output goes to stderr so stdout carries only
/// the report; a JSON file log is added when `AWARD_FINDER_LOG_DIR` is set.
pub fn init_logging() {
    // Respect RUST_LOG if set; otherwise keep the console quiet unless something goes wrong
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("award_finder=warn,nih_search=warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let file_layer = match std::env::var(LOG_DIR_ENV_VAR) {
        Ok(dir) if !dir.trim().is_empty() => {
            let _ = fs::create_dir_all(&dir);

            // Non-blocking file appender with daily rotation
            let file_appender = tracing_appender::rolling::daily(&dir, "award_finder.log");
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the guard alive for the life of the process so logs flush on exit
            std::mem::forget(guard);
            Some(fmt::layer().json().with_writer(non_blocking_writer))
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();
}
