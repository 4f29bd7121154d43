//! Logging Infrastructure
//!
//! Structured logging setup. The filter comes from `RUST_LOG` when set;
//! otherwise a sensible default is used. When a log directory is configured
//! the output goes to a daily-rolling file instead of stderr.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "store_server=info,tower_http=info";

/// Initialize the logger with optional file output
pub fn init_logger(log_dir: Option<&str>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(dir) = log_dir {
        let file_appender = tracing_appender::rolling::daily(dir, "store-server");
        subscriber.with_writer(file_appender).init();
        return;
    }

    subscriber.init();
}
