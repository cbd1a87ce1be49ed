//! Logging setup
//!
//! `RUST_LOG` overrides the default filter, `LOG_FORMAT=json` switches to
//! JSON lines and `LOG_DIR` (when the directory exists) sends output to a
//! daily rolling file instead of stdout.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "storefront_server=info,tower_http=info";

/// Initialize the global subscriber
pub fn init_logger(json: bool, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_ids(false)
        .with_target(true);

    let file_writer = log_dir
        .map(Path::new)
        .filter(|p| p.is_dir())
        .map(|dir| tracing_appender::rolling::daily(dir, "storefront-server"));

    match (file_writer, json) {
        (Some(writer), true) => builder.json().with_writer(writer).with_ansi(false).init(),
        (Some(writer), false) => builder.with_writer(writer).with_ansi(false).init(),
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }
}
