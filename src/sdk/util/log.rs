use std::env;
use env_logger::{Builder, Env};

/// `RUST_LOG` wins; otherwise `info`, or `debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let level = env::var("RUST_LOG").unwrap_or_else(|_| default.to_string());
    Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();
}
