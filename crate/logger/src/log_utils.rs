use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when it is set, `default_value` is used otherwise
/// (e.g. `"info"` or `"parameter_manager_client=trace"`).
/// Calling it again is a no-op. Logs go to stderr so that the
/// command output on stdout stays parseable.
pub fn log_init(default_value: &str) {
    LOG_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_value));
        tracing_setup(filter);
    });
}

fn tracing_setup(filter: EnvFilter) {
    let format = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .compact();

    // another subscriber may already be installed (test harnesses)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init();
}
