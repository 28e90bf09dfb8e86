use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the process-wide tracing subscriber: `RUST_LOG` when set,
/// the given default level otherwise, JSON output with file/line fields.
pub fn init_tracing(default_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .init();
}
