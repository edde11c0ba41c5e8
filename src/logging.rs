use tracing_subscriber::{fmt, EnvFilter};

/// Install the console subscriber used by every binary.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"info"`).
pub fn init(default_directive: &str) {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();
}

/// Route logs into the test harness output. Safe to call from every test.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sourashtra=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
