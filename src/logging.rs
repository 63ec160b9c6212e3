use tracing_subscriber::EnvFilter;

/// Initializes tracing for the binary.
/// The log level comes from the RUST_LOG environment variable
/// (e.g., RUST_LOG=sexpr=debug) and defaults to errors only. Output goes to stderr.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes tracing for unit tests: every level, routed through the test writer so
/// output is only shown for failing tests. Safe to call from every test.
#[cfg(test)]
pub fn init_test_logging() {
    static TRACING_INIT: std::sync::Once = std::sync::Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("trace")
            .with_test_writer()
            .try_init()
            .ok();
    });
}
