use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `CMDGUARD_LOG=debug`.
pub const LOG_ENV_VAR: &str = "CMDGUARD_LOG";

/// Install the stderr subscriber. Defaults to `warn` when the variable is
/// unset or unparsable. Safe to call more than once.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
