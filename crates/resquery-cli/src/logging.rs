use tracing_subscriber::EnvFilter;

/// Picks the filter directive: `-v` flags win, then `RUST_LOG`, then the
/// config file, then `warn`.
pub fn directive(verbose: u8, env: Option<&str>, configured: Option<&str>) -> String {
    match verbose {
        0 => env
            .filter(|s| !s.trim().is_empty())
            .or(configured)
            .unwrap_or("warn")
            .to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Installs the stderr subscriber. Safe to call more than once.
pub fn init(verbose: u8, configured: Option<&str>) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = directive(verbose, env.as_deref(), configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_matrix() {
        for (verbose, expected) in [(0, "warn"), (1, "debug"), (2, "trace"), (5, "trace")] {
            assert_eq!(directive(verbose, None, None), expected, "-v x{verbose}");
        }
    }

    #[test]
    fn precedence() {
        assert_eq!(directive(0, Some("resquery=trace"), Some("info")), "resquery=trace");
        assert_eq!(directive(0, Some(" "), Some("info")), "info");
        assert_eq!(directive(1, Some("error"), Some("info")), "debug");
    }
}
