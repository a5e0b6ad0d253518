//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

const DEFAULT_FILTER: &str = "info";

/// Pick the filter directive: `RUST_LOG`, then the config, then `info`
pub fn filter_directive(from_env: Option<String>, config: &LogConfig) -> String {
    from_env
        .filter(|value| !value.trim().is_empty())
        .or_else(|| config.filter.clone())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global fmt subscriber, writing to stderr
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init(config: &LogConfig) {
    let directive = filter_directive(std::env::var(EnvFilter::DEFAULT_ENV).ok(), config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("figment: ignoring invalid log filter {directive:?}: {err}");
        EnvFilter::new(DEFAULT_FILTER)
    });

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins_over_config() {
        let config = LogConfig {
            filter: Some("warn".into()),
        };
        assert_eq!(filter_directive(Some("debug".into()), &config), "debug");
        assert_eq!(filter_directive(Some("  ".into()), &config), "warn");
        assert_eq!(filter_directive(None, &config), "warn");
        assert_eq!(filter_directive(None, &LogConfig::default()), "info");
    }
}
