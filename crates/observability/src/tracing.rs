//! Tracing/logging initialization.
//!
//! `RUST_LOG` wins over the configured filter so a single run can be made
//! noisier without touching `BUDBAR_LOG_FILTER`.

use tracing_subscriber::EnvFilter;

use budbar_infra::{LogConfig, LogFormat};

/// Initialize with default settings (JSON, `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(&LogConfig::default());
}

/// Initialize tracing/logging for the process from `config`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_with(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let installed = match config.format {
        LogFormat::Json => builder.json().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().with_target(false).try_init(),
    };

    installed.is_ok()
}

/// Filter directives for `config`; falls back to `info` when blank.
pub fn filter_directives(config: &LogConfig) -> String {
    let filter = config.filter.trim();
    if filter.is_empty() {
        "info".to_string()
    } else {
        filter.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filter_falls_back_to_info() {
        let config = LogConfig {
            format: LogFormat::Compact,
            filter: "  ".to_string(),
        };
        assert_eq!(filter_directives(&config), "info");

        let config = LogConfig {
            filter: "budbar_cart=debug".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(filter_directives(&config), "budbar_cart=debug");
    }

    #[test]
    fn second_init_is_a_no_op() {
        let config = LogConfig {
            format: LogFormat::Compact,
            ..LogConfig::default()
        };
        init_with(&config);
        assert!(!init_with(&config));
        init();
        ::tracing::info!("still logging");
    }
}
