use std::sync::Once;

/// Environment variable consulted when no filter is given explicitly.
pub const LOG_ENV: &str = "BACKDROP_LOG";

/// Used when neither an explicit filter nor the environment sets one.
/// wgpu logs every pipeline and buffer at info.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger setup. `filter` uses `env_logger` syntax, e.g.
/// `"backdrop_scene=debug,info"`.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    /// Seconds-precision timestamps instead of none.
    pub timestamps: bool,
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.filter, std::env::var(LOG_ENV).ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        if config.timestamps {
            builder.format_timestamp_secs();
        } else {
            builder.format_timestamp(None);
        }
        builder.init();

        log::debug!("log filter: {filter}");
    });
}

/// Explicit filter, then environment, then [`DEFAULT_FILTER`]. Blank values are skipped.
fn resolve_filter(explicit: Option<String>, env: Option<String>) -> String {
    explicit
        .into_iter()
        .chain(env)
        .find(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_beats_environment() {
        let f = resolve_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn blank_values_fall_through_to_default() {
        assert_eq!(resolve_filter(Some("  ".into()), None), DEFAULT_FILTER);
        assert_eq!(resolve_filter(None, Some("trace".into())), "trace");
    }
}
