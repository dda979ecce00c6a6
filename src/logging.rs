// src/logging.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Include the module path in each line.
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), with_target: false }
    }
}

/// Installs a compact stderr subscriber. `RUST_LOG` takes precedence over
/// `config.level`. Calling this twice is harmless; the second call is ignored.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("correction_core={},{}", config.level, config.level)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .without_time()
        .compact();

    let _ = Registry::default().with(env_filter).with(console_layer).try_init();
}
