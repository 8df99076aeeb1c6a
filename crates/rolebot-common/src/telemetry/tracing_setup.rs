//! Log output for the bot process
//!
//! One `fmt` layer, pretty or JSON, behind an `EnvFilter`. `RUST_LOG`
//! replaces the computed directives entirely when set.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Environment;

/// Dependency targets held at warn unless RUST_LOG says otherwise
const QUIET_TARGETS: &[&str] = &["sqlx", "hyper", "hyper_util", "reqwest", "redis"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for terminals
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for the bot's own targets
    pub level: Level,
    pub format: LogFormat,
    /// Emit span open/close events (engine entry points are instrumented)
    pub span_events: bool,
    /// Include file, line and thread name
    pub source_location: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            span_events: false,
            source_location: true,
        }
    }
}

impl TracingConfig {
    /// Preset for the deployment environment
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: Level::DEBUG,
                span_events: true,
                ..Self::default()
            },
            Environment::Staging => Self::default(),
            Environment::Production => Self {
                format: LogFormat::Json,
                source_location: false,
                ..Self::default()
            },
        }
    }

    /// Filter directives used when `RUST_LOG` is unset
    fn directives(&self) -> String {
        let level = self.level.to_string().to_lowercase();
        std::iter::once(level)
            .chain(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Install the global subscriber with [`TracingConfig::default`]
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(&TracingConfig::default())
}

/// Install the global subscriber
///
/// Fails when a subscriber is already set; callers usually just report it.
pub fn try_init_tracing_with_config(config: &TracingConfig) -> Result<(), TracingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directives()));

    let layer = fmt::layer()
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_thread_names(config.source_location)
        .with_span_events(config.span_events());

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Json => registry.with(layer.json()).try_init(),
        LogFormat::Pretty => registry.with(layer).try_init(),
    };
    result.map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
