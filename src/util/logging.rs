// EMR Log Analyser - util/logging.rs
//
// Structured logging with runtime-selectable level and output shape.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug (sets level to debug)
//   - Config file: [logging] level = "debug"
//
// Output: always stderr, so stdout carries only the analysis report.
// `development` environment uses the compact human-readable formatter,
// `production` emits one JSON object per event.

use super::constants;
use tracing_subscriber::EnvFilter;

/// Output shape of diagnostic logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line events.
    #[default]
    Compact,
    /// Newline-delimited JSON events.
    Json,
}

impl LogFormat {
    /// Map a configured environment name to an output format.
    /// Anything other than `production` is treated as development.
    pub fn for_environment(environment: &str) -> Self {
        if environment.eq_ignore_ascii_case(constants::ENV_PRODUCTION) {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// Pick the filter directive.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
fn build_filter(debug_flag: bool, config_level: Option<&str>) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(constants::DEFAULT_LOG_LEVEL)
    }
}

/// Initialise the logging subsystem. Must be called at most once.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the level from config.toml (if present).
pub fn init(debug_flag: bool, config_level: Option<&str>, format: LogFormat) {
    let filter = build_filter(debug_flag, config_level);

    match format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .compact()
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .json()
            .init(),
    }

    tracing::debug!(
        app = constants::APP_NAME,
        version = constants::APP_VERSION,
        ?format,
        "Logging initialised"
    );
}
