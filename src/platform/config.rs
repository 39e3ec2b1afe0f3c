// EMR Log Analyser - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for the analyser's configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/emr-log-analyser/).
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `development` or `production`.
    pub environment: Option<String>,
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[display]` section.
    pub display: DisplaySection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[display]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Width of the MESSAGE column before truncation.
    pub message_width: Option<usize>,
    /// Minimum count (exclusive) for class/thread buckets in the summary.
    pub stats_threshold: Option<usize>,
    /// Colourise terminal output.
    pub color: Option<bool>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Environment name; selects the log output format.
    pub environment: String,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// MESSAGE column width.
    pub message_width: usize,
    /// Summary display threshold for class/thread buckets.
    pub stats_threshold: usize,
    /// Colourise terminal output.
    pub color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: constants::ENV_DEVELOPMENT.to_string(),
            log_level: None,
            message_width: constants::DEFAULT_MESSAGE_WIDTH,
            stats_threshold: constants::DEFAULT_STATS_THRESHOLD,
            color: true,
        }
    }
}

/// Validate a parsed config, collecting one warning per rejected value.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    if let Some(env) = raw.environment {
        let lower = env.to_lowercase();
        if lower == constants::ENV_DEVELOPMENT || lower == constants::ENV_PRODUCTION {
            config.environment = lower;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "environment".to_string(),
                value: env,
                expected: format!(
                    "\"{}\" or \"{}\"",
                    constants::ENV_DEVELOPMENT,
                    constants::ENV_PRODUCTION
                ),
            });
        }
    }

    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level,
                expected: constants::VALID_LOG_LEVELS.join(", "),
            });
        }
    }

    if let Some(width) = raw.display.message_width {
        if (constants::MIN_MESSAGE_WIDTH..=constants::MAX_MESSAGE_WIDTH).contains(&width) {
            config.message_width = width;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "display.message_width".to_string(),
                value: width.to_string(),
                expected: format!(
                    "{}-{}",
                    constants::MIN_MESSAGE_WIDTH,
                    constants::MAX_MESSAGE_WIDTH
                ),
            });
        }
    }

    if let Some(threshold) = raw.display.stats_threshold {
        if threshold <= constants::MAX_STATS_THRESHOLD {
            config.stats_threshold = threshold;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "display.stats_threshold".to_string(),
                value: threshold.to_string(),
                expected: format!("0-{}", constants::MAX_STATS_THRESHOLD),
            });
        }
    }

    if let Some(color) = raw.display.color {
        config.color = color;
    }

    (config, warnings)
}

/// Load and validate a config file.
///
/// A missing file yields defaults with no warnings (first run). An
/// unreadable or unparseable file yields defaults plus a warning, so a bad
/// config never stops an analysis.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    if !config_path.exists() {
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            return (
                AppConfig::default(),
                vec![ConfigError::Io {
                    path: config_path.to_path_buf(),
                    source: e,
                }],
            );
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            return (
                AppConfig::default(),
                vec![ConfigError::TomlParse {
                    path: config_path.to_path_buf(),
                    source: e,
                }],
            );
        }
    };

    validate(raw)
}
