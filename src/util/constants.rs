// EMR Log Analyser - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "emr-log-analyser";

/// Application identifier used for config directories.
pub const APP_ID: &str = "emr-log-analyser";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Presentation
// =============================================================================

/// Default maximum width (in characters) of the MESSAGE column before it
/// is truncated with `ELLIPSIS`.
pub const DEFAULT_MESSAGE_WIDTH: usize = 80;

/// Minimum user-configurable MESSAGE column width.
pub const MIN_MESSAGE_WIDTH: usize = 20;

/// Maximum user-configurable MESSAGE column width.
pub const MAX_MESSAGE_WIDTH: usize = 500;

/// Marker appended to truncated messages.
pub const ELLIPSIS: &str = "...";

/// Class and thread buckets are listed in the statistics summary only when
/// their count is strictly greater than this value. Levels are always listed.
pub const DEFAULT_STATS_THRESHOLD: usize = 5;

/// Upper bound on the configurable statistics threshold.
pub const MAX_STATS_THRESHOLD: usize = 10_000;

/// Column width of the LEVEL column in the record table.
pub const LEVEL_COLUMN_WIDTH: usize = 8;

/// Column width of the CLASS column in the record table.
pub const CLASS_COLUMN_WIDTH: usize = 50;

/// Column width of thread names in the statistics summary.
pub const THREAD_COLUMN_WIDTH: usize = 30;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `config.toml`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment name that selects human-readable log output.
pub const ENV_DEVELOPMENT: &str = "development";

/// Environment name that selects JSON log output.
pub const ENV_PRODUCTION: &str = "production";
