/// Application name
pub const APP_NAME: &str = "mealday";

/// Maximum message length in characters (after NFC normalization)
pub const MAX_MESSAGE_LENGTH: usize = 280;

/// Status glyphs used in reports
pub const SYMBOL_OK: &str = "✅";
pub const SYMBOL_WARN: &str = "❎";
pub const SYMBOL_FAIL: &str = "❌";

/// Per-week log file name, stored next to the day files
pub const LOG_FILE_NAME: &str = "log.json";

/// Extension of day message files
pub const DAY_FILE_EXTENSION: &str = "txt";

/// Report file names inside the report directory
pub const PLANNED_REPORT_FILE: &str = "planned_status.rst";
pub const HISTORY_REPORT_FILE: &str = "history.rst";

/// Default locations, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "Data";
pub const DEFAULT_REPORT_DIR: &str = "Sphinx-docs/report";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_SPECIAL_DAYS_FILE: &str = "specialdays.json";
pub const DEFAULT_TRANSLATION_FILE: &str = "translate_de.json";

/// Monday through Friday, Monday = 0
pub const DEFAULT_ACTIVE_DAYS: [u8; 5] = [0, 1, 2, 3, 4];

/// Weekday names used when the translation table has no `weekday_map`
pub const DEFAULT_WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Width of the separator line in the terminal report
pub const TEXT_REPORT_RULE_WIDTH: usize = 44;

/// X (Twitter) v2 endpoint for creating a post
pub const X_POST_ENDPOINT: &str = "https://api.twitter.com/2/tweets";
