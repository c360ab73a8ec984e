//! Application configuration loaded from environment variables.
//!
//! Every setting has a default, so the binary runs with zero configuration
//! from a directory holding the usual files (`Data/`,
//! `credentials.json`, `specialdays.json`, `translate_de.json`).

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use mealday_notify::Credentials;
use mealday_shared::constants::{
    DEFAULT_ACTIVE_DAYS, DEFAULT_CREDENTIALS_FILE, DEFAULT_DATA_DIR, DEFAULT_REPORT_DIR,
    DEFAULT_SPECIAL_DAYS_FILE, DEFAULT_TRANSLATION_FILE,
};
use mealday_shared::translate::parse_special_days;
use mealday_shared::TranslationFile;
use mealday_store::EngineConfig;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root of the `year/week/day` tree.
    /// Env: `MEALDAY_DATA_DIR`
    /// Default: `Data`
    pub data_dir: PathBuf,

    /// Output directory of `create-report`; wiped on every run.
    /// Env: `MEALDAY_REPORT_DIR`
    /// Default: `Sphinx-docs/report`
    pub report_dir: PathBuf,

    /// Weekdays carrying a message, Monday = 0.
    /// Env: `MEALDAY_ACTIVE_DAYS` (comma separated, e.g. `0,1,2,3,4`)
    pub active_days: BTreeSet<u8>,

    /// Env: `MEALDAY_CREDENTIALS`
    /// Default: `credentials.json`
    pub credentials_path: PathBuf,

    /// `"DD.MM" -> note` map.
    /// Env: `MEALDAY_SPECIAL_DAYS`
    /// Default: `specialdays.json`
    pub special_days_path: PathBuf,

    /// Flat translation table, optionally with a `weekday_map`.
    /// Env: `MEALDAY_TRANSLATION`
    /// Default: `translate_de.json`
    pub translation_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            active_days: DEFAULT_ACTIVE_DAYS.into_iter().collect(),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            special_days_path: PathBuf::from(DEFAULT_SPECIAL_DAYS_FILE),
            translation_path: PathBuf::from(DEFAULT_TRANSLATION_FILE),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("MEALDAY_DATA_DIR") {
            config.data_dir = PathBuf::from(path);
        }

        if let Some(path) = lookup("MEALDAY_REPORT_DIR") {
            config.report_dir = PathBuf::from(path);
        }

        if let Some(days) = lookup("MEALDAY_ACTIVE_DAYS") {
            match parse_active_days(&days) {
                Ok(parsed) => config.active_days = parsed,
                Err(e) => {
                    tracing::warn!(
                        value = %days,
                        error = %e,
                        "Invalid MEALDAY_ACTIVE_DAYS, using default"
                    );
                }
            }
        }

        if let Some(path) = lookup("MEALDAY_CREDENTIALS") {
            config.credentials_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("MEALDAY_SPECIAL_DAYS") {
            config.special_days_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("MEALDAY_TRANSLATION") {
            config.translation_path = PathBuf::from(path);
        }

        // RUST_LOG is read by tracing-subscriber's EnvFilter directly.

        config
    }

    /// Translation table and weekday names; English if the file is missing
    /// or unreadable.
    pub fn load_translation(&self) -> TranslationFile {
        let Some(json) = read_optional(&self.translation_path, "translation") else {
            return TranslationFile::default();
        };
        TranslationFile::parse(&json).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.translation_path.display(),
                error = %e,
                "Invalid translation file, using English"
            );
            TranslationFile::default()
        })
    }

    /// Special-day notes; empty if the file is missing or unreadable.
    pub fn load_special_days(&self) -> HashMap<String, String> {
        let Some(json) = read_optional(&self.special_days_path, "special days") else {
            return HashMap::new();
        };
        parse_special_days(&json).unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.special_days_path.display(),
                error = %e,
                "Invalid special days file, ignoring"
            );
            HashMap::new()
        })
    }

    /// Credentials from the file, then overridden from the environment.
    pub fn load_credentials(&self) -> Credentials {
        let mut credentials = read_optional(&self.credentials_path, "credentials")
            .and_then(|json| match Credentials::from_json(&json) {
                Ok(credentials) => Some(credentials),
                Err(e) => {
                    tracing::warn!(
                        path = %self.credentials_path.display(),
                        error = %e,
                        "Invalid credentials file"
                    );
                    None
                }
            })
            .unwrap_or_default();
        credentials.apply_env();
        credentials
    }

    /// Engine configuration with the lookup files loaded.
    pub fn engine_config(&self) -> EngineConfig {
        let translation = self.load_translation();
        let mut engine = EngineConfig::new(&self.data_dir, &self.report_dir);
        engine.active_days = self.active_days.clone();
        engine.weekday_names = translation.weekday_names;
        engine.translator = translation.translator;
        engine.special_days = self.load_special_days();
        engine
    }
}

/// Parse `"0,1,2"` into weekday numbers.  An empty list is allowed.
fn parse_active_days(value: &str) -> Result<BTreeSet<u8>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<u8>() {
            Ok(day) if day < 7 => Ok(day),
            _ => Err(format!("expected a weekday number 0-6, got {part:?}")),
        })
        .collect()
}

fn read_optional(path: &Path, what: &str) -> Option<String> {
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "No {what} file found, using defaults");
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read {what} file");
            None
        }
    }
}
