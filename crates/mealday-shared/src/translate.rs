//! Flat translation lookup.
//!
//! A translation table is a plain JSON object mapping English source strings
//! to their translation.  Lookups of unknown keys return the key itself, so
//! an empty table yields the English UI.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::constants::DEFAULT_WEEKDAY_NAMES;
use crate::error::LoadError;

/// Key of the nested weekday-name object inside a translation file.
const WEEKDAY_MAP_KEY: &str = "weekday_map";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translator {
    table: HashMap<String, String>,
}

impl Translator {
    pub fn new(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    /// Translate `key`, falling back to `key` itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Parsed content of a translation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFile {
    pub translator: Translator,
    /// Weekday number (Monday = 0) to display name.
    pub weekday_names: BTreeMap<u8, String>,
}

impl Default for TranslationFile {
    fn default() -> Self {
        Self {
            translator: Translator::default(),
            weekday_names: default_weekday_names(),
        }
    }
}

impl TranslationFile {
    /// Parse a translation file.
    ///
    /// String values become translation entries.  A nested `weekday_map`
    /// object overrides the English weekday names; any other non-string
    /// value is ignored.
    pub fn parse(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(LoadError::NotAnObject("translation file"));
        };

        let mut table = HashMap::new();
        let mut weekday_names = default_weekday_names();

        for (key, value) in map {
            match value {
                Value::String(text) => {
                    table.insert(key, text);
                }
                Value::Object(names) if key == WEEKDAY_MAP_KEY => {
                    for (num, name) in names {
                        match (num.parse::<u8>(), name.as_str()) {
                            (Ok(n), Some(name)) if n < 7 => {
                                weekday_names.insert(n, name.to_string());
                            }
                            _ => {
                                tracing::warn!(key = %num, "ignoring invalid weekday_map entry");
                            }
                        }
                    }
                }
                _ => {
                    tracing::debug!(key = %key, "ignoring non-string translation entry");
                }
            }
        }

        Ok(Self {
            translator: Translator::new(table),
            weekday_names,
        })
    }
}

/// English weekday names keyed by weekday number.
pub fn default_weekday_names() -> BTreeMap<u8, String> {
    DEFAULT_WEEKDAY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (i as u8, (*name).to_string()))
        .collect()
}

/// Parse a flat `"DD.MM" -> note` special-day file.
pub fn parse_special_days(json: &str) -> Result<HashMap<String, String>, LoadError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(map) = value else {
        return Err(LoadError::NotAnObject("special days file"));
    };

    Ok(map
        .into_iter()
        .filter_map(|(day, note)| match note {
            Value::String(note) => Some((day, note)),
            _ => None,
        })
        .collect())
}
