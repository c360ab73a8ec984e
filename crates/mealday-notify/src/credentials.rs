//! API credentials for the X (Twitter) account.

use mealday_shared::{LoadError, NotifyError};
use serde::{Deserialize, Serialize};

/// Key pairs as stored in `credentials.json`.
///
/// Missing keys default to empty strings; [`Credentials::require_oauth`]
/// checks that the ones needed for signing are present.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    #[serde(rename = "API_KEY")]
    pub api_key: String,
    #[serde(rename = "API_KEY_SECRET")]
    pub api_key_secret: String,
    #[serde(rename = "BEARER_TOKEN")]
    pub bearer_token: String,
    #[serde(rename = "ACCESS_TOKEN")]
    pub access_token: String,
    #[serde(rename = "ACCESS_TOKEN_SECRET")]
    pub access_token_secret: String,
}

/// Environment variables overriding the file, in field order.
const ENV_OVERRIDES: [&str; 5] = [
    "MEALDAY_API_KEY",
    "MEALDAY_API_KEY_SECRET",
    "MEALDAY_BEARER_TOKEN",
    "MEALDAY_ACCESS_TOKEN",
    "MEALDAY_ACCESS_TOKEN_SECRET",
];

impl Credentials {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(LoadError::NotAnObject("credentials file"));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Override fields from `MEALDAY_API_KEY` and friends.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override every field for which `lookup` yields a non-empty value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields = [
            &mut self.api_key,
            &mut self.api_key_secret,
            &mut self.bearer_token,
            &mut self.access_token,
            &mut self.access_token_secret,
        ];
        for (field, name) in fields.into_iter().zip(ENV_OVERRIDES) {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                tracing::debug!(var = name, "credential overridden from environment");
                *field = value;
            }
        }
    }

    /// Fail with the first missing user-context OAuth 1.0a key.
    pub fn require_oauth(&self) -> Result<(), NotifyError> {
        let required = [
            ("API_KEY", &self.api_key),
            ("API_KEY_SECRET", &self.api_key_secret),
            ("ACCESS_TOKEN", &self.access_token),
            ("ACCESS_TOKEN_SECRET", &self.access_token_secret),
        ];
        match required.into_iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(NotifyError::MissingCredential(name)),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(value: &str) -> &'static str {
            if value.is_empty() {
                "<empty>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_key_secret", &mask(&self.api_key_secret))
            .field("bearer_token", &mask(&self.bearer_token))
            .field("access_token", &mask(&self.access_token))
            .field("access_token_secret", &mask(&self.access_token_secret))
            .finish()
    }
}
