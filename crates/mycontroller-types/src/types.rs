//! Lookup records used alongside the settings groups.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::settings::ExtraFields;

/// Language used when the server does not report one.
pub const DEFAULT_LANGUAGE: &str = "en_us";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Global configuration snapshot served by the status endpoint.
///
/// Front ends cache this for the whole session (active language, date and
/// time formats).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    #[serde(default = "default_language")]
    pub language_id: String,
    #[serde(default)]
    pub date_format: Option<String>,
    #[serde(default)]
    pub time_format: Option<String>,
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            language_id: default_language(),
            date_format: None,
            time_format: None,
            app_version: None,
            extra: ExtraFields::new(),
        }
    }
}

/// A firmware image known to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firmware {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub firmware_name: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// An entry of a server-provided choice list (languages, log levels,
/// firmwares).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOption {
    /// Identifier submitted back to the server; a string or a number
    /// depending on the list.
    pub id: Value,
    pub display_name: String,
}

impl TypeOption {
    /// Create an option with a string id.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Value::String(id.into()),
            display_name: display_name.into(),
        }
    }

    /// The id rendered as text, without JSON quoting.
    #[must_use]
    pub fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The same position rounded to four decimal places (about 11 m).
    #[must_use]
    pub fn rounded(&self) -> Self {
        fn round4(value: f64) -> f64 {
            (value * 10_000.0).round() / 10_000.0
        }
        Self::new(round4(self.latitude), round4(self.longitude))
    }
}
