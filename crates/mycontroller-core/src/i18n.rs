//! Translation catalog.
//!
//! [`Catalog`] is a small in-memory [`Translator`]: one key table per
//! language, `{{name}}` interpolation and a fallback language. It ships the
//! English strings for the keys the settings controllers use.

use std::collections::HashMap;
use std::sync::RwLock;

use mycontroller_types::DEFAULT_LANGUAGE;

use crate::traits::Translator;

/// Success message after any settings save.
pub const UPDATED_SUCCESSFULLY: &str = "UPDATED_SUCCESSFULLY";
/// Header of the retention confirmation dialog.
pub const RETENTION_DIALOG_TITLE: &str = "RETENTION_DIALOG_TITLE";
/// Body of the retention confirmation dialog.
pub const RETENTION_DIALOG_CONFIRMATION_MSG: &str = "RETENTION_DIALOG_CONFIRMATION_MSG";

const ENGLISH: &[(&str, &str)] = &[
    (UPDATED_SUCCESSFULLY, "Updated successfully"),
    (RETENTION_DIALOG_TITLE, "Change metrics retention"),
    (
        RETENTION_DIALOG_CONFIRMATION_MSG,
        "Reducing a retention window permanently purges older metric data. Do you want to continue?",
    ),
];

/// In-memory translation tables.
#[derive(Debug)]
pub struct Catalog {
    tables: HashMap<String, HashMap<String, String>>,
    active: RwLock<String>,
    fallback: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::english()
    }
}

impl Catalog {
    /// Catalog with only the built-in English table, active and fallback.
    #[must_use]
    pub fn english() -> Self {
        let table = ENGLISH
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut tables = HashMap::new();
        tables.insert(DEFAULT_LANGUAGE.to_string(), table);
        Self {
            tables,
            active: RwLock::new(DEFAULT_LANGUAGE.to_string()),
            fallback: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Add or extend the table for `language`.
    #[must_use]
    pub fn with_language<I, K, V>(mut self, language: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tables
            .entry(language.to_string())
            .or_default()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Currently active language id.
    #[must_use]
    pub fn language(&self) -> String {
        self.active
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.tables
            .get(language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}

fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{{{}}}}}", name), value);
    }
    out
}

impl Translator for Catalog {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        let active = self.language();
        let template = self
            .lookup(&active, key)
            .or_else(|| self.lookup(&self.fallback, key))
            .unwrap_or(key);
        interpolate(template, params)
    }

    fn set_language(&self, language: &str) {
        if !self.tables.contains_key(language) {
            tracing::debug!("No translations for '{}', falling back to {}", language, self.fallback);
        }
        *self
            .active
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = language.to_string();
    }
}
