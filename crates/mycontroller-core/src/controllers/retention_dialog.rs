//! Confirmation dialog shown before retention windows become editable.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::i18n::{RETENTION_DIALOG_CONFIRMATION_MSG, RETENTION_DIALOG_TITLE};
use crate::traits::Translator;

/// Requested dialog width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl fmt::Display for DialogSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogSize::Small => write!(f, "sm"),
            DialogSize::Medium => write!(f, "md"),
            DialogSize::Large => write!(f, "lg"),
        }
    }
}

/// How the user closed a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed,
    Dismissed,
}

/// View-state of the retention warning dialog.
///
/// Header and message are resolved once, in the language active when the
/// dialog is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionWarningDialog {
    header: String,
    message: String,
    size: DialogSize,
}

impl RetentionWarningDialog {
    pub fn new(translator: &dyn Translator, size: DialogSize) -> Self {
        Self {
            header: translator.translate(RETENTION_DIALOG_TITLE, &[]),
            message: translator.translate(RETENTION_DIALOG_CONFIRMATION_MSG, &[]),
            size,
        }
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn size(&self) -> DialogSize {
        self.size
    }

    /// The user chose to continue.
    #[must_use]
    pub fn confirm(&self) -> DialogOutcome {
        DialogOutcome::Confirmed
    }

    /// The user backed out.
    #[must_use]
    pub fn cancel(&self) -> DialogOutcome {
        DialogOutcome::Dismissed
    }
}
