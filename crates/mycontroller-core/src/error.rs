//! Error type for settings operations.
//!
//! Every failure a settings screen can hit is a [`SettingsError`]. The
//! controllers never treat one as fatal: they log it, hand it to the
//! [`AlertSink`](crate::traits::AlertSink) and reset the in-progress flag so
//! the user can retry.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | [`SettingsError::Unreachable`] | transport failures in the HTTP client |
//! | [`SettingsError::Api`] | non-2xx responses from the server |
//! | [`SettingsError::Decode`] | response bodies that do not match the record |
//! | [`SettingsError::NotLoaded`] | saving a group that was never loaded |
//! | [`SettingsError::SaveInProgress`] | saving a group while its previous save is outstanding |
//! | [`SettingsError::Conversion`] | display values that cannot be stored |
//! | [`SettingsError::Geolocation`] | the position provider failing |
//! | [`SettingsError::Session`] | persisting the session snapshot failing |

use mycontroller_types::{ConversionError, GroupKind};
use thiserror::Error;

/// Boxed source error from a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while loading or saving settings.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// The server could not be reached.
    #[error("Server not reachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The server answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response body could not be decoded, or a record could not be
    /// encoded.
    #[error("Invalid settings payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured server URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A save was requested before the group was loaded.
    #[error("{0} settings have not been loaded")]
    NotLoaded(GroupKind),

    /// A save was requested while the previous save of the group is
    /// outstanding.
    #[error("A save of {0} settings is already in progress")]
    SaveInProgress(GroupKind),

    /// A display value could not be converted to its stored form.
    #[error("Invalid value: {0}")]
    Conversion(#[from] ConversionError),

    /// The current position could not be determined.
    #[error("Geolocation unavailable: {0}")]
    Geolocation(String),

    /// The session snapshot could not be persisted.
    #[error("Session store error: {0}")]
    Session(String),
}

impl SettingsError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an unreachable-server error from any transport error.
    pub fn unreachable(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Unreachable {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Whether retrying the same request could succeed without user changes.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable { .. } | Self::SaveInProgress(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias using mycontroller-core's SettingsError type.
pub type Result<T> = std::result::Result<T, SettingsError>;
