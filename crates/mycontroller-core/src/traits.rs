//! Collaborator traits the settings controllers call into.
//!
//! Data access ([`SettingsService`], [`ConfigService`], [`FirmwareService`],
//! [`TypesService`]) is implemented by the HTTP client for a real server and
//! by [`crate::mock::MockServer`] for tests. The presentation collaborators
//! ([`Translator`], [`AlertSink`], [`SessionStore`], [`Geolocator`],
//! [`DialogPresenter`]) are implemented by each front end.

use async_trait::async_trait;
use mycontroller_types::{Firmware, GlobalConfig, GroupKind, Position, SettingsGroup, TypeOption};
use serde_json::Value;

use crate::controllers::retention_dialog::{DialogOutcome, RetentionWarningDialog};
use crate::error::{Result, SettingsError};
use crate::session::SessionContext;

/// Read and write access to the server's settings groups.
///
/// Groups travel as raw JSON so one implementation serves every group; use
/// [`fetch_group`] and [`store_group`] for typed access.
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Fetch the current value of a group.
    async fn fetch(&self, kind: GroupKind) -> Result<Value>;

    /// Replace a group with `value`.
    async fn store(&self, kind: GroupKind, value: Value) -> Result<()>;
}

/// Fetch a group and decode it into its record type.
pub async fn fetch_group<G: SettingsGroup>(service: &dyn SettingsService) -> Result<G> {
    let value = service.fetch(G::KIND).await?;
    Ok(serde_json::from_value(value)?)
}

/// Encode a record and submit it as its group.
pub async fn store_group<G: SettingsGroup>(service: &dyn SettingsService, group: &G) -> Result<()> {
    let value = serde_json::to_value(group)?;
    service.store(G::KIND, value).await
}

/// Access to the server's global configuration.
#[async_trait]
pub trait ConfigService: Send + Sync {
    async fn config(&self) -> Result<GlobalConfig>;
}

/// Firmware lookup by reference id.
#[async_trait]
pub trait FirmwareService: Send + Sync {
    async fn firmware(&self, ref_id: &str) -> Result<Firmware>;
}

/// Server-provided choice lists.
#[async_trait]
pub trait TypesService: Send + Sync {
    async fn languages(&self) -> Result<Vec<TypeOption>>;
    async fn log_levels(&self) -> Result<Vec<TypeOption>>;
    async fn firmwares(&self) -> Result<Vec<TypeOption>>;
}

/// Localization resolver.
pub trait Translator: Send + Sync {
    /// Resolve `key` in the active language, substituting `{{name}}`
    /// placeholders from `params`.
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;

    /// Switch the active language.
    fn set_language(&self, language: &str);
}

/// User-facing notification sink.
pub trait AlertSink: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, error: &SettingsError);
}

/// Client-side persistence for the session snapshot.
pub trait SessionStore: Send + Sync {
    fn put(&self, key: &str, session: &SessionContext) -> Result<()>;
}

/// Source of the user's current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Position>;
}

/// Presents modal confirmation dialogs.
#[async_trait]
pub trait DialogPresenter: Send + Sync {
    /// Show the dialog and wait until the user confirms or dismisses it.
    async fn open(&self, dialog: &RetentionWarningDialog) -> DialogOutcome;
}
