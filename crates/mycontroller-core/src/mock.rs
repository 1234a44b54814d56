//! In-memory collaborators for testing.
//!
//! [`MockServer`] implements all four data-access traits against in-memory
//! state, so controllers can be driven without a running MyController
//! server. The presentation side is covered by [`RecordingAlerts`],
//! [`ScriptedDialog`] and [`FixedGeolocator`]; for the session store use
//! [`MemorySessionStore`](crate::session::MemorySessionStore).
//!
//! # Features
//!
//! - **Failure injection**: fail reads, writes, the config refresh or lookups
//! - **Transient failures**: fail the next N writes, then succeed
//! - **Latency simulation**: delay every write
//! - **Call counting**: every endpoint counts its calls

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mycontroller_types::{
    Firmware, GlobalConfig, GroupKind, Position, SettingsGroup, TypeOption,
};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::controllers::retention_dialog::{DialogOutcome, RetentionWarningDialog};
use crate::error::{Result, SettingsError};
use crate::traits::{
    AlertSink, ConfigService, DialogPresenter, FirmwareService, Geolocator, SettingsService,
    TypesService,
};

/// A mock MyController server.
///
/// # Example
///
/// ```
/// use mycontroller_core::MockServer;
/// use mycontroller_core::traits::fetch_group;
/// use mycontroller_types::MetricsSettings;
///
/// #[tokio::main]
/// async fn main() {
///     let server = MockServer::builder()
///         .group(&MetricsSettings { default_time_range: 3_600_000, ..Default::default() })
///         .build();
///     let metrics: MetricsSettings = fetch_group(&server).await.unwrap();
///     assert_eq!(metrics.default_time_range, 3_600_000);
/// }
/// ```
pub struct MockServer {
    groups: RwLock<HashMap<GroupKind, Value>>,
    config: RwLock<GlobalConfig>,
    firmwares: RwLock<HashMap<String, Firmware>>,
    languages: RwLock<Vec<TypeOption>>,
    log_levels: RwLock<Vec<TypeOption>>,
    firmware_options: RwLock<Vec<TypeOption>>,
    fetch_count: AtomicU32,
    store_count: AtomicU32,
    config_count: AtomicU32,
    firmware_count: AtomicU32,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_config: AtomicBool,
    fail_lookups: AtomicBool,
    fail_message: RwLock<String>,
    /// Simulated write latency in milliseconds (0 = no delay).
    store_latency_ms: AtomicU64,
    /// Writes still to fail before succeeding again.
    remaining_failures: AtomicU32,
}

impl std::fmt::Debug for MockServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockServer")
            .field("fetch_count", &self.fetch_count.load(Ordering::Relaxed))
            .field("store_count", &self.store_count.load(Ordering::Relaxed))
            .field("config_count", &self.config_count.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// An empty server: every group read fails with 404 until set.
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
            config: RwLock::new(GlobalConfig::default()),
            firmwares: RwLock::new(HashMap::new()),
            languages: RwLock::new(Vec::new()),
            log_levels: RwLock::new(Vec::new()),
            firmware_options: RwLock::new(Vec::new()),
            fetch_count: AtomicU32::new(0),
            store_count: AtomicU32::new(0),
            config_count: AtomicU32::new(0),
            firmware_count: AtomicU32::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_config: AtomicBool::new(false),
            fail_lookups: AtomicBool::new(false),
            fail_message: RwLock::new("Mock failure".to_string()),
            store_latency_ms: AtomicU64::new(0),
            remaining_failures: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder::new()
    }

    /// Replace the stored value of a group.
    pub async fn set_group<G: SettingsGroup>(&self, group: &G) {
        if let Ok(value) = serde_json::to_value(group) {
            self.groups.write().await.insert(G::KIND, value);
        }
    }

    /// Replace the raw JSON of a group.
    pub async fn set_raw(&self, kind: GroupKind, value: Value) {
        self.groups.write().await.insert(kind, value);
    }

    /// Current stored value of a group, decoded.
    pub async fn group<G: SettingsGroup>(&self) -> Option<G> {
        let groups = self.groups.read().await;
        groups
            .get(&G::KIND)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Current stored value of a group as raw JSON.
    pub async fn raw(&self, kind: GroupKind) -> Option<Value> {
        self.groups.read().await.get(&kind).cloned()
    }

    pub async fn set_config(&self, config: GlobalConfig) {
        *self.config.write().await = config;
    }

    pub async fn add_firmware(&self, ref_id: &str, firmware: Firmware) {
        self.firmwares
            .write()
            .await
            .insert(ref_id.to_string(), firmware);
    }

    /// Make every group read fail.
    pub async fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    /// Make every group write fail, with an optional message.
    pub async fn set_fail_writes(&self, fail: bool, message: Option<&str>) {
        self.fail_writes.store(fail, Ordering::Relaxed);
        if let Some(msg) = message {
            *self.fail_message.write().await = msg.to_string();
        }
    }

    pub fn set_fail_config(&self, fail: bool) {
        self.fail_config.store(fail, Ordering::Relaxed);
    }

    /// Make firmware and choice-list lookups fail.
    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::Relaxed);
    }

    /// Fail the next `count` writes, then succeed.
    pub fn set_transient_failures(&self, count: u32) {
        self.remaining_failures.store(count, Ordering::Relaxed);
    }

    pub fn remaining_failures(&self) -> u32 {
        self.remaining_failures.load(Ordering::Relaxed)
    }

    pub fn set_store_latency(&self, latency: Duration) {
        self.store_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    pub fn store_count(&self) -> u32 {
        self.store_count.load(Ordering::Relaxed)
    }

    pub fn config_count(&self) -> u32 {
        self.config_count.load(Ordering::Relaxed)
    }

    pub fn firmware_count(&self) -> u32 {
        self.firmware_count.load(Ordering::Relaxed)
    }

    async fn failure(&self) -> SettingsError {
        SettingsError::api(500, self.fail_message.read().await.clone())
    }

    async fn check_lookups(&self) -> Result<()> {
        if self.fail_lookups.load(Ordering::Relaxed) {
            return Err(self.failure().await);
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsService for MockServer {
    async fn fetch(&self, kind: GroupKind) -> Result<Value> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(self.failure().await);
        }
        self.groups
            .read()
            .await
            .get(&kind)
            .cloned()
            .ok_or_else(|| SettingsError::api(404, format!("No {} settings", kind)))
    }

    async fn store(&self, kind: GroupKind, value: Value) -> Result<()> {
        self.store_count.fetch_add(1, Ordering::Relaxed);

        let latency = self.store_latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(SettingsError::api(503, "Service unavailable"));
        }
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(self.failure().await);
        }

        self.groups.write().await.insert(kind, value);
        Ok(())
    }
}

#[async_trait]
impl ConfigService for MockServer {
    async fn config(&self) -> Result<GlobalConfig> {
        self.config_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_config.load(Ordering::Relaxed) {
            return Err(self.failure().await);
        }
        Ok(self.config.read().await.clone())
    }
}

#[async_trait]
impl FirmwareService for MockServer {
    async fn firmware(&self, ref_id: &str) -> Result<Firmware> {
        self.firmware_count.fetch_add(1, Ordering::Relaxed);
        self.check_lookups().await?;
        self.firmwares
            .read()
            .await
            .get(ref_id)
            .cloned()
            .ok_or_else(|| SettingsError::api(404, format!("No firmware {}", ref_id)))
    }
}

#[async_trait]
impl TypesService for MockServer {
    async fn languages(&self) -> Result<Vec<TypeOption>> {
        self.check_lookups().await?;
        Ok(self.languages.read().await.clone())
    }

    async fn log_levels(&self) -> Result<Vec<TypeOption>> {
        self.check_lookups().await?;
        Ok(self.log_levels.read().await.clone())
    }

    async fn firmwares(&self) -> Result<Vec<TypeOption>> {
        self.check_lookups().await?;
        Ok(self.firmware_options.read().await.clone())
    }
}

/// Builder for [`MockServer`].
#[derive(Debug, Default)]
pub struct MockServerBuilder {
    groups: HashMap<GroupKind, Value>,
    config: GlobalConfig,
    firmwares: HashMap<String, Firmware>,
    languages: Vec<TypeOption>,
    log_levels: Vec<TypeOption>,
    firmware_options: Vec<TypeOption>,
}

impl MockServerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a settings group.
    #[must_use]
    pub fn group<G: SettingsGroup>(mut self, group: &G) -> Self {
        if let Ok(value) = serde_json::to_value(group) {
            self.groups.insert(G::KIND, value);
        }
        self
    }

    /// Seed a settings group from raw JSON.
    #[must_use]
    pub fn raw(mut self, kind: GroupKind, value: Value) -> Self {
        self.groups.insert(kind, value);
        self
    }

    #[must_use]
    pub fn config(mut self, config: GlobalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn firmware(mut self, ref_id: &str, name: &str) -> Self {
        self.firmwares.insert(
            ref_id.to_string(),
            Firmware {
                firmware_name: Some(name.to_string()),
                ..Default::default()
            },
        );
        self
    }

    #[must_use]
    pub fn languages(mut self, options: Vec<TypeOption>) -> Self {
        self.languages = options;
        self
    }

    #[must_use]
    pub fn log_levels(mut self, options: Vec<TypeOption>) -> Self {
        self.log_levels = options;
        self
    }

    #[must_use]
    pub fn firmware_options(mut self, options: Vec<TypeOption>) -> Self {
        self.firmware_options = options;
        self
    }

    pub fn build(self) -> MockServer {
        let server = MockServer::new();
        // The locks are uncontended here
        if let Ok(mut groups) = server.groups.try_write() {
            *groups = self.groups;
        }
        if let Ok(mut config) = server.config.try_write() {
            *config = self.config;
        }
        if let Ok(mut firmwares) = server.firmwares.try_write() {
            *firmwares = self.firmwares;
        }
        if let Ok(mut languages) = server.languages.try_write() {
            *languages = self.languages;
        }
        if let Ok(mut log_levels) = server.log_levels.try_write() {
            *log_levels = self.log_levels;
        }
        if let Ok(mut options) = server.firmware_options.try_write() {
            *options = self.firmware_options;
        }
        server
    }
}

/// An alert captured by [`RecordingAlerts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Success(String),
    Error(String),
}

/// Alert sink that records every alert.
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.alerts()
            .into_iter()
            .filter_map(|alert| match alert {
                Alert::Success(msg) => Some(msg),
                Alert::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.alerts()
            .into_iter()
            .filter_map(|alert| match alert {
                Alert::Error(msg) => Some(msg),
                Alert::Success(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.alerts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn push(&self, alert: Alert) {
        self.alerts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(alert);
    }
}

impl AlertSink for RecordingAlerts {
    fn success(&self, message: &str) {
        self.push(Alert::Success(message.to_string()));
    }

    fn error(&self, error: &SettingsError) {
        self.push(Alert::Error(error.to_string()));
    }
}

/// Dialog presenter that answers every dialog with a fixed outcome.
#[derive(Debug)]
pub struct ScriptedDialog {
    outcome: DialogOutcome,
    opened: Mutex<Vec<RetentionWarningDialog>>,
}

impl ScriptedDialog {
    pub fn new(outcome: DialogOutcome) -> Self {
        Self {
            outcome,
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Every dialog presented so far.
    pub fn opened(&self) -> Vec<RetentionWarningDialog> {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl DialogPresenter for ScriptedDialog {
    async fn open(&self, dialog: &RetentionWarningDialog) -> DialogOutcome {
        self.opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(dialog.clone());
        match self.outcome {
            DialogOutcome::Confirmed => dialog.confirm(),
            DialogOutcome::Dismissed => dialog.cancel(),
        }
    }
}

/// Geolocator returning a fixed position, or failing when none is set.
#[derive(Debug, Default)]
pub struct FixedGeolocator {
    position: Option<Position>,
    calls: AtomicU32,
}

impl FixedGeolocator {
    pub fn new(position: Position) -> Self {
        Self {
            position: Some(position),
            calls: AtomicU32::new(0),
        }
    }

    /// A geolocator whose every request fails.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Position> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.position
            .ok_or_else(|| SettingsError::Geolocation("permission denied".to_string()))
    }
}
