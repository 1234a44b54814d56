//! One controller per settings screen.
//!
//! Each controller owns a [`SettingsPanel`](crate::panel::SettingsPanel) per
//! settings group it shows, plus whatever display-only state the screen needs
//! (unit-scaled fields, choice lists, resolved names). `activate` performs the
//! initial loads concurrently; the `save_*` methods run the shared save flow
//! and any group-specific follow-up.

pub mod metrics;
pub mod mysensors;
pub mod notifications;
pub mod retention_dialog;
pub mod system;
pub mod units;

pub use metrics::MetricsSettingsController;
pub use mysensors::MySensorsSettingsController;
pub use notifications::NotificationSettingsController;
pub use retention_dialog::{DialogOutcome, DialogSize, RetentionWarningDialog};
pub use system::SystemSettingsController;
pub use units::UnitsSettingsController;

use mycontroller_types::{SettingsGroup, TypeOption};
use tracing::warn;

use crate::error::Result;
use crate::panel::SettingsPanel;

/// Install a loaded group, or log the failed read and keep the old copy.
pub(crate) fn apply_read<G: SettingsGroup>(panel: &mut SettingsPanel<G>, result: Result<G>) -> bool {
    match result {
        Ok(data) => {
            panel.apply_loaded(data);
            true
        }
        Err(e) => {
            warn!("Failed to load {} settings: {}", G::KIND, e);
            false
        }
    }
}

/// Unwrap a choice list, or log the failure and fall back to no choices.
pub(crate) fn options_or_empty(what: &str, result: Result<Vec<TypeOption>>) -> Vec<TypeOption> {
    result.unwrap_or_else(|e| {
        warn!("Failed to load {}: {}", what, e);
        Vec::new()
    })
}
