//! Metrics screen: default time range and data retention.

use mycontroller_types::{MetricsRetention, MetricsSettings, RetentionForm};
use tracing::info;

use crate::controllers::apply_read;
use crate::controllers::retention_dialog::{DialogOutcome, DialogSize, RetentionWarningDialog};
use crate::panel::{SaveOutcome, SettingsPanel};
use crate::services::Services;
use crate::traits::fetch_group;

/// Controller for the metrics and metrics retention groups.
///
/// Retention windows are edited through [`retention_form`](Self::retention_form)
/// as `{value, unit}` pairs. Shortening a window purges data, so the
/// retention group only becomes editable after the user confirms
/// [`retention_warning`](Self::retention_warning).
#[derive(Debug)]
pub struct MetricsSettingsController {
    services: Services,
    pub metrics: SettingsPanel<MetricsSettings>,
    pub retention: SettingsPanel<MetricsRetention>,
    pub retention_form: Option<RetentionForm>,
}

impl MetricsSettingsController {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            metrics: SettingsPanel::new(),
            retention: SettingsPanel::new(),
            retention_form: None,
        }
    }

    pub async fn activate(&mut self) {
        let services = self.services.clone();
        let settings = services.settings.as_ref();
        let (metrics, retention) = futures::join!(
            fetch_group::<MetricsSettings>(settings),
            fetch_group::<MetricsRetention>(settings),
        );
        apply_read(&mut self.metrics, metrics);
        self.apply_retention(retention);
    }

    pub async fn load_metrics(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        apply_read(&mut self.metrics, result);
    }

    /// Load the retention windows. Unlike other reads, a failure here is
    /// reported to the user.
    pub async fn load_retention(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        self.apply_retention(result);
    }

    fn apply_retention(&mut self, result: crate::error::Result<MetricsRetention>) {
        match result {
            Ok(retention) => {
                self.retention_form = Some(RetentionForm::from_retention(&retention));
                self.retention.apply_loaded(retention);
            }
            Err(e) => self.services.report(&e),
        }
    }

    pub async fn save_metrics(&mut self) -> SaveOutcome {
        self.metrics.save(&self.services, |_| Ok(())).await
    }

    /// Write the edited windows back in milliseconds and save them.
    pub async fn save_retention(&mut self) -> SaveOutcome {
        let form = self.retention_form.clone();
        self.retention
            .save(&self.services, |retention| {
                if let Some(form) = &form {
                    form.apply_to(retention)?;
                }
                Ok(())
            })
            .await
    }

    /// Ask the user to confirm before retention becomes editable.
    ///
    /// Confirmation enables edit mode for the retention group; dismissal
    /// changes nothing.
    pub async fn retention_warning(&mut self, size: DialogSize) -> DialogOutcome {
        let dialog = RetentionWarningDialog::new(self.services.translator.as_ref(), size);
        let outcome = self.services.dialogs.open(&dialog).await;
        if outcome == DialogOutcome::Confirmed {
            info!("Retention editing unlocked");
            self.retention.begin_edit();
        }
        outcome
    }
}
