//! MySensors defaults screen.

use mycontroller_types::{MySensorsSettings, TypeOption};
use tracing::{debug, warn};

use crate::controllers::{apply_read, options_or_empty};
use crate::panel::{SaveOutcome, SettingsPanel};
use crate::services::Services;
use crate::traits::fetch_group;

/// Controller for the MySensors group.
///
/// The group stores the default firmware as a reference id; the screen shows
/// the firmware's name, resolved after every load and save.
#[derive(Debug)]
pub struct MySensorsSettingsController {
    services: Services,
    pub mysensors: SettingsPanel<MySensorsSettings>,
    pub default_firmware_name: Option<String>,
    pub firmwares: Vec<TypeOption>,
}

impl MySensorsSettingsController {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            mysensors: SettingsPanel::new(),
            default_firmware_name: None,
            firmwares: Vec::new(),
        }
    }

    pub async fn activate(&mut self) {
        let services = self.services.clone();
        let (mysensors, firmwares) = futures::join!(
            fetch_group::<MySensorsSettings>(services.settings.as_ref()),
            services.types.firmwares(),
        );
        self.firmwares = options_or_empty("firmwares", firmwares);
        if apply_read(&mut self.mysensors, mysensors) {
            self.resolve_default_firmware().await;
        }
    }

    pub async fn load_mysensors(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        if apply_read(&mut self.mysensors, result) {
            self.resolve_default_firmware().await;
        }
    }

    /// Look up the name of the default firmware, if one is set.
    async fn resolve_default_firmware(&mut self) {
        let ref_id = self
            .mysensors
            .data()
            .and_then(|settings| settings.default_firmware.clone());
        let Some(ref_id) = ref_id else {
            self.default_firmware_name = None;
            return;
        };

        match self.services.firmware.firmware(&ref_id).await {
            Ok(firmware) => {
                debug!("Default firmware {} is {:?}", ref_id, firmware.firmware_name);
                self.default_firmware_name = firmware.firmware_name;
            }
            Err(e) => {
                warn!("Failed to resolve firmware {}: {}", ref_id, e);
                self.default_firmware_name = None;
            }
        }
    }

    pub async fn save_mysensors(&mut self) -> SaveOutcome {
        let outcome = self.mysensors.save(&self.services, |_| Ok(())).await;
        if outcome.is_saved() {
            self.resolve_default_firmware().await;
        }
        outcome
    }
}
