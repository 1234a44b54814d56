//! Units screen.

use mycontroller_types::UnitsSettings;

use crate::controllers::apply_read;
use crate::panel::{SaveOutcome, SettingsPanel};
use crate::services::Services;
use crate::traits::fetch_group;

/// Controller for the sensor variable units group.
#[derive(Debug)]
pub struct UnitsSettingsController {
    services: Services,
    pub units: SettingsPanel<UnitsSettings>,
}

impl UnitsSettingsController {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            units: SettingsPanel::new(),
        }
    }

    pub async fn activate(&mut self) {
        self.load_units().await;
    }

    pub async fn load_units(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        apply_read(&mut self.units, result);
    }

    pub async fn save_units(&mut self) -> SaveOutcome {
        self.units.save(&self.services, |_| Ok(())).await
    }
}
