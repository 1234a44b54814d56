//! Notifications screen: email, SMS and Pushbullet.

use mycontroller_types::{EmailSettings, PushbulletSettings, SmsSettings};

use crate::controllers::apply_read;
use crate::panel::{SaveOutcome, SettingsPanel};
use crate::services::Services;
use crate::traits::fetch_group;

/// Controller for the three notification channel groups.
#[derive(Debug)]
pub struct NotificationSettingsController {
    services: Services,
    pub email: SettingsPanel<EmailSettings>,
    pub sms: SettingsPanel<SmsSettings>,
    pub pushbullet: SettingsPanel<PushbulletSettings>,
}

impl NotificationSettingsController {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            email: SettingsPanel::new(),
            sms: SettingsPanel::new(),
            pushbullet: SettingsPanel::new(),
        }
    }

    pub async fn activate(&mut self) {
        let services = self.services.clone();
        let settings = services.settings.as_ref();
        let (email, sms, pushbullet) = futures::join!(
            fetch_group::<EmailSettings>(settings),
            fetch_group::<SmsSettings>(settings),
            fetch_group::<PushbulletSettings>(settings),
        );
        apply_read(&mut self.email, email);
        apply_read(&mut self.sms, sms);
        apply_read(&mut self.pushbullet, pushbullet);
    }

    pub async fn load_email(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        apply_read(&mut self.email, result);
    }

    pub async fn load_sms(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        apply_read(&mut self.sms, result);
    }

    pub async fn load_pushbullet(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        apply_read(&mut self.pushbullet, result);
    }

    pub async fn save_email(&mut self) -> SaveOutcome {
        self.email.save(&self.services, |_| Ok(())).await
    }

    pub async fn save_sms(&mut self) -> SaveOutcome {
        self.sms.save(&self.services, |_| Ok(())).await
    }

    /// Save the Pushbullet group and reload it, picking up the account
    /// details the server resolves from the access token.
    pub async fn save_pushbullet(&mut self) -> SaveOutcome {
        let outcome = self.pushbullet.save(&self.services, |_| Ok(())).await;
        if outcome.is_saved() {
            self.load_pushbullet().await;
        }
        outcome
    }
}
