//! System screen: server location and core controller settings.

use mycontroller_types::{
    ALIVE_CHECK_SCALE, ControllerSettings, GroupKind, LocationSettings, PAGE_REFRESH_SCALE, Position,
    TypeOption,
};
use tracing::{debug, info};

use crate::controllers::{apply_read, options_or_empty};
use crate::error::SettingsError;
use crate::panel::{SaveOutcome, SettingsPanel};
use crate::services::Services;
use crate::session::SESSION_KEY;
use crate::traits::fetch_group;

/// Controller for the location and controller groups.
///
/// The alive-check interval and page refresh time are edited in minutes and
/// seconds through [`alive_check_minutes`](Self::alive_check_minutes) and
/// [`page_refresh_seconds`](Self::page_refresh_seconds); they are written
/// back in milliseconds on save.
#[derive(Debug)]
pub struct SystemSettingsController {
    services: Services,
    pub location: SettingsPanel<LocationSettings>,
    pub controller: SettingsPanel<ControllerSettings>,
    pub alive_check_minutes: Option<f64>,
    pub page_refresh_seconds: Option<f64>,
    pub languages: Vec<TypeOption>,
    pub log_levels: Vec<TypeOption>,
}

impl SystemSettingsController {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            location: SettingsPanel::new(),
            controller: SettingsPanel::new(),
            alive_check_minutes: None,
            page_refresh_seconds: None,
            languages: Vec::new(),
            log_levels: Vec::new(),
        }
    }

    /// Load both groups and the language and log level choices.
    pub async fn activate(&mut self) {
        let services = self.services.clone();
        let settings = services.settings.as_ref();
        let (location, controller, languages, log_levels) = futures::join!(
            fetch_group::<LocationSettings>(settings),
            fetch_group::<ControllerSettings>(settings),
            services.types.languages(),
            services.types.log_levels(),
        );

        apply_read(&mut self.location, location);
        if apply_read(&mut self.controller, controller) {
            self.update_display_units();
        }
        self.languages = options_or_empty("languages", languages);
        self.log_levels = options_or_empty("log levels", log_levels);
    }

    pub async fn load_location(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        apply_read(&mut self.location, result);
    }

    pub async fn load_controller(&mut self) {
        let result = fetch_group(self.services.settings.as_ref()).await;
        if apply_read(&mut self.controller, result) {
            self.update_display_units();
        }
    }

    fn update_display_units(&mut self) {
        if let Some(controller) = self.controller.data() {
            self.alive_check_minutes =
                Some(ALIVE_CHECK_SCALE.to_display(controller.alive_check_interval));
            self.page_refresh_seconds =
                Some(PAGE_REFRESH_SCALE.to_display(controller.global_page_refresh_time));
        }
    }

    /// Fill the location with the current position, rounded to four decimals.
    ///
    /// Puts the location group in edit mode. A provider failure, or a
    /// location that was never loaded, is reported and leaves the panel
    /// unchanged.
    pub async fn update_geolocation(&mut self) -> Option<Position> {
        if self.location.data().is_none() {
            self.services
                .report(&SettingsError::NotLoaded(GroupKind::Location));
            return None;
        }

        let position = match self.services.geolocator.current_position().await {
            Ok(position) => position.rounded(),
            Err(e) => {
                self.services.report(&e);
                return None;
            }
        };

        self.location.begin_edit();
        let location = self.location.data_mut()?;
        location.latitude = Some(position.latitude);
        location.longitude = Some(position.longitude);
        debug!(
            "Location set to {}, {}",
            position.latitude, position.longitude
        );
        Some(position)
    }

    /// Save the location and reload it from the server on success.
    pub async fn save_location(&mut self) -> SaveOutcome {
        let outcome = self.location.save(&self.services, |_| Ok(())).await;
        if outcome.is_saved() {
            self.load_location().await;
        }
        outcome
    }

    /// Save the controller group, then refresh the session configuration.
    pub async fn save_controller(&mut self) -> SaveOutcome {
        let minutes = self.alive_check_minutes;
        let seconds = self.page_refresh_seconds;
        let outcome = self
            .controller
            .save(&self.services, |controller| {
                if let Some(minutes) = minutes {
                    controller.alive_check_interval = ALIVE_CHECK_SCALE.to_stored(minutes)?;
                }
                if let Some(seconds) = seconds {
                    controller.global_page_refresh_time = PAGE_REFRESH_SCALE.to_stored(seconds)?;
                }
                Ok(())
            })
            .await;

        if outcome.is_saved() {
            self.refresh_session().await;
        }
        outcome
    }

    /// Re-fetch the global configuration, apply its language and persist the
    /// session snapshot.
    async fn refresh_session(&self) {
        let cfg = match self.services.config.config().await {
            Ok(cfg) => cfg,
            Err(e) => {
                self.services.report(&e);
                return;
            }
        };

        let language = cfg.language_id.clone();
        let snapshot = self.services.session.apply_config(cfg);
        self.services.translator.set_language(&language);
        info!("Session configuration refreshed, language {}", language);

        if let Err(e) = self.services.session_store.put(SESSION_KEY, &snapshot) {
            self.services.report(&e);
        }
    }
}
