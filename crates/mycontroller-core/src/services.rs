//! The collaborator bundle injected into every controller.

use std::sync::Arc;

use async_trait::async_trait;
use mycontroller_types::Position;
use tracing::{info, warn};

use crate::controllers::retention_dialog::{DialogOutcome, RetentionWarningDialog};
use crate::error::{Result, SettingsError};
use crate::i18n::{Catalog, UPDATED_SUCCESSFULLY};
use crate::session::{MemorySessionStore, SessionHandle};
use crate::traits::{
    AlertSink, ConfigService, DialogPresenter, FirmwareService, Geolocator, SessionStore,
    SettingsService, Translator, TypesService,
};

/// Everything a settings controller talks to.
///
/// Cloning is cheap; every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub settings: Arc<dyn SettingsService>,
    pub config: Arc<dyn ConfigService>,
    pub firmware: Arc<dyn FirmwareService>,
    pub types: Arc<dyn TypesService>,
    pub translator: Arc<dyn Translator>,
    pub alerts: Arc<dyn AlertSink>,
    pub session_store: Arc<dyn SessionStore>,
    pub geolocator: Arc<dyn Geolocator>,
    pub dialogs: Arc<dyn DialogPresenter>,
    pub session: SessionHandle,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Services {
    /// Start building a bundle around one server API implementation.
    ///
    /// The presentation collaborators default to headless implementations:
    /// English [`Catalog`], alerts written to the log, an in-memory session
    /// store, no geolocation and dialogs that are always dismissed.
    pub fn builder<A>(api: Arc<A>) -> ServicesBuilder
    where
        A: SettingsService + ConfigService + FirmwareService + TypesService + 'static,
    {
        ServicesBuilder {
            services: Services {
                settings: api.clone(),
                config: api.clone(),
                firmware: api.clone(),
                types: api,
                translator: Arc::new(Catalog::english()),
                alerts: Arc::new(LogAlerts),
                session_store: Arc::new(MemorySessionStore::new()),
                geolocator: Arc::new(NoGeolocation),
                dialogs: Arc::new(DismissDialogs),
                session: SessionHandle::default(),
            },
        }
    }

    /// Show the translated "updated successfully" alert.
    pub fn notify_updated(&self) {
        let message = self.translator.translate(UPDATED_SUCCESSFULLY, &[]);
        self.alerts.success(&message);
    }

    /// Log a failure and hand it to the alert sink.
    pub fn report(&self, error: &SettingsError) {
        warn!("Settings operation failed: {}", error);
        self.alerts.error(error);
    }
}

/// Builder for [`Services`].
#[must_use]
pub struct ServicesBuilder {
    services: Services,
}

impl ServicesBuilder {
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.services.translator = translator;
        self
    }

    pub fn alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.services.alerts = alerts;
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.services.session_store = store;
        self
    }

    pub fn geolocator(mut self, geolocator: Arc<dyn Geolocator>) -> Self {
        self.services.geolocator = geolocator;
        self
    }

    pub fn dialogs(mut self, dialogs: Arc<dyn DialogPresenter>) -> Self {
        self.services.dialogs = dialogs;
        self
    }

    pub fn session(mut self, session: SessionHandle) -> Self {
        self.services.session = session;
        self
    }

    pub fn build(self) -> Services {
        self.services
    }
}

/// Alert sink that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlerts;

impl AlertSink for LogAlerts {
    fn success(&self, message: &str) {
        info!("{}", message);
    }

    fn error(&self, error: &SettingsError) {
        tracing::error!("{}", error);
    }
}

/// Geolocator for front ends without a position source.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn current_position(&self) -> Result<Position> {
        Err(SettingsError::Geolocation(
            "no position provider configured".to_string(),
        ))
    }
}

/// Dialog presenter for non-interactive front ends; every dialog is dismissed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DismissDialogs;

#[async_trait]
impl DialogPresenter for DismissDialogs {
    async fn open(&self, _dialog: &RetentionWarningDialog) -> DialogOutcome {
        DialogOutcome::Dismissed
    }
}
