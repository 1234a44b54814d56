//! Settings screen controllers for MyController.
//!
//! This crate binds the settings screens of a MyController home-automation
//! server to its configuration endpoints. Every screen follows the same
//! edit/load/save cycle, implemented once by [`SettingsPanel`] and
//! instantiated by six controllers.
//!
//! # Features
//!
//! - **Typed settings groups**: one [`SettingsPanel`] per group instead of
//!   string-keyed flag maps
//! - **Concurrent loads**: independent groups load in parallel on activation
//! - **Overlap protection**: a second save of a group still in flight is
//!   rejected
//! - **Unit-scaled fields**: milliseconds on the wire, minutes and seconds on
//!   screen
//! - **Explicit session context**: the cached configuration is passed in,
//!   never global
//! - **HTTP client** (feature `http-client`): [`client::McClient`] speaks
//!   the server's REST API
//!
//! # Controllers
//!
//! | Controller | Groups |
//! |------------|--------|
//! | [`SystemSettingsController`] | location, controller |
//! | [`UnitsSettingsController`] | units |
//! | [`NotificationSettingsController`] | email, sms, pushbullet |
//! | [`MySensorsSettingsController`] | mySensors |
//! | [`MetricsSettingsController`] | metrics, metricsRetention |
//! | [`RetentionWarningDialog`] | confirmation before retention edits |
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use mycontroller_core::{MockServer, Services, SystemSettingsController};
//! use mycontroller_types::ControllerSettings;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = MockServer::builder()
//!         .group(&ControllerSettings {
//!             alive_check_interval: 300_000,
//!             global_page_refresh_time: 5_000,
//!             ..Default::default()
//!         })
//!         .build();
//!     let services = Services::builder(Arc::new(server)).build();
//!
//!     let mut system = SystemSettingsController::new(services);
//!     system.activate().await;
//!     assert_eq!(system.alive_check_minutes, Some(5.0));
//!
//!     system.controller.begin_edit();
//!     system.alive_check_minutes = Some(10.0);
//!     assert!(system.save_controller().await.is_saved());
//!     assert!(!system.controller.is_editing());
//! }
//! ```

#[cfg(feature = "http-client")]
pub mod client;
pub mod controllers;
pub mod error;
pub mod i18n;
pub mod mock;
pub mod panel;
pub mod services;
pub mod session;
pub mod traits;

pub use controllers::{
    DialogOutcome, DialogSize, MetricsSettingsController, MySensorsSettingsController,
    NotificationSettingsController, RetentionWarningDialog, SystemSettingsController,
    UnitsSettingsController,
};
pub use error::{Result, SettingsError};
pub use i18n::Catalog;
pub use mock::{Alert, FixedGeolocator, MockServer, MockServerBuilder, RecordingAlerts, ScriptedDialog};
pub use panel::{PanelState, SaveOutcome, SettingsPanel};
pub use services::{DismissDialogs, LogAlerts, NoGeolocation, Services, ServicesBuilder};
pub use session::{MemorySessionStore, SESSION_KEY, SessionContext, SessionHandle};
pub use traits::{
    AlertSink, ConfigService, DialogPresenter, FirmwareService, Geolocator, SessionStore,
    SettingsService, Translator, TypesService,
};

// Re-export the records so front ends need only one dependency
pub use mycontroller_types;
