//! Integration tests driving the settings controllers against the mock server.

use std::sync::Arc;

use mycontroller_core::i18n::UPDATED_SUCCESSFULLY;
use mycontroller_core::{
    Catalog, DialogOutcome, DialogSize, FixedGeolocator, MemorySessionStore,
    MetricsSettingsController, MockServer, MySensorsSettingsController,
    NotificationSettingsController, PanelState, RecordingAlerts, SESSION_KEY, SaveOutcome,
    ScriptedDialog, Services, SystemSettingsController, UnitsSettingsController,
};
use mycontroller_types::{
    ControllerSettings, EmailSettings, GlobalConfig, GroupKind, LocationSettings,
    MetricsRetention, MetricsSettings, MySensorsSettings, Position, PushbulletSettings,
    RetentionDuration, RetentionWindow, SmsSettings, TimeUnit, TypeOption, UnitVariable,
    UnitsSettings,
};
use serde_json::json;

const DAY_MS: u64 = 86_400_000;

struct Harness {
    server: Arc<MockServer>,
    alerts: Arc<RecordingAlerts>,
    store: Arc<MemorySessionStore>,
    catalog: Arc<Catalog>,
    services: Services,
}

fn harness(server: MockServer) -> Harness {
    harness_with(server, |builder| builder)
}

fn harness_with(
    server: MockServer,
    configure: impl FnOnce(mycontroller_core::ServicesBuilder) -> mycontroller_core::ServicesBuilder,
) -> Harness {
    let server = Arc::new(server);
    let alerts = Arc::new(RecordingAlerts::new());
    let store = Arc::new(MemorySessionStore::new());
    let catalog = Arc::new(
        Catalog::english().with_language("de_de", [(UPDATED_SUCCESSFULLY, "Erfolgreich aktualisiert")]),
    );
    let builder = Services::builder(server.clone())
        .alerts(alerts.clone())
        .session_store(store.clone())
        .translator(catalog.clone());
    let services = configure(builder).build();
    Harness {
        server,
        alerts,
        store,
        catalog,
        services,
    }
}

fn retention() -> MetricsRetention {
    MetricsRetention {
        retention_raw_data: DAY_MS,
        retention_one_minute: 7 * DAY_MS,
        retention_five_minutes: 14 * DAY_MS,
        retention_one_hour: 30 * DAY_MS,
        retention_six_hours: 90 * DAY_MS,
        retention_twelve_hours: 180 * DAY_MS,
        retention_one_day: 365 * DAY_MS,
        ..Default::default()
    }
}

fn full_server() -> MockServer {
    MockServer::builder()
        .group(&LocationSettings {
            latitude: Some(12.9716),
            longitude: Some(77.5946),
            ..Default::default()
        })
        .group(&ControllerSettings {
            alive_check_interval: 300_000,
            global_page_refresh_time: 5_000,
            language: Some("en_us".to_string()),
            ..Default::default()
        })
        .group(&UnitsSettings {
            variables: vec![UnitVariable {
                variable: "V_TEMP".to_string(),
                unit: "°C".to_string(),
            }],
            ..Default::default()
        })
        .group(&EmailSettings {
            smtp_host: Some("smtp.example.org".to_string()),
            smtp_port: Some(465),
            enable_ssl: true,
            ..Default::default()
        })
        .group(&SmsSettings::default())
        .group(&PushbulletSettings::default())
        .group(&MySensorsSettings {
            default_firmware: Some("F1".to_string()),
            ..Default::default()
        })
        .group(&MetricsSettings {
            default_time_range: 3_600_000,
            ..Default::default()
        })
        .group(&retention())
        .firmware("F1", "Blink 1.0")
        .languages(vec![
            TypeOption::new("en_us", "English"),
            TypeOption::new("de_de", "Deutsch"),
        ])
        .log_levels(vec![TypeOption::new("info", "Info")])
        .firmware_options(vec![TypeOption::new("F1", "Blink 1.0")])
        .build()
}

// ==========================================================================
// Edit / save cycle, every group
// ==========================================================================

#[tokio::test]
async fn test_edit_then_save_clears_flags_for_every_group() {
    let h = harness(full_server());

    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;
    system.location.begin_edit();
    assert_eq!(system.save_location().await, SaveOutcome::Saved);
    assert_eq!(system.location.state(), PanelState::Viewing);
    system.controller.begin_edit();
    assert_eq!(system.save_controller().await, SaveOutcome::Saved);
    assert_eq!(system.controller.state(), PanelState::Viewing);

    let mut units = UnitsSettingsController::new(h.services.clone());
    units.activate().await;
    units.units.begin_edit();
    assert!(units.save_units().await.is_saved());
    assert!(!units.units.is_editing() && !units.units.is_saving());

    let mut notifications = NotificationSettingsController::new(h.services.clone());
    notifications.activate().await;
    notifications.email.begin_edit();
    notifications.sms.begin_edit();
    notifications.pushbullet.begin_edit();
    assert!(notifications.save_email().await.is_saved());
    assert!(notifications.save_sms().await.is_saved());
    assert!(notifications.save_pushbullet().await.is_saved());
    for state in [
        notifications.email.state(),
        notifications.sms.state(),
        notifications.pushbullet.state(),
    ] {
        assert_eq!(state, PanelState::Viewing);
    }

    let mut mysensors = MySensorsSettingsController::new(h.services.clone());
    mysensors.activate().await;
    mysensors.mysensors.begin_edit();
    assert!(mysensors.save_mysensors().await.is_saved());
    assert_eq!(mysensors.mysensors.state(), PanelState::Viewing);

    let mut metrics = MetricsSettingsController::new(h.services.clone());
    metrics.activate().await;
    metrics.metrics.begin_edit();
    metrics.retention.begin_edit();
    assert!(metrics.save_metrics().await.is_saved());
    assert!(metrics.save_retention().await.is_saved());
    assert_eq!(metrics.metrics.state(), PanelState::Viewing);
    assert_eq!(metrics.retention.state(), PanelState::Viewing);

    assert_eq!(h.alerts.errors(), Vec::<String>::new());
    assert_eq!(h.alerts.successes().len(), 9);
    assert_eq!(h.server.store_count(), 9);
}

#[tokio::test]
async fn test_save_failure_keeps_edit_mode() {
    let h = harness(full_server());
    let mut units = UnitsSettingsController::new(h.services.clone());
    units.activate().await;

    units.units.begin_edit();
    units
        .units
        .data_mut()
        .unwrap()
        .set_unit("V_TEMP", "°F");
    h.server.set_fail_writes(true, Some("database locked")).await;

    assert_eq!(units.save_units().await, SaveOutcome::Failed);
    assert!(units.units.is_editing());
    assert!(!units.units.is_saving());
    assert_eq!(units.units.state(), PanelState::Editing);
    // Local edits survive for a retry
    assert_eq!(units.units.data().unwrap().unit_for("V_TEMP"), Some("°F"));

    let errors = h.alerts.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("database locked"));
    assert!(h.alerts.successes().is_empty());

    h.server.set_fail_writes(false, None).await;
    assert!(units.save_units().await.is_saved());
    let stored: UnitsSettings = h.server.group().await.unwrap();
    assert_eq!(stored.unit_for("V_TEMP"), Some("°F"));
}

#[tokio::test]
async fn test_transient_failure_then_retry() {
    let h = harness(full_server());
    let mut metrics = MetricsSettingsController::new(h.services.clone());
    metrics.activate().await;
    h.server.set_transient_failures(1);

    assert_eq!(metrics.save_metrics().await, SaveOutcome::Failed);
    assert_eq!(metrics.save_metrics().await, SaveOutcome::Saved);
    assert_eq!(h.alerts.errors().len(), 1);
    assert_eq!(h.alerts.successes().len(), 1);
}

#[tokio::test]
async fn test_overlapping_save_is_rejected() {
    let h = harness(full_server());
    let mut units = UnitsSettingsController::new(h.services.clone());
    units.activate().await;

    // First save handed off, response still outstanding
    let _payload = units.units.begin_save().unwrap();

    assert_eq!(units.save_units().await, SaveOutcome::Rejected);
    assert_eq!(h.server.store_count(), 0);
    assert!(units.units.is_saving());

    let errors = h.alerts.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("already in progress"));

    units.units.finish_save(&Ok(()));
    assert!(units.save_units().await.is_saved());
}

#[tokio::test]
async fn test_save_before_load_is_reported() {
    let h = harness(MockServer::new());
    let mut units = UnitsSettingsController::new(h.services.clone());

    assert_eq!(units.save_units().await, SaveOutcome::Failed);
    assert_eq!(h.server.store_count(), 0);
    assert_eq!(h.alerts.errors().len(), 1);
}

#[tokio::test]
async fn test_unknown_fields_survive_save() {
    let server = MockServer::builder()
        .raw(
            GroupKind::Location,
            json!({"latitude": 1.5, "longitude": 2.5, "sunriseTime": 1_465_000_000_000u64}),
        )
        .build();
    let h = harness(server);
    let mut system = SystemSettingsController::new(h.services.clone());
    system.load_location().await;

    system.location.begin_edit();
    system.location.data_mut().unwrap().latitude = Some(3.0);
    assert!(system.save_location().await.is_saved());

    let raw = h.server.raw(GroupKind::Location).await.unwrap();
    assert_eq!(raw["latitude"], json!(3.0));
    assert_eq!(raw["sunriseTime"], json!(1_465_000_000_000u64));
}

// ==========================================================================
// System: unit conversion and session refresh
// ==========================================================================

#[tokio::test]
async fn test_controller_units_round_trip() {
    let h = harness(full_server());
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;

    assert_eq!(system.alive_check_minutes, Some(5.0));
    assert_eq!(system.page_refresh_seconds, Some(5.0));

    system.controller.begin_edit();
    assert!(system.save_controller().await.is_saved());
    let stored: ControllerSettings = h.server.group().await.unwrap();
    assert_eq!(stored.alive_check_interval, 300_000);
    assert_eq!(stored.global_page_refresh_time, 5_000);

    system.controller.begin_edit();
    system.alive_check_minutes = Some(1.5);
    system.page_refresh_seconds = Some(30.0);
    assert!(system.save_controller().await.is_saved());
    let stored: ControllerSettings = h.server.group().await.unwrap();
    assert_eq!(stored.alive_check_interval, 90_000);
    assert_eq!(stored.global_page_refresh_time, 30_000);
}

#[tokio::test]
async fn test_negative_display_value_is_reported() {
    let h = harness(full_server());
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;

    system.controller.begin_edit();
    system.alive_check_minutes = Some(-1.0);
    assert_eq!(system.save_controller().await, SaveOutcome::Failed);
    assert_eq!(h.server.store_count(), 0);
    assert_eq!(h.server.config_count(), 0);
    assert!(system.controller.is_editing());
    assert_eq!(h.alerts.errors().len(), 1);
}

#[tokio::test]
async fn test_controller_save_refreshes_session_once() {
    let h = harness(full_server());
    h.server
        .set_config(GlobalConfig {
            language_id: "de_de".to_string(),
            ..Default::default()
        })
        .await;
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;

    system.controller.begin_edit();
    assert!(system.save_controller().await.is_saved());

    assert_eq!(h.server.config_count(), 1);
    assert_eq!(h.store.writes(), 1);
    let persisted = h.store.get(SESSION_KEY).unwrap();
    assert_eq!(persisted.language(), Some("de_de"));
    assert_eq!(h.services.session.snapshot().language(), Some("de_de"));
    assert_eq!(h.catalog.language(), "de_de");
}

#[tokio::test]
async fn test_controller_save_failure_skips_session_refresh() {
    let h = harness(full_server());
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;
    h.server.set_fail_writes(true, None).await;

    system.controller.begin_edit();
    assert_eq!(system.save_controller().await, SaveOutcome::Failed);

    assert_eq!(h.server.config_count(), 0);
    assert_eq!(h.store.writes(), 0);
    assert_eq!(h.services.session.snapshot().cfg, None);
    assert_eq!(h.catalog.language(), "en_us");
}

#[tokio::test]
async fn test_config_refresh_failure_is_reported() {
    let h = harness(full_server());
    h.server.set_fail_config(true);
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;

    system.controller.begin_edit();
    assert!(system.save_controller().await.is_saved());
    assert_eq!(h.server.config_count(), 1);
    assert_eq!(h.store.writes(), 0);
    assert_eq!(h.alerts.successes().len(), 1);
    assert_eq!(h.alerts.errors().len(), 1);
}

#[tokio::test]
async fn test_location_save_reloads() {
    let h = harness(full_server());
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;
    let fetches = h.server.fetch_count();

    system.location.begin_edit();
    assert!(system.save_location().await.is_saved());
    assert_eq!(h.server.fetch_count(), fetches + 1);
}

#[tokio::test]
async fn test_system_lookups() {
    let h = harness(full_server());
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;
    assert_eq!(system.languages.len(), 2);
    assert_eq!(system.log_levels[0].display_name, "Info");

    h.server.set_fail_lookups(true);
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;
    assert!(system.languages.is_empty());
    assert!(system.log_levels.is_empty());
    // Lookup failures are not user-facing
    assert!(h.alerts.errors().is_empty());
    assert!(system.controller.data().is_some());
}

#[tokio::test]
async fn test_success_alert_is_translated() {
    let h = harness(full_server());
    h.catalog_set("de_de");
    let mut units = UnitsSettingsController::new(h.services.clone());
    units.activate().await;

    assert!(units.save_units().await.is_saved());
    assert_eq!(h.alerts.successes(), vec!["Erfolgreich aktualisiert".to_string()]);
}

impl Harness {
    fn catalog_set(&self, language: &str) {
        use mycontroller_core::Translator;
        self.catalog.set_language(language);
    }
}

// ==========================================================================
// Geolocation
// ==========================================================================

#[tokio::test]
async fn test_geolocation_rounds_to_four_decimals() {
    let h = harness_with(full_server(), |b| {
        b.geolocator(Arc::new(FixedGeolocator::new(Position::new(
            52.520_008_3,
            13.404_954_1,
        ))))
    });
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;

    let position = system.update_geolocation().await.unwrap();
    assert_eq!(position, Position::new(52.52, 13.405));
    assert!(system.location.is_editing());
    let location = system.location.data().unwrap();
    assert_eq!(location.latitude, Some(52.52));
    assert_eq!(location.longitude, Some(13.405));
}

#[tokio::test]
async fn test_geolocation_failure_leaves_location_unchanged() {
    let h = harness_with(full_server(), |b| {
        b.geolocator(Arc::new(FixedGeolocator::unavailable()))
    });
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;
    let before = system.location.data().cloned();

    assert!(system.update_geolocation().await.is_none());
    assert_eq!(system.location.data().cloned(), before);
    assert!(!system.location.is_editing());
    let errors = h.alerts.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Geolocation"));
}

#[tokio::test]
async fn test_geolocation_without_location_stays_viewing() {
    let geolocator = Arc::new(FixedGeolocator::new(Position::new(1.0, 2.0)));
    let h = harness_with(MockServer::new(), |b| b.geolocator(geolocator.clone()));
    let mut system = SystemSettingsController::new(h.services.clone());
    system.activate().await;

    assert!(system.update_geolocation().await.is_none());
    assert!(!system.location.is_editing());
    assert_eq!(system.location.state(), PanelState::Unloaded);
    assert_eq!(geolocator.calls(), 0);
    let errors = h.alerts.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("location settings have not been loaded"));
}

// ==========================================================================
// Notifications and MySensors
// ==========================================================================

#[tokio::test]
async fn test_pushbullet_save_reloads() {
    let h = harness(full_server());
    let mut notifications = NotificationSettingsController::new(h.services.clone());
    notifications.activate().await;
    let fetches = h.server.fetch_count();

    notifications.pushbullet.begin_edit();
    notifications.pushbullet.data_mut().unwrap().access_token = Some("o.abc".to_string());
    assert!(notifications.save_pushbullet().await.is_saved());

    assert_eq!(h.server.fetch_count(), fetches + 1);
    assert_eq!(
        notifications
            .pushbullet
            .data()
            .unwrap()
            .access_token
            .as_deref(),
        Some("o.abc")
    );

    // Email and SMS do not reload
    let fetches = h.server.fetch_count();
    assert!(notifications.save_email().await.is_saved());
    assert!(notifications.save_sms().await.is_saved());
    assert_eq!(h.server.fetch_count(), fetches);
}

#[tokio::test]
async fn test_mysensors_without_default_firmware_skips_lookup() {
    let server = MockServer::builder()
        .group(&MySensorsSettings::default())
        .firmware("F1", "Blink 1.0")
        .build();
    let h = harness(server);
    let mut mysensors = MySensorsSettingsController::new(h.services.clone());
    mysensors.activate().await;

    assert_eq!(h.server.firmware_count(), 0);
    assert_eq!(mysensors.default_firmware_name, None);
}

#[tokio::test]
async fn test_mysensors_resolves_default_firmware() {
    let h = harness(full_server());
    let mut mysensors = MySensorsSettingsController::new(h.services.clone());
    mysensors.activate().await;

    assert_eq!(h.server.firmware_count(), 1);
    assert_eq!(mysensors.default_firmware_name.as_deref(), Some("Blink 1.0"));
    assert_eq!(mysensors.firmwares.len(), 1);
}

#[tokio::test]
async fn test_mysensors_unknown_firmware_is_not_an_error() {
    let server = MockServer::builder()
        .group(&MySensorsSettings {
            default_firmware: Some("F9".to_string()),
            ..Default::default()
        })
        .build();
    let h = harness(server);
    let mut mysensors = MySensorsSettingsController::new(h.services.clone());
    mysensors.activate().await;

    assert_eq!(h.server.firmware_count(), 1);
    assert_eq!(mysensors.default_firmware_name, None);
    assert!(h.alerts.errors().is_empty());
}

#[tokio::test]
async fn test_mysensors_save_reresolves_name() {
    let server = MockServer::builder()
        .group(&MySensorsSettings::default())
        .firmware("F2", "Relay 2.1")
        .build();
    let h = harness(server);
    let mut mysensors = MySensorsSettingsController::new(h.services.clone());
    mysensors.activate().await;

    mysensors.mysensors.begin_edit();
    mysensors.mysensors.data_mut().unwrap().default_firmware = Some("F2".to_string());
    assert!(mysensors.save_mysensors().await.is_saved());
    assert_eq!(mysensors.default_firmware_name.as_deref(), Some("Relay 2.1"));
}

// ==========================================================================
// Metrics and retention
// ==========================================================================

#[tokio::test]
async fn test_retention_dialog_dismissal_keeps_view_mode() {
    let dialogs = Arc::new(ScriptedDialog::new(DialogOutcome::Dismissed));
    let h = harness_with(full_server(), |b| b.dialogs(dialogs.clone()));
    let mut metrics = MetricsSettingsController::new(h.services.clone());
    metrics.activate().await;

    let outcome = metrics.retention_warning(DialogSize::Large).await;
    assert_eq!(outcome, DialogOutcome::Dismissed);
    assert!(!metrics.retention.is_editing());

    let opened = dialogs.opened();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].header(), "Change metrics retention");
    assert_eq!(opened[0].size(), DialogSize::Large);
}

#[tokio::test]
async fn test_retention_dialog_confirmation_enables_edit() {
    let dialogs = Arc::new(ScriptedDialog::new(DialogOutcome::Confirmed));
    let h = harness_with(full_server(), |b| b.dialogs(dialogs.clone()));
    let mut metrics = MetricsSettingsController::new(h.services.clone());
    metrics.activate().await;

    let outcome = metrics.retention_warning(DialogSize::Medium).await;
    assert_eq!(outcome, DialogOutcome::Confirmed);
    assert!(metrics.retention.is_editing());
    // Only retention is unlocked
    assert!(!metrics.metrics.is_editing());
}

#[tokio::test]
async fn test_retention_form_round_trip() {
    let h = harness(full_server());
    let mut metrics = MetricsSettingsController::new(h.services.clone());
    metrics.activate().await;

    let form = metrics.retention_form.as_ref().unwrap();
    assert_eq!(
        form.get(RetentionWindow::OneMinute),
        RetentionDuration::new(7, TimeUnit::Days)
    );

    metrics.retention.begin_edit();
    assert!(metrics.save_retention().await.is_saved());
    let stored: MetricsRetention = h.server.group().await.unwrap();
    assert_eq!(stored, retention());
}

#[tokio::test]
async fn test_retention_save_applies_form() {
    let h = harness(full_server());
    let mut metrics = MetricsSettingsController::new(h.services.clone());
    metrics.activate().await;

    metrics.retention.begin_edit();
    let form = metrics.retention_form.as_mut().unwrap();
    form.set(
        RetentionWindow::RawData,
        RetentionDuration::new(12, TimeUnit::Hours),
    );
    assert!(metrics.save_retention().await.is_saved());

    let stored: MetricsRetention = h.server.group().await.unwrap();
    assert_eq!(stored.retention_raw_data, 12 * 3_600_000);
    assert_eq!(stored.retention_one_day, 365 * DAY_MS);
}

#[tokio::test]
async fn test_retention_overflow_is_reported() {
    let h = harness(full_server());
    let mut metrics = MetricsSettingsController::new(h.services.clone());
    metrics.activate().await;

    metrics.retention.begin_edit();
    metrics.retention_form.as_mut().unwrap().set(
        RetentionWindow::OneDay,
        RetentionDuration::new(u64::MAX, TimeUnit::Days),
    );
    assert_eq!(metrics.save_retention().await, SaveOutcome::Failed);
    assert_eq!(h.server.store_count(), 0);
    assert!(metrics.retention.is_editing());
    assert_eq!(h.alerts.errors().len(), 1);
}

#[tokio::test]
async fn test_retention_read_failure_is_reported() {
    let h = harness(full_server());
    h.server.set_fail_reads(true).await;
    let mut metrics = MetricsSettingsController::new(h.services.clone());
    metrics.activate().await;

    // Metrics read failure is logged only; retention is surfaced
    assert_eq!(h.alerts.errors().len(), 1);
    assert_eq!(metrics.retention.state(), PanelState::Unloaded);
    assert_eq!(metrics.metrics.state(), PanelState::Unloaded);
    assert!(metrics.retention_form.is_none());
}

#[tokio::test]
async fn test_other_read_failures_are_silent() {
    let h = harness(full_server());
    h.server.set_fail_reads(true).await;

    let mut notifications = NotificationSettingsController::new(h.services.clone());
    notifications.activate().await;
    let mut units = UnitsSettingsController::new(h.services.clone());
    units.activate().await;

    assert!(h.alerts.alerts().is_empty());
    assert_eq!(notifications.email.state(), PanelState::Unloaded);
    assert_eq!(units.units.state(), PanelState::Unloaded);
}

#[tokio::test]
async fn test_groups_are_independent() {
    let h = harness(full_server());
    let mut notifications = NotificationSettingsController::new(h.services.clone());
    notifications.activate().await;

    notifications.email.begin_edit();
    notifications.sms.begin_edit();
    h.server.set_fail_writes(true, None).await;
    assert_eq!(notifications.save_email().await, SaveOutcome::Failed);
    h.server.set_fail_writes(false, None).await;
    assert!(notifications.save_sms().await.is_saved());

    assert!(notifications.email.is_editing());
    assert!(!notifications.sms.is_editing());
    assert!(!notifications.pushbullet.is_editing());
}
