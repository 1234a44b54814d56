//! Settings group records as exchanged with the MyController server.
//!
//! Every record keeps the fields the settings screens edit as typed members
//! and carries any other server field through `extra` untouched, so a save
//! always submits the complete object the server sent.

use core::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConversionResult;
use crate::units::RetentionDuration;

/// Unknown server fields preserved across a load/save cycle.
pub type ExtraFields = Map<String, Value>;

/// The settings groups exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKind {
    Location,
    Controller,
    Units,
    Email,
    Sms,
    Pushbullet,
    MySensors,
    Metrics,
    MetricsRetention,
}

impl GroupKind {
    /// Every group, in screen order.
    pub const ALL: [GroupKind; 9] = [
        GroupKind::Location,
        GroupKind::Controller,
        GroupKind::Units,
        GroupKind::Email,
        GroupKind::Sms,
        GroupKind::Pushbullet,
        GroupKind::MySensors,
        GroupKind::Metrics,
        GroupKind::MetricsRetention,
    ];

    /// Resource name of the group under the server's settings endpoint.
    #[must_use]
    pub const fn resource(&self) -> &'static str {
        match self {
            GroupKind::Location => "location",
            GroupKind::Controller => "controller",
            GroupKind::Units => "units",
            GroupKind::Email => "email",
            GroupKind::Sms => "sms",
            GroupKind::Pushbullet => "pushbullet",
            GroupKind::MySensors => "mySensors",
            GroupKind::Metrics => "metrics",
            GroupKind::MetricsRetention => "metricsRetention",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// A record that is loaded and saved as one settings group.
pub trait SettingsGroup:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Which group this record belongs to.
    const KIND: GroupKind;
}

macro_rules! settings_group {
    ($ty:ty, $kind:expr) => {
        impl SettingsGroup for $ty {
            const KIND: GroupKind = $kind;
        }
    };
}

/// Geographic location used for sunrise/sunset calculations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSettings {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Core controller settings.
///
/// `alive_check_interval` and `global_page_refresh_time` are stored in
/// milliseconds; screens show them in minutes and seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerSettings {
    #[serde(default)]
    pub alive_check_interval: u64,
    #[serde(default)]
    pub global_page_refresh_time: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub resources_log_level: Option<String>,
    #[serde(default)]
    pub date_format: Option<String>,
    #[serde(default)]
    pub time_format: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Display unit assigned to a sensor variable type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitVariable {
    pub variable: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitsSettings {
    #[serde(default)]
    pub variables: Vec<UnitVariable>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl UnitsSettings {
    /// Find the unit assigned to a variable type.
    #[must_use]
    pub fn unit_for(&self, variable: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.variable == variable)
            .map(|v| v.unit.as_str())
    }

    /// Assign a unit to a variable type, adding the variable if missing.
    pub fn set_unit(&mut self, variable: &str, unit: &str) {
        match self.variables.iter_mut().find(|v| v.variable == variable) {
            Some(existing) => existing.unit = unit.to_string(),
            None => self.variables.push(UnitVariable {
                variable: variable.to_string(),
                unit: unit.to_string(),
            }),
        }
    }
}

/// Outgoing mail server used by notification operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettings {
    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default)]
    pub enable_ssl: bool,
    #[serde(default)]
    pub from_address: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// SMS gateway credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsSettings {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub auth_sid: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Pushbullet account.
///
/// The server validates the access token on save and fills in `name`,
/// `email` and `iden` from the Pushbullet account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushbulletSettings {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub iden: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// MySensors network defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MySensorsSettings {
    /// Reference id of the firmware offered to nodes without an assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_firmware: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Chart defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSettings {
    /// Default chart time range in milliseconds.
    #[serde(default)]
    pub default_time_range: u64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// The seven retention windows of the metrics rollup pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetentionWindow {
    RawData,
    OneMinute,
    FiveMinutes,
    OneHour,
    SixHours,
    TwelveHours,
    OneDay,
}

impl RetentionWindow {
    pub const ALL: [RetentionWindow; 7] = [
        RetentionWindow::RawData,
        RetentionWindow::OneMinute,
        RetentionWindow::FiveMinutes,
        RetentionWindow::OneHour,
        RetentionWindow::SixHours,
        RetentionWindow::TwelveHours,
        RetentionWindow::OneDay,
    ];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            RetentionWindow::RawData => "raw data",
            RetentionWindow::OneMinute => "1 minute rollup",
            RetentionWindow::FiveMinutes => "5 minutes rollup",
            RetentionWindow::OneHour => "1 hour rollup",
            RetentionWindow::SixHours => "6 hours rollup",
            RetentionWindow::TwelveHours => "12 hours rollup",
            RetentionWindow::OneDay => "1 day rollup",
        }
    }

    const fn index(&self) -> usize {
        *self as usize
    }
}

/// Retention durations, in milliseconds, for each rollup window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRetention {
    #[serde(default)]
    pub retention_raw_data: u64,
    #[serde(default)]
    pub retention_one_minute: u64,
    #[serde(default)]
    pub retention_five_minutes: u64,
    #[serde(default)]
    pub retention_one_hour: u64,
    #[serde(default)]
    pub retention_six_hours: u64,
    #[serde(default)]
    pub retention_twelve_hours: u64,
    #[serde(default)]
    pub retention_one_day: u64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl MetricsRetention {
    /// Stored duration of a window.
    #[must_use]
    pub fn get(&self, window: RetentionWindow) -> u64 {
        match window {
            RetentionWindow::RawData => self.retention_raw_data,
            RetentionWindow::OneMinute => self.retention_one_minute,
            RetentionWindow::FiveMinutes => self.retention_five_minutes,
            RetentionWindow::OneHour => self.retention_one_hour,
            RetentionWindow::SixHours => self.retention_six_hours,
            RetentionWindow::TwelveHours => self.retention_twelve_hours,
            RetentionWindow::OneDay => self.retention_one_day,
        }
    }

    fn slot(&mut self, window: RetentionWindow) -> &mut u64 {
        match window {
            RetentionWindow::RawData => &mut self.retention_raw_data,
            RetentionWindow::OneMinute => &mut self.retention_one_minute,
            RetentionWindow::FiveMinutes => &mut self.retention_five_minutes,
            RetentionWindow::OneHour => &mut self.retention_one_hour,
            RetentionWindow::SixHours => &mut self.retention_six_hours,
            RetentionWindow::TwelveHours => &mut self.retention_twelve_hours,
            RetentionWindow::OneDay => &mut self.retention_one_day,
        }
    }

    /// Overwrite the stored duration of a window.
    pub fn set(&mut self, window: RetentionWindow, millis: u64) {
        *self.slot(window) = millis;
    }
}

/// Editable `{value, unit}` view of all seven retention windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionForm {
    windows: [RetentionDuration; 7],
}

impl RetentionForm {
    /// Decode every window of a stored retention record.
    #[must_use]
    pub fn from_retention(retention: &MetricsRetention) -> Self {
        Self {
            windows: RetentionWindow::ALL
                .map(|window| RetentionDuration::from_millis(retention.get(window))),
        }
    }

    #[must_use]
    pub fn get(&self, window: RetentionWindow) -> RetentionDuration {
        self.windows[window.index()]
    }

    pub fn set(&mut self, window: RetentionWindow, duration: RetentionDuration) {
        self.windows[window.index()] = duration;
    }

    /// Encode every window back into `retention`.
    ///
    /// Nothing is written unless all seven windows convert.
    pub fn apply_to(&self, retention: &mut MetricsRetention) -> ConversionResult<()> {
        let mut encoded = [0u64; 7];
        for (slot, duration) in encoded.iter_mut().zip(self.windows.iter()) {
            *slot = duration.to_millis()?;
        }
        for (window, millis) in RetentionWindow::ALL.iter().zip(encoded) {
            retention.set(*window, millis);
        }
        Ok(())
    }
}

settings_group!(LocationSettings, GroupKind::Location);
settings_group!(ControllerSettings, GroupKind::Controller);
settings_group!(UnitsSettings, GroupKind::Units);
settings_group!(EmailSettings, GroupKind::Email);
settings_group!(SmsSettings, GroupKind::Sms);
settings_group!(PushbulletSettings, GroupKind::Pushbullet);
settings_group!(MySensorsSettings, GroupKind::MySensors);
settings_group!(MetricsSettings, GroupKind::Metrics);
settings_group!(MetricsRetention, GroupKind::MetricsRetention);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::TimeUnit;
    use serde_json::json;

    #[test]
    fn test_group_resource_names() {
        assert_eq!(GroupKind::MySensors.resource(), "mySensors");
        assert_eq!(GroupKind::MetricsRetention.to_string(), "metricsRetention");
        assert_eq!(GroupKind::ALL.len(), 9);
    }

    #[test]
    fn test_extra_fields_survive_round_trip() {
        let wire = json!({
            "aliveCheckInterval": 300000,
            "globalPageRefreshTime": 5000,
            "language": "en_us",
            "unitConfig": "METRIC",
            "dbVersion": 7
        });
        let settings: ControllerSettings = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(settings.alive_check_interval, 300_000);
        assert_eq!(settings.extra.get("unitConfig"), Some(&json!("METRIC")));

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["unitConfig"], json!("METRIC"));
        assert_eq!(back["dbVersion"], json!(7));
        assert_eq!(back["aliveCheckInterval"], json!(300000));
    }

    #[test]
    fn test_missing_fields_default() {
        let settings: MySensorsSettings = serde_json::from_value(json!({})).unwrap();
        assert!(settings.default_firmware.is_none());

        let settings: PushbulletSettings =
            serde_json::from_value(json!({"accessToken": "o.abc"})).unwrap();
        assert_eq!(settings.access_token.as_deref(), Some("o.abc"));
        assert!(!settings.active);
    }

    #[test]
    fn test_units_set_unit() {
        let mut units = UnitsSettings::default();
        units.set_unit("V_TEMP", "°C");
        units.set_unit("V_TEMP", "°F");
        units.set_unit("V_HUM", "%");
        assert_eq!(units.variables.len(), 2);
        assert_eq!(units.unit_for("V_TEMP"), Some("°F"));
        assert_eq!(units.unit_for("V_PRESSURE"), None);
    }

    #[test]
    fn test_retention_form_decode_and_apply() {
        let retention = MetricsRetention {
            retention_raw_data: 86_400_000,
            retention_one_minute: 7 * 86_400_000,
            retention_five_minutes: 14 * 86_400_000,
            retention_one_hour: 30 * 86_400_000,
            retention_six_hours: 90_000,
            retention_twelve_hours: 3_600_000,
            retention_one_day: 0,
            extra: ExtraFields::new(),
        };

        let mut form = RetentionForm::from_retention(&retention);
        assert_eq!(
            form.get(RetentionWindow::OneMinute),
            RetentionDuration::new(7, TimeUnit::Days)
        );
        assert_eq!(
            form.get(RetentionWindow::SixHours),
            RetentionDuration::new(90, TimeUnit::Seconds)
        );

        let mut copy = retention.clone();
        form.apply_to(&mut copy).unwrap();
        assert_eq!(copy, retention);

        form.set(RetentionWindow::RawData, RetentionDuration::new(2, TimeUnit::Days));
        form.apply_to(&mut copy).unwrap();
        assert_eq!(copy.retention_raw_data, 2 * 86_400_000);
    }

    #[test]
    fn test_retention_form_apply_is_all_or_nothing() {
        let retention = MetricsRetention::default();
        let mut form = RetentionForm::from_retention(&retention);
        form.set(RetentionWindow::RawData, RetentionDuration::new(1, TimeUnit::Hours));
        form.set(
            RetentionWindow::OneDay,
            RetentionDuration::new(u64::MAX, TimeUnit::Days),
        );

        let mut target = retention.clone();
        assert!(form.apply_to(&mut target).is_err());
        assert_eq!(target.retention_raw_data, 0);
    }
}
