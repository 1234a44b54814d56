//! Settings records shared by MyController settings front ends.
//!
//! This crate holds the plain data exchanged with a MyController server's
//! settings API, together with the unit conversions settings screens apply
//! before showing or submitting values. It performs no I/O.
//!
//! # Contents
//!
//! - One record per settings group ([`LocationSettings`],
//!   [`ControllerSettings`], [`MetricsRetention`], ...) implementing
//!   [`SettingsGroup`]
//! - [`GroupKind`], the closed set of groups
//! - [`units`]: millisecond/minute/second scaling and retention
//!   `{value, unit}` pairs
//! - Lookup records: [`GlobalConfig`], [`Firmware`], [`TypeOption`],
//!   [`Position`]
//!
//! # Example
//!
//! ```
//! use mycontroller_types::{ControllerSettings, units::ALIVE_CHECK_SCALE};
//!
//! let settings: ControllerSettings =
//!     serde_json::from_str(r#"{"aliveCheckInterval": 300000}"#).unwrap();
//! assert_eq!(ALIVE_CHECK_SCALE.to_display(settings.alive_check_interval), 5.0);
//! ```

pub mod error;
pub mod settings;
pub mod types;
pub mod units;

pub use error::{ConversionError, ConversionResult};
pub use settings::{
    ControllerSettings, EmailSettings, ExtraFields, GroupKind, LocationSettings, MetricsRetention,
    MetricsSettings, MySensorsSettings, PushbulletSettings, RetentionForm, RetentionWindow,
    SettingsGroup, SmsSettings, UnitVariable, UnitsSettings,
};
pub use types::{DEFAULT_LANGUAGE, Firmware, GlobalConfig, Position, TypeOption};
pub use units::{ALIVE_CHECK_SCALE, PAGE_REFRESH_SCALE, RetentionDuration, TimeUnit, UnitScale};
