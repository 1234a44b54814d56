//! Conversions between stored server units and display units.
//!
//! The server stores every duration in milliseconds. Settings screens show
//! some of them in coarser units: a fixed scale for single fields (minutes,
//! seconds) and a `{value, unit}` pair for retention windows.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConversionError, ConversionResult};

/// Fixed conversion factor between a stored millisecond value and its
/// display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitScale {
    factor: u64,
}

/// Node alive-check interval, shown in minutes.
pub const ALIVE_CHECK_SCALE: UnitScale = UnitScale::new(60_000);

/// Global page refresh time, shown in seconds.
pub const PAGE_REFRESH_SCALE: UnitScale = UnitScale::new(1_000);

impl UnitScale {
    /// Stored values below this limit survive a
    /// [`to_display`](Self::to_display) / [`to_stored`](Self::to_stored)
    /// round trip exactly. Beyond it the `f64` display value no longer
    /// carries every millisecond.
    pub const EXACT_LIMIT: u64 = 1 << 50;

    /// Create a scale with the given number of stored units per display unit.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is zero.
    #[must_use]
    pub const fn new(factor: u64) -> Self {
        assert!(factor > 0, "unit scale factor must be non-zero");
        Self { factor }
    }

    /// Number of stored units per display unit.
    #[must_use]
    pub const fn factor(&self) -> u64 {
        self.factor
    }

    /// Convert a stored value into its display value.
    ///
    /// ```
    /// use mycontroller_types::units::ALIVE_CHECK_SCALE;
    ///
    /// assert_eq!(ALIVE_CHECK_SCALE.to_display(300_000), 5.0);
    /// ```
    #[must_use]
    pub fn to_display(&self, stored: u64) -> f64 {
        stored as f64 / self.factor as f64
    }

    /// Convert a display value back into the stored representation.
    ///
    /// The product is rounded to the nearest stored unit, so any value below
    /// [`UnitScale::EXACT_LIMIT`] that came from [`UnitScale::to_display`]
    /// converts back to the exact original.
    pub fn to_stored(&self, displayed: f64) -> ConversionResult<u64> {
        if !displayed.is_finite() {
            return Err(ConversionError::NotFinite(displayed));
        }
        if displayed < 0.0 {
            return Err(ConversionError::Negative(displayed));
        }

        let stored = (displayed * self.factor as f64).round();
        if stored >= u64::MAX as f64 {
            return Err(ConversionError::OutOfRange(displayed));
        }
        Ok(stored as u64)
    }
}

/// Time unit used when editing a retention window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// All units, largest first.
    pub const DESCENDING: [TimeUnit; 5] = [
        TimeUnit::Days,
        TimeUnit::Hours,
        TimeUnit::Minutes,
        TimeUnit::Seconds,
        TimeUnit::Milliseconds,
    ];

    /// Milliseconds in one of this unit.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        match self {
            TimeUnit::Milliseconds => 1,
            TimeUnit::Seconds => 1_000,
            TimeUnit::Minutes => 60_000,
            TimeUnit::Hours => 3_600_000,
            TimeUnit::Days => 86_400_000,
        }
    }

    /// Short suffix used in duration strings (`7d`, `12h`).
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "ms" => Some(TimeUnit::Milliseconds),
            "s" | "sec" => Some(TimeUnit::Seconds),
            "m" | "min" => Some(TimeUnit::Minutes),
            "h" => Some(TimeUnit::Hours),
            "d" => Some(TimeUnit::Days),
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        };
        f.write_str(name)
    }
}

/// A duration split into an editable `{value, unit}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionDuration {
    pub value: u64,
    pub unit: TimeUnit,
}

impl RetentionDuration {
    #[must_use]
    pub const fn new(value: u64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    /// Decode a stored millisecond value using the largest unit that divides
    /// it exactly.
    ///
    /// ```
    /// use mycontroller_types::units::{RetentionDuration, TimeUnit};
    ///
    /// let d = RetentionDuration::from_millis(7 * 86_400_000);
    /// assert_eq!(d, RetentionDuration::new(7, TimeUnit::Days));
    /// assert_eq!(d.to_millis(), Ok(7 * 86_400_000));
    /// ```
    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            return Self::new(0, TimeUnit::Milliseconds);
        }
        // Milliseconds always divides, so the fallback is never reached.
        TimeUnit::DESCENDING
            .iter()
            .find(|unit| millis % unit.as_millis() == 0)
            .map(|unit| Self::new(millis / unit.as_millis(), *unit))
            .unwrap_or(Self::new(millis, TimeUnit::Milliseconds))
    }

    /// Encode back into stored milliseconds.
    pub fn to_millis(&self) -> ConversionResult<u64> {
        self.value
            .checked_mul(self.unit.as_millis())
            .ok_or(ConversionError::Overflow {
                value: self.value,
                unit: self.unit,
            })
    }
}

impl fmt::Display for RetentionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl FromStr for RetentionDuration {
    type Err = ConversionError;

    /// Parse compact duration strings such as `30s`, `15m`, `12h`, `7d` or
    /// `500ms`. A bare number is read as milliseconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, suffix) = trimmed.split_at(split);

        let value: u64 = digits
            .parse()
            .map_err(|_| ConversionError::InvalidDuration(s.to_string()))?;
        let unit = if suffix.is_empty() {
            TimeUnit::Milliseconds
        } else {
            TimeUnit::from_suffix(&suffix.trim().to_ascii_lowercase())
                .ok_or_else(|| ConversionError::InvalidDuration(s.to_string()))?
        };

        let duration = Self::new(value, unit);
        duration.to_millis()?;
        Ok(duration)
    }
}
