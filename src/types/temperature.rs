// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature type and the control presets.
//!
//! The thermostat transmits every temperature as a single byte counting half
//! degrees Celsius. Unsigned fields treat `0x00` and `0xFF` as "not
//! available"; the temperature offset is a signed byte.

use std::fmt;

use crate::error::ValueError;

/// Raw bytes that mean "not available" in temperature and battery fields.
pub(crate) const SENTINELS: [u8; 2] = [0x00, 0xFF];

/// Displayed temperatures at or below this value read as "off".
pub const LABEL_OFF_MAX: f32 = 7.5;

/// Displayed temperatures at or above this value read as "on".
pub const LABEL_ON_MIN: f32 = 28.5;

/// A temperature in steps of 0.5 °C.
///
/// # Examples
///
/// ```
/// use xavax_lib::types::Temperature;
///
/// let t = Temperature::from_raw(0x34);
/// assert_eq!(t.celsius(), 26.0);
/// assert_eq!(t.to_string(), "26.0");
///
/// let offset = Temperature::from_raw_signed(0xFE);
/// assert_eq!(offset.celsius(), -1.0);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Temperature(i16);

impl Temperature {
    /// Creates a temperature from an unsigned half-degree byte.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw as i16)
    }

    /// Creates a temperature from a signed half-degree byte.
    #[must_use]
    #[allow(clippy::cast_lossless, clippy::cast_possible_wrap)]
    pub const fn from_raw_signed(raw: u8) -> Self {
        Self(raw as i8 as i16)
    }

    /// Creates a temperature from degrees Celsius, rounding to the nearest
    /// half degree.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TemperatureOutOfRange` if the value is not finite
    /// or lies outside -64.0..=127.5 °C.
    ///
    /// # Examples
    ///
    /// ```
    /// use xavax_lib::types::Temperature;
    ///
    /// let t = Temperature::from_celsius(21.3).unwrap();
    /// assert_eq!(t.celsius(), 21.5);
    /// assert!(Temperature::from_celsius(f32::NAN).is_err());
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_celsius(celsius: f32) -> Result<Self, ValueError> {
        if !celsius.is_finite() {
            return Err(ValueError::TemperatureOutOfRange { celsius });
        }
        let half_degrees = (celsius / 0.5).round();
        if !(-128.0..=255.0).contains(&half_degrees) {
            return Err(ValueError::TemperatureOutOfRange { celsius });
        }
        // Range checked above
        Ok(Self(half_degrees as i16))
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    pub fn celsius(&self) -> f32 {
        f32::from(self.0) * 0.5
    }

    /// Returns the value in half degrees.
    #[must_use]
    pub const fn half_degrees(&self) -> i16 {
        self.0
    }

    /// Returns the unsigned byte used on the wire, if this temperature fits
    /// one without colliding with a sentinel.
    #[must_use]
    pub fn to_raw(&self) -> Option<u8> {
        u8::try_from(self.0)
            .ok()
            .filter(|raw| !SENTINELS.contains(raw))
    }

    /// Returns the coarse display label, see [`temp_label`].
    #[must_use]
    pub fn label(&self) -> String {
        temp_label(self.celsius())
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.celsius())
    }
}

/// Decodes an unsigned temperature byte, mapping sentinels to `None`.
///
/// # Examples
///
/// ```
/// use xavax_lib::types::decode_temp;
///
/// assert_eq!(decode_temp(0x0f).map(|t| t.celsius()), Some(7.5));
/// assert!(decode_temp(0x00).is_none());
/// assert!(decode_temp(0xff).is_none());
/// ```
#[must_use]
pub fn decode_temp(raw: u8) -> Option<Temperature> {
    if SENTINELS.contains(&raw) {
        None
    } else {
        Some(Temperature::from_raw(raw))
    }
}

/// Formats a temperature the way the thermostat display does.
///
/// Set-points at or below 7.5 °C show as `"off"` and set-points at or above
/// 28.5 °C show as `"on"`; anything in between is shown with one decimal.
///
/// # Examples
///
/// ```
/// use xavax_lib::types::temp_label;
///
/// assert_eq!(temp_label(4.0), "off");
/// assert_eq!(temp_label(21.5), "21.5");
/// assert_eq!(temp_label(32.0), "on");
/// ```
#[must_use]
pub fn temp_label(celsius: f32) -> String {
    if celsius <= LABEL_OFF_MAX {
        "off".to_string()
    } else if celsius >= LABEL_ON_MIN {
        "on".to_string()
    } else {
        format!("{celsius:.1}")
    }
}

/// The two canonical set-points used to switch a radiator off or on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Preset {
    /// Valve closed, 4.0 °C.
    Off,
    /// Valve fully open, 32.0 °C.
    On,
}

impl Preset {
    /// Returns the preset for the requested logical state.
    #[must_use]
    pub const fn for_state(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    /// Returns the set-point for this preset.
    #[must_use]
    pub const fn temperature(&self) -> Temperature {
        match self {
            Self::Off => Temperature(8),
            Self::On => Temperature(64),
        }
    }

    /// Returns the preset whose set-point equals `temperature` exactly.
    #[must_use]
    pub fn from_temperature(temperature: Temperature) -> Option<Self> {
        [Self::Off, Self::On]
            .into_iter()
            .find(|preset| preset.temperature() == temperature)
    }

    /// Returns `"OFF"` or `"ON"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
