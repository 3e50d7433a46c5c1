// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Battery level type.

use std::fmt;

use crate::error::ValueError;

/// Battery charge as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use xavax_lib::types::BatteryLevel;
///
/// assert_eq!(BatteryLevel::decode(0x46).map(|b| b.value()), Some(70));
/// assert!(BatteryLevel::decode(0x00).is_none());
/// assert!(BatteryLevel::decode(0xff).is_none());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8")]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    /// Creates a battery level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidBatteryLevel` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::InvalidBatteryLevel(value));
        }
        Ok(Self(value))
    }

    /// Decodes a battery byte.
    ///
    /// `0` and `0xFF` mean "not available". The device also reports
    /// nonsensical values such as `0xE0` now and then; anything above 100 is
    /// treated as absent too.
    #[must_use]
    pub fn decode(raw: u8) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Self::new(raw).ok()
        }
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for BatteryLevel {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
