// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Valve state codes.
//!
//! The second byte of the mode/state record (and byte 4 of the
//! advertisement) carries the valve state in its low bits. Bit 3 is the
//! low-battery indicator; the upper nibble is set while the device waits
//! for its date to be entered after first power-on.

use std::fmt;

/// Mask applied to advertised state bytes.
pub const ADVERTISED_STATE_MASK: u8 = 0x07;

/// Mask applied to state bytes read over a connection.
pub const CONNECTED_STATE_MASK: u8 = 0x0F;

/// Bit 3 of the state byte.
pub const LOW_BATTERY_BIT: u8 = 1 << 3;

/// Raw state byte meaning "not reported".
pub const STATE_NOT_AVAILABLE: u8 = 0xFF;

/// What the valve motor is currently doing.
///
/// # Examples
///
/// ```
/// use xavax_lib::types::StateCode;
///
/// assert_eq!(StateCode::from_advertised(0x00), StateCode::Idle);
/// assert_eq!(StateCode::from_advertised(0x0e), StateCode::Adapting);
/// assert_eq!(StateCode::from_advertised(0x02), StateCode::Unknown(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StateCode {
    /// Valve is at rest; its position reflects the set-point.
    Idle,
    /// Valve motor is moving.
    Moving,
    /// The device reports an error.
    Error,
    /// Valve travel calibration in progress.
    Adapting,
    /// Installation mode (pin retracted).
    Installing,
    /// A code with no known meaning, kept as its masked value.
    Unknown(u8),
}

impl StateCode {
    /// Decodes an already-masked state value.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Idle,
            1 => Self::Moving,
            3 => Self::Error,
            6 => Self::Adapting,
            7 => Self::Installing,
            other => Self::Unknown(other),
        }
    }

    /// Decodes a state byte from an advertisement (low 3 bits).
    #[must_use]
    pub const fn from_advertised(raw: u8) -> Self {
        Self::from_code(raw & ADVERTISED_STATE_MASK)
    }

    /// Decodes a state byte read over a connection (low 4 bits).
    #[must_use]
    pub const fn from_connected(raw: u8) -> Self {
        Self::from_code(raw & CONNECTED_STATE_MASK)
    }

    /// Returns the masked numeric code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Moving => 1,
            Self::Error => 3,
            Self::Adapting => 6,
            Self::Installing => 7,
            Self::Unknown(code) => *code,
        }
    }

    /// Returns the four-character display name, if the code is known.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        match self {
            Self::Idle => Some("idle"),
            Self::Moving => Some("move"),
            Self::Error => Some("ERR!"),
            Self::Adapting => Some("adap"),
            Self::Installing => Some("INST"),
            Self::Unknown(_) => None,
        }
    }

    /// Returns `true` if the valve is at rest.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "?({:#x})", self.code()),
        }
    }
}

/// Formats a raw advertised state byte for display.
///
/// # Examples
///
/// ```
/// use xavax_lib::types::state_label;
///
/// assert_eq!(state_label(0xff), "n/a");
/// assert_eq!(state_label(0x06), "adap");
/// assert_eq!(state_label(0x02), "?(0x2)");
/// ```
#[must_use]
pub fn state_label(raw: u8) -> String {
    if raw == STATE_NOT_AVAILABLE {
        return "n/a".to_string();
    }
    StateCode::from_advertised(raw).to_string()
}
