// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mode flag types.

use std::fmt;

/// Bit 0 of the mode byte: manual mode.
pub const FLAG_MANUAL: u8 = 1 << 0;

/// Bit 7 of the mode byte: keypad lock.
pub const FLAG_LOCK: u8 = 1 << 7;

/// Raw mode byte meaning "not reported".
pub const FLAGS_NOT_AVAILABLE: u8 = 0xFF;

/// Whether the thermostat follows its schedule or a fixed set-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OperatingMode {
    /// Follows the on-device weekly schedule.
    Auto,
    /// Holds the target temperature until changed.
    Manual,
}

impl OperatingMode {
    /// Decodes bit 0 of the mode byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        if raw & FLAG_MANUAL == FLAG_MANUAL {
            Self::Manual
        } else {
            Self::Auto
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Lock and manual flags of the mode byte.
///
/// # Examples
///
/// ```
/// use xavax_lib::types::ModeFlags;
///
/// let flags = ModeFlags::decode(0x81).unwrap();
/// assert!(flags.locked && flags.manual);
/// assert_eq!(flags.to_string(), "LM");
///
/// assert!(ModeFlags::decode(0xff).is_none());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct ModeFlags {
    /// Keypad is locked.
    pub locked: bool,
    /// Manual mode is active.
    pub manual: bool,
}

impl ModeFlags {
    /// The flags every controlled device is left with.
    pub const CONTROLLED: Self = Self {
        locked: true,
        manual: true,
    };

    /// Decodes a mode byte; `0xFF` means the flags are unknown.
    #[must_use]
    pub const fn decode(raw: u8) -> Option<Self> {
        if raw == FLAGS_NOT_AVAILABLE {
            return None;
        }
        Some(Self {
            locked: raw & FLAG_LOCK == FLAG_LOCK,
            manual: raw & FLAG_MANUAL == FLAG_MANUAL,
        })
    }

    /// Encodes the flags into a mode byte.
    #[must_use]
    pub const fn to_byte(&self) -> u8 {
        let mut byte = 0;
        if self.manual {
            byte |= FLAG_MANUAL;
        }
        if self.locked {
            byte |= FLAG_LOCK;
        }
        byte
    }
}

impl fmt::Display for ModeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lock = if self.locked { 'L' } else { '.' };
        let mode = if self.manual { 'M' } else { 'A' };
        write!(f, "{lock}{mode}")
    }
}

/// Open-window detection sensitivity (temps record byte 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum WindowSensitivity {
    /// Raw value 4.
    High,
    /// Raw value 8.
    Medium,
    /// Raw value 12.
    Low,
    /// Any other raw value.
    Other(u8),
}

impl WindowSensitivity {
    /// Decodes the raw sensitivity byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0x04 => Self::High,
            0x08 => Self::Medium,
            0x0C => Self::Low,
            other => Self::Other(other),
        }
    }
}
