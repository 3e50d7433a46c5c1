// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GATT characteristic handles and the lock PIN.

use std::fmt;

/// A 16-bit GATT attribute handle on the thermostat.
///
/// Characteristic values sit on odd handles spaced two apart, from the
/// clock at `0x001d` up to the lock at `0x0047`.
///
/// # Examples
///
/// ```
/// use xavax_lib::types::Handle;
///
/// assert_eq!(Handle::TEMPS.value(), 0x003f);
/// assert_eq!(Handle::program(1), Some(Handle::new(0x0021)));
/// assert_eq!(Handle::schedule(8), None);
/// assert_eq!(Handle::LOCK.to_string(), "0x0047");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Handle(u16);

impl Handle {
    /// Device clock, `[minute, hour, day, month, year - 2000]`.
    pub const CLOCK: Self = Self(0x001d);
    /// First of the seven day-program records.
    pub const PROGRAMS: Self = Self(0x001f);
    /// First of the eight schedule records.
    pub const SCHEDULE: Self = Self(0x002d);
    /// Mode flags and valve state, `[flags, state, reserved]`.
    pub const MODE: Self = Self(0x003d);
    /// Temperature record, seven bytes.
    pub const TEMPS: Self = Self(0x003f);
    /// Battery percentage.
    pub const BATTERY: Self = Self(0x0041);
    /// Firmware version string, read-only.
    pub const FIRMWARE: Self = Self(0x0043);
    /// Display timing, `[idle off seconds, on remaining]`.
    pub const DISPLAY: Self = Self(0x0045);
    /// Lock PIN, write-only.
    pub const LOCK: Self = Self(0x0047);

    /// Number of day-program records.
    pub const PROGRAM_COUNT: u8 = 7;
    /// Number of schedule records.
    pub const SCHEDULE_COUNT: u8 = 8;

    /// Creates a handle from its raw value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the handle of day-program record `index` (0-6).
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn program(index: u8) -> Option<Self> {
        if index < Self::PROGRAM_COUNT {
            Some(Self(Self::PROGRAMS.0 + 2 * index as u16))
        } else {
            None
        }
    }

    /// Returns the handle of schedule record `index` (0-7).
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn schedule(index: u8) -> Option<Self> {
        if index < Self::SCHEDULE_COUNT {
            Some(Self(Self::SCHEDULE.0 + 2 * index as u16))
        } else {
            None
        }
    }

    /// Returns every readable handle, clock through display timing.
    pub fn readable() -> impl Iterator<Item = Self> {
        (Self::CLOCK.0..Self::LOCK.0).step_by(2).map(Self)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<Handle> for u16 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// Four-byte PIN written to the lock characteristic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pin([u8; 4]);

impl Pin {
    /// Factory PIN, all zeroes.
    pub const DEFAULT: Self = Self([0; 4]);

    /// Creates a PIN from its wire bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Returns the wire bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}
