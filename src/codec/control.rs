// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mode, lock and display records.

use crate::types::{ModeFlags, Pin};

use super::{DISPLAY_LEN, MODE_LEN, PIN_LEN};

/// Encodes a mode write: bit 0 selects manual mode, bit 7 locks the keypad.
///
/// The state and reserved bytes are written as zero.
///
/// # Examples
///
/// ```
/// use xavax_lib::codec::encode_mode;
///
/// assert_eq!(encode_mode(true, true), [0x81, 0x00, 0x00]);
/// assert_eq!(encode_mode(false, false), [0x00, 0x00, 0x00]);
/// ```
#[must_use]
pub const fn encode_mode(manual: bool, lock: bool) -> [u8; MODE_LEN] {
    let flags = ModeFlags {
        locked: lock,
        manual,
    };
    [flags.to_byte(), 0, 0]
}

/// Encodes the unlock write for the lock characteristic.
#[must_use]
pub const fn encode_pin(pin: Pin) -> [u8; PIN_LEN] {
    pin.bytes()
}

/// Display backlight timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DisplayTiming {
    /// Seconds of inactivity before the display turns off.
    pub idle_off_seconds: u8,
    /// Seconds until the display turns off now.
    pub on_remaining: u8,
}

/// Decodes the display timing record.
#[must_use]
pub const fn decode_display_timing(record: &[u8; DISPLAY_LEN]) -> DisplayTiming {
    DisplayTiming {
        idle_off_seconds: record[0],
        on_remaining: record[1],
    }
}

/// Encodes a display idle timeout write.
#[must_use]
pub const fn encode_display_timing(idle_off_seconds: u8) -> [u8; DISPLAY_LEN] {
    [idle_off_seconds, 0]
}

/// Decodes the firmware version string, e.g. `COBL0126`.
#[must_use]
pub fn decode_firmware_version(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}
