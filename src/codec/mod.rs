// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Encoding and decoding of the thermostat's GATT characteristic records.
//!
//! Every characteristic holds a fixed-layout byte record. The functions in
//! this module are pure: they perform no I/O and take fixed-size arrays, so
//! a record of the wrong length cannot reach them. Use [`fixed_record`] to
//! convert bytes received from a transport; it reports a length mismatch as
//! [`CodecError::UnexpectedLength`].
//!
//! # Records
//!
//! | Handle | Layout |
//! |--------|--------|
//! | [`Handle::CLOCK`] | `[minute, hour, day, month, year - 2000]` |
//! | [`Handle::MODE`] | `[flags, state, reserved]` |
//! | [`Handle::TEMPS`] | `[ambient, target, eco, comfort, offset, window level, window time]` |
//! | [`Handle::BATTERY`] | `[percent]` |
//! | [`Handle::FIRMWARE`] | ASCII string |
//! | [`Handle::DISPLAY`] | `[idle off seconds, on remaining]` |
//! | [`Handle::LOCK`] | 4-byte PIN |
//!
//! # Examples
//!
//! ```
//! use xavax_lib::codec::{decode_status, encode_target_temp};
//! use xavax_lib::types::Temperature;
//!
//! let temps = [0x32, 0x39, 0x28, 0x29, 0x28, 0x04, 0x0a];
//! let updated = encode_target_temp(&temps, Temperature::from_celsius(32.0).unwrap()).unwrap();
//! assert_eq!(updated, [0x32, 0x40, 0x28, 0x29, 0x28, 0x04, 0x0a]);
//!
//! let status = decode_status(None, &[0x81, 0x00, 0x00], &updated, &[0x4f]);
//! assert_eq!(status.target_temp.unwrap().label(), "on");
//! ```
//!
//! [`Handle::CLOCK`]: crate::types::Handle::CLOCK
//! [`Handle::MODE`]: crate::types::Handle::MODE
//! [`Handle::TEMPS`]: crate::types::Handle::TEMPS
//! [`Handle::BATTERY`]: crate::types::Handle::BATTERY
//! [`Handle::FIRMWARE`]: crate::types::Handle::FIRMWARE
//! [`Handle::DISPLAY`]: crate::types::Handle::DISPLAY
//! [`Handle::LOCK`]: crate::types::Handle::LOCK

mod control;
mod status;
mod temps;
mod time;

pub use control::{
    DisplayTiming, decode_display_timing, decode_firmware_version, encode_display_timing,
    encode_mode, encode_pin,
};
pub use status::{DeviceStatus, decode_status};
pub use temps::{
    AMBIENT_INDEX, COMFORT_INDEX, ECO_INDEX, OFFSET_INDEX, TARGET_INDEX, WINDOW_SENSITIVITY_INDEX,
    WINDOW_TIME_INDEX, encode_target_temp,
};
pub use time::{decode_time, encode_time, round_to_minute};

use crate::error::CodecError;

/// Length of the clock record.
pub const CLOCK_LEN: usize = 5;
/// Length of the mode/state record.
pub const MODE_LEN: usize = 3;
/// Length of the temperature record.
pub const TEMPS_LEN: usize = 7;
/// Length of the battery record.
pub const BATTERY_LEN: usize = 1;
/// Length of the display timing record.
pub const DISPLAY_LEN: usize = 2;
/// Length of the lock PIN.
pub const PIN_LEN: usize = 4;

/// Converts a received record into its fixed-size form.
///
/// # Errors
///
/// Returns `CodecError::UnexpectedLength` if `bytes` is not exactly `N`
/// bytes long.
///
/// # Examples
///
/// ```
/// use xavax_lib::codec::fixed_record;
///
/// let mode: [u8; 3] = fixed_record("mode", &[0x81, 0x00, 0x00]).unwrap();
/// assert_eq!(mode[0], 0x81);
/// assert!(fixed_record::<3>("mode", &[0x81]).is_err());
/// ```
pub fn fixed_record<const N: usize>(
    record: &'static str,
    bytes: &[u8],
) -> Result<[u8; N], CodecError> {
    bytes
        .try_into()
        .map_err(|_| CodecError::UnexpectedLength {
            record,
            expected: N,
            actual: bytes.len(),
        })
}
