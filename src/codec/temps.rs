// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature record layout.

use crate::error::ValueError;
use crate::types::Temperature;

use super::TEMPS_LEN;

/// Measured room temperature.
pub const AMBIENT_INDEX: usize = 0;
/// Current set-point.
pub const TARGET_INDEX: usize = 1;
/// Energy-saving temperature.
pub const ECO_INDEX: usize = 2;
/// Comfort temperature.
pub const COMFORT_INDEX: usize = 3;
/// Signed sensor offset.
pub const OFFSET_INDEX: usize = 4;
/// Open-window detection sensitivity.
pub const WINDOW_SENSITIVITY_INDEX: usize = 5;
/// Open-window heating pause, minutes.
pub const WINDOW_TIME_INDEX: usize = 6;

/// Rewrites the set-point of a temperature record.
///
/// Only the target field changes; the other six bytes are copied from
/// `existing`, which should be a fresh read of the record.
///
/// # Errors
///
/// Returns `ValueError::TemperatureOutOfRange` if `target` is below 0.5 °C,
/// above 127.0 °C, or would otherwise encode to a sentinel byte.
pub fn encode_target_temp(
    existing: &[u8; TEMPS_LEN],
    target: Temperature,
) -> Result<[u8; TEMPS_LEN], ValueError> {
    let raw = target.to_raw().ok_or(ValueError::TemperatureOutOfRange {
        celsius: target.celsius(),
    })?;
    let mut record = *existing;
    record[TARGET_INDEX] = raw;
    Ok(record)
}
