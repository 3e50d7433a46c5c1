// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Full device status assembled from connected reads.

use std::fmt;

use chrono::NaiveDateTime;

use crate::types::{
    BatteryLevel, LOW_BATTERY_BIT, OperatingMode, StateCode, Temperature, WindowSensitivity,
    decode_temp,
};

use super::temps::{
    AMBIENT_INDEX, COMFORT_INDEX, ECO_INDEX, OFFSET_INDEX, TARGET_INDEX, WINDOW_SENSITIVITY_INDEX,
    WINDOW_TIME_INDEX,
};
use super::time::decode_time;
use super::{BATTERY_LEN, CLOCK_LEN, MODE_LEN, TEMPS_LEN};

/// Status of a thermostat read over a connection.
///
/// Connected reads mask the state byte to its low four bits, one more than
/// advertisements carry, so bit 3 (low battery) shows up as an
/// [`StateCode::Unknown`] code here. It is also exposed separately as
/// [`low_battery`](Self::low_battery).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceStatus {
    /// Auto or manual mode.
    pub mode: OperatingMode,
    /// Valve state.
    pub state: StateCode,
    /// Low-battery indicator.
    pub low_battery: bool,
    /// Measured temperature, `None` when not available.
    pub ambient_temp: Option<Temperature>,
    /// Current set-point, `None` when not available.
    pub target_temp: Option<Temperature>,
    /// Energy-saving temperature, `None` when not available.
    pub eco_temp: Option<Temperature>,
    /// Comfort temperature, `None` when not available.
    pub comfort_temp: Option<Temperature>,
    /// Sensor offset.
    pub temp_offset: Temperature,
    /// Open-window detection sensitivity.
    pub window_sensitivity: WindowSensitivity,
    /// Open-window heating pause in minutes.
    pub window_time_minutes: u8,
    /// Battery charge, `None` when not available.
    pub battery: Option<BatteryLevel>,
    /// Device clock, when it was read and is set.
    pub clock: Option<NaiveDateTime>,
    /// Undecoded mode/state record.
    pub raw_mode: [u8; MODE_LEN],
}

/// Decodes a device status from its characteristic records.
///
/// The clock record is optional; pass `None` when it was not read.
#[must_use]
pub fn decode_status(
    clock: Option<&[u8; CLOCK_LEN]>,
    mode: &[u8; MODE_LEN],
    temps: &[u8; TEMPS_LEN],
    battery: &[u8; BATTERY_LEN],
) -> DeviceStatus {
    DeviceStatus {
        mode: OperatingMode::from_raw(mode[0]),
        state: StateCode::from_connected(mode[1]),
        low_battery: mode[1] & LOW_BATTERY_BIT == LOW_BATTERY_BIT,
        ambient_temp: decode_temp(temps[AMBIENT_INDEX]),
        target_temp: decode_temp(temps[TARGET_INDEX]),
        eco_temp: decode_temp(temps[ECO_INDEX]),
        comfort_temp: decode_temp(temps[COMFORT_INDEX]),
        temp_offset: Temperature::from_raw_signed(temps[OFFSET_INDEX]),
        window_sensitivity: WindowSensitivity::from_raw(temps[WINDOW_SENSITIVITY_INDEX]),
        window_time_minutes: temps[WINDOW_TIME_INDEX],
        battery: BatteryLevel::decode(battery[0]),
        clock: clock.and_then(decode_time),
        raw_mode: *mode,
    }
}

impl DeviceStatus {
    /// Returns the undecoded state byte.
    #[must_use]
    pub const fn raw_state(&self) -> u8 {
        self.raw_mode[1]
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mode {}, state {}", self.mode, self.state)?;
        match self.ambient_temp {
            Some(t) => write!(f, ", T {t}")?,
            None => f.write_str(", T n/a")?,
        }
        match self.target_temp {
            Some(t) => write!(f, ", TT {}", t.label())?,
            None => f.write_str(", TT n/a")?,
        }
        match self.battery {
            Some(b) => write!(f, ", batt {b}"),
            None => f.write_str(", batt n/a"),
        }
    }
}
