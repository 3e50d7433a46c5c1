// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for the thermostat protocol.
//!
//! Each type decodes one field of a characteristic record or advertisement
//! and owns that field's sentinel handling, so "not available" is always an
//! explicit `None` or `Unknown` rather than a misleading number.
//!
//! # Types
//!
//! - [`Temperature`] - Half-degree Celsius value, with [`decode_temp`] and [`temp_label`]
//! - [`Preset`] - The OFF (4.0 °C) and ON (32.0 °C) control set-points
//! - [`BatteryLevel`] - Battery charge (0-100%)
//! - [`StateCode`] - Valve state, with [`state_label`]
//! - [`OperatingMode`] / [`ModeFlags`] - Manual and lock bits
//! - [`WindowSensitivity`] - Open-window detection setting
//! - [`Handle`] / [`Pin`] - GATT handles and the lock PIN

mod battery;
mod handle;
mod mode;
mod state;
mod temperature;

pub use battery::BatteryLevel;
pub use handle::{Handle, Pin};
pub use mode::{
    FLAG_LOCK, FLAG_MANUAL, FLAGS_NOT_AVAILABLE, ModeFlags, OperatingMode, WindowSensitivity,
};
pub use state::{
    ADVERTISED_STATE_MASK, CONNECTED_STATE_MASK, LOW_BATTERY_BIT, STATE_NOT_AVAILABLE, StateCode,
    state_label,
};
pub use temperature::{LABEL_OFF_MAX, LABEL_ON_MIN, Preset, Temperature, decode_temp, temp_label};
