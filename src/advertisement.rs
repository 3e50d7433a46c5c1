// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of the thermostat's broadcast advertisements.
//!
//! The thermostat advertises its 128-bit service UUID together with a
//! 7-byte manufacturer-specific payload roughly every 25 seconds. The
//! payload mirrors the most important fields of the characteristic
//! records, so status can be monitored without connecting:
//!
//! | Byte | Field |
//! |------|-------|
//! | 0 | ambient temperature (×0.5 °C, `0`/`0xFF` = n/a) |
//! | 1 | target temperature (×0.5 °C, `0`/`0xFF` = n/a) |
//! | 2 | battery percentage |
//! | 3 | mode flags (bit 7 locked, bit 0 manual, `0xFF` = n/a) |
//! | 4 | valve state |
//! | 5-6 | reserved |
//!
//! # Examples
//!
//! ```
//! use xavax_lib::advertisement::{SERVICE_UUID, decode};
//! use xavax_lib::types::StateCode;
//!
//! let service = SERVICE_UUID.to_string();
//! assert_eq!(service, "47e9ee00-47e9-11e4-8939-164230d1df67");
//!
//! let payload = [0x34, 0x0f, 0x46, 0x03, 0x00, 0xff, 0x06];
//! let adv = decode(&service, &payload)
//!     .unwrap()
//!     .expect("matching service UUID");
//!
//! assert_eq!(adv.ambient_temp.unwrap().celsius(), 26.0);
//! assert_eq!(adv.target_temp.unwrap().label(), "off");
//! assert_eq!(adv.state, StateCode::Idle);
//!
//! // Advertisements of other devices are not an error
//! assert!(decode("0000180f-0000-1000-8000-00805f9b34fb", &payload).unwrap().is_none());
//! ```

use std::fmt;

use uuid::Uuid;

use crate::codec::fixed_record;
use crate::error::CodecError;
use crate::types::{
    BatteryLevel, ModeFlags, Preset, StateCode, Temperature, decode_temp, state_label,
};

/// Service UUID advertised by the thermostat.
#[allow(clippy::unusual_byte_groupings)]
pub const SERVICE_UUID: Uuid = Uuid::from_u128(0x47e9ee00_47e9_11e4_8939_164230d1df67);

/// Length of the manufacturer-specific payload.
pub const PAYLOAD_LEN: usize = 7;

/// Status snapshot carried by one advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceAdvertisement {
    /// Measured temperature.
    pub ambient_temp: Option<Temperature>,
    /// Current set-point.
    pub target_temp: Option<Temperature>,
    /// Battery charge.
    pub battery: Option<BatteryLevel>,
    /// Lock and manual flags, `None` when not reported.
    pub flags: Option<ModeFlags>,
    /// Valve state.
    pub state: StateCode,
    /// The payload as received.
    pub raw: [u8; PAYLOAD_LEN],
}

impl DeviceAdvertisement {
    /// Returns the raw state byte.
    #[must_use]
    pub const fn raw_state(&self) -> u8 {
        self.raw[4]
    }

    /// Returns the raw flags byte.
    #[must_use]
    pub const fn raw_flags(&self) -> u8 {
        self.raw[3]
    }

    /// Formats the payload as lowercase hex.
    #[must_use]
    pub fn hex(&self) -> String {
        self.raw.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for DeviceAdvertisement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ambient_temp {
            Some(t) => write!(f, "T {t}")?,
            None => f.write_str("T n/a")?,
        }
        match self.target_temp {
            Some(t) => match Preset::from_temperature(t) {
                Some(preset) => write!(f, " TT {preset:>4}")?,
                None => write!(f, " TT {:>4}", t.to_string())?,
            },
            None => write!(f, " TT {:>4}", "n/a")?,
        }
        match self.battery {
            Some(b) => write!(f, " batt {:>3}", b.to_string())?,
            None => f.write_str(" batt n/a")?,
        }
        match self.flags {
            Some(flags) => write!(f, " flags {flags}({:#x})", self.raw_flags())?,
            None => write!(f, " flags n/a({:#x})", self.raw_flags())?,
        }
        write!(
            f,
            " state {}({:#x})",
            state_label(self.raw_state()),
            self.raw_state()
        )
    }
}

/// Returns `true` if `service_uuid` is the thermostat's service.
///
/// Comparison is on the parsed UUID, so letter case does not matter.
#[must_use]
pub fn matches_service(service_uuid: &str) -> bool {
    Uuid::parse_str(service_uuid).is_ok_and(|uuid| uuid == SERVICE_UUID)
}

/// Decodes a 7-byte manufacturer payload. Always succeeds.
#[must_use]
pub fn decode_payload(payload: &[u8; PAYLOAD_LEN]) -> DeviceAdvertisement {
    DeviceAdvertisement {
        ambient_temp: decode_temp(payload[0]),
        target_temp: decode_temp(payload[1]),
        battery: BatteryLevel::decode(payload[2]),
        flags: ModeFlags::decode(payload[3]),
        state: StateCode::from_advertised(payload[4]),
        raw: *payload,
    }
}

/// Decodes an advertisement if it belongs to a thermostat.
///
/// Returns `Ok(None)` when `service_uuid` is some other device's service.
///
/// # Errors
///
/// Returns `CodecError::UnexpectedLength` if the service matches but the
/// payload is not 7 bytes long.
pub fn decode(
    service_uuid: &str,
    manufacturer_data: &[u8],
) -> Result<Option<DeviceAdvertisement>, CodecError> {
    if !matches_service(service_uuid) {
        return Ok(None);
    }
    let payload = fixed_record::<PAYLOAD_LEN>("advertisement", manufacturer_data)?;
    Ok(Some(decode_payload(&payload)))
}
