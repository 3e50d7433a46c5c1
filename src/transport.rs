// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BLE transport capabilities.
//!
//! The library does not talk to a radio itself. Embedders implement
//! [`BleHost`] and [`GattLink`] over their BLE stack (`btleplug`, `BlueZ`
//! D-Bus, an ESP32 host, ...) and feed scan results in as
//! [`DiscoveryEvent`]s. Scan duration, timeouts and retries are the
//! transport's business.

use crate::error::TransportError;
use crate::types::Handle;

/// Whether a characteristic write waits for the device's acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WriteType {
    /// ATT Write Request; the device confirms the write.
    WithResponse,
    /// ATT Write Command; fire and forget.
    #[default]
    WithoutResponse,
}

/// An open connection to one device.
#[allow(async_fn_in_trait)]
pub trait GattLink {
    /// Reads the value of a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ReadFailed` if the read fails.
    async fn read(&self, handle: Handle) -> Result<Vec<u8>, TransportError>;

    /// Writes the value of a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::WriteFailed` if the write fails.
    async fn write(
        &self,
        handle: Handle,
        data: &[u8],
        write_type: WriteType,
    ) -> Result<(), TransportError>;
}

/// A BLE adapter able to connect to devices by address.
#[allow(async_fn_in_trait)]
pub trait BleHost {
    /// The connection type produced by [`connect`](Self::connect).
    type Link: GattLink;

    /// Connects to the device with the given address.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ConnectionFailed` if the device cannot be
    /// reached.
    async fn connect(&self, address: &str) -> Result<Self::Link, TransportError>;

    /// Closes a connection.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::DisconnectFailed` if the adapter reports an
    /// error while disconnecting.
    async fn disconnect(&self, link: Self::Link) -> Result<(), TransportError>;
}

/// One advertisement seen during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEvent {
    /// Device address, e.g. `"00:1a:22:0c:aa:bb"`.
    pub address: String,
    /// Advertised 128-bit service UUID in string form.
    pub service_uuid: String,
    /// Manufacturer-specific data (AD type `0xFF`) without the length and
    /// type bytes.
    pub manufacturer_data: Vec<u8>,
}

impl DiscoveryEvent {
    /// Creates a discovery event.
    #[must_use]
    pub fn new(
        address: impl Into<String>,
        service_uuid: impl Into<String>,
        manufacturer_data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            address: address.into(),
            service_uuid: service_uuid.into(),
            manufacturer_data: manufacturer_data.into(),
        }
    }
}
