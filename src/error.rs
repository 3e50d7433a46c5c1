// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `xavax_lib` library.
//!
//! This module provides the error hierarchy used across the library: value
//! validation, BLE transport failures, malformed characteristic records and
//! device policy loading.
//!
//! Unknown enumerations (an unrecognized state code, a sentinel temperature
//! or battery byte) are never errors. They decode to explicit "absent" or
//! "unknown" values instead.

use thiserror::Error;

use crate::types::Handle;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred in the BLE transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The device returned a record that cannot be decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Error occurred while loading the device policy.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A temperature cannot be represented in the device's half-degree byte.
    #[error("temperature {celsius} °C cannot be encoded")]
    TemperatureOutOfRange {
        /// The rejected temperature.
        celsius: f32,
    },

    /// The device clock only stores years 2000 through 2255.
    #[error("year {0} is out of range [2000, 2255]")]
    YearOutOfRange(i32),

    /// A battery percentage above 100.
    #[error("battery level {0} is out of range [0, 100]")]
    InvalidBatteryLevel(u8),
}

/// Errors reported by a [`BleHost`](crate::transport::BleHost) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connecting to the device failed.
    #[error("connection to {address} failed: {message}")]
    ConnectionFailed {
        /// Device address.
        address: String,
        /// Transport-specific description.
        message: String,
    },

    /// Reading a characteristic failed.
    #[error("read of {handle} failed: {message}")]
    ReadFailed {
        /// The characteristic handle.
        handle: Handle,
        /// Transport-specific description.
        message: String,
    },

    /// Writing a characteristic failed.
    #[error("write of {handle} failed: {message}")]
    WriteFailed {
        /// The characteristic handle.
        handle: Handle,
        /// Transport-specific description.
        message: String,
    },

    /// Disconnecting from the device failed.
    #[error("disconnect from {address} failed: {message}")]
    DisconnectFailed {
        /// Device address.
        address: String,
        /// Transport-specific description.
        message: String,
    },
}

/// Errors related to malformed records received from a device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A record did not have its documented fixed length.
    #[error("{record} record has {actual} bytes, expected {expected}")]
    UnexpectedLength {
        /// Which record was being decoded.
        record: &'static str,
        /// The documented length.
        expected: usize,
        /// The length actually received.
        actual: usize,
    },
}

/// Errors related to loading a device policy file.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy file could not be read.
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    /// The policy file is not valid JSON of the expected shape.
    #[error("invalid policy JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
