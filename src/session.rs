// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connected thermostat sessions.
//!
//! A [`DeviceSession`] wraps one open connection. It is acquired with
//! [`DeviceSession::open`] and released with [`DeviceSession::close`] or
//! [`DeviceSession::finish`], both of which consume it:
//!
//! ```no_run
//! # async fn example<H: xavax_lib::transport::BleHost>(host: &H) -> xavax_lib::Result<()> {
//! use xavax_lib::DeviceSession;
//!
//! let session = DeviceSession::open(host, "00:1a:22:0c:aa:bb").await?;
//! let outcome = async {
//!     session.unlock().await?;
//!     session.apply_desired_state(true).await
//! }
//! .await;
//! // Disconnects whether or not the writes succeeded
//! session.finish(outcome).await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::ops::ControlFlow;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::codec::{
    BATTERY_LEN, CLOCK_LEN, DISPLAY_LEN, DeviceStatus, DisplayTiming, MODE_LEN, TEMPS_LEN,
    decode_display_timing, decode_firmware_version, decode_status, decode_time,
    encode_display_timing, encode_mode, encode_pin, encode_target_temp, encode_time,
    fixed_record, round_to_minute,
};
use crate::error::{Error, Result};
use crate::transport::{BleHost, GattLink, WriteType};
use crate::types::{Handle, Pin, Preset, Temperature};

/// Outcome of [`DeviceSession::sync_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TimeSync {
    /// The device clock already showed the rounded current time.
    AlreadyCorrect(NaiveDateTime),
    /// The device clock was rewritten.
    Updated {
        /// Clock before the write, `None` if it was unset.
        previous: Option<NaiveDateTime>,
        /// Clock written to the device.
        current: NaiveDateTime,
    },
}

/// An open connection to one thermostat.
pub struct DeviceSession<'h, H: BleHost> {
    host: &'h H,
    link: H::Link,
    address: String,
}

impl<H: BleHost> fmt::Debug for DeviceSession<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceSession")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl<'h, H: BleHost> DeviceSession<'h, H> {
    /// Connects to the thermostat at `address`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the connection fails.
    pub async fn open(host: &'h H, address: &str) -> Result<Self> {
        tracing::info!(address, "Connecting to thermostat");
        let link = host.connect(address).await?;
        Ok(Self {
            host,
            link,
            address: address.to_string(),
        })
    }

    /// Returns the device address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Disconnects from the device.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the adapter reports a disconnect error.
    pub async fn close(self) -> Result<()> {
        tracing::info!(address = %self.address, "Disconnecting from thermostat");
        self.host.disconnect(self.link).await?;
        Ok(())
    }

    /// Disconnects and hands back the result of the work done in the
    /// session.
    ///
    /// An error from `outcome` takes precedence over a disconnect error,
    /// which is then only logged.
    ///
    /// # Errors
    ///
    /// Returns the error in `outcome`, or the disconnect error if `outcome`
    /// succeeded.
    pub async fn finish<T>(self, outcome: Result<T>) -> Result<T> {
        let address = self.address.clone();
        match (outcome, self.close().await) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(
                    address = %address,
                    error = %close_err,
                    "Disconnect failed after failed operation"
                );
                Err(err)
            }
        }
    }

    /// Reads a characteristic without decoding it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the read fails.
    pub async fn read_raw(&self, handle: Handle) -> Result<Vec<u8>> {
        let value = self.link.read(handle).await?;
        tracing::debug!(
            address = %self.address,
            handle = %handle,
            len = value.len(),
            "Read characteristic"
        );
        Ok(value)
    }

    async fn read_record<const N: usize>(
        &self,
        handle: Handle,
        record: &'static str,
    ) -> Result<[u8; N]> {
        let value = self.read_raw(handle).await?;
        Ok(fixed_record(record, &value)?)
    }

    async fn write(&self, handle: Handle, data: &[u8], write_type: WriteType) -> Result<()> {
        tracing::debug!(
            address = %self.address,
            handle = %handle,
            len = data.len(),
            ?write_type,
            "Write characteristic"
        );
        self.link
            .write(handle, data, write_type)
            .await
            .map_err(Error::from)
    }

    // ========== Control ==========

    /// Unlocks the device with the factory PIN.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the write fails.
    pub async fn unlock(&self) -> Result<()> {
        self.unlock_with(Pin::DEFAULT).await
    }

    /// Unlocks the device with a specific PIN.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the write fails.
    pub async fn unlock_with(&self, pin: Pin) -> Result<()> {
        self.write(Handle::LOCK, &encode_pin(pin), WriteType::WithoutResponse)
            .await
    }

    /// Sets the manual and keypad-lock flags.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the write fails.
    pub async fn set_mode(&self, manual: bool, lock: bool) -> Result<()> {
        self.write(
            Handle::MODE,
            &encode_mode(manual, lock),
            WriteType::WithoutResponse,
        )
        .await
    }

    /// Changes the set-point, preserving the rest of the temperature record.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `target` cannot be encoded, `Error::Codec`
    /// if the device returns a malformed record, or `Error::Transport` if
    /// the read or write fails.
    pub async fn set_target_temp(&self, target: Temperature) -> Result<()> {
        let existing = self.read_record::<TEMPS_LEN>(Handle::TEMPS, "temps").await?;
        let updated = encode_target_temp(&existing, target)?;
        self.write(Handle::TEMPS, &updated, WriteType::WithoutResponse)
            .await
    }

    /// Switches the radiator on or off: manual mode with the keypad locked,
    /// then the matching preset set-point.
    ///
    /// # Errors
    ///
    /// Returns error if any read or write fails.
    pub async fn apply_desired_state(&self, on: bool) -> Result<()> {
        let preset = Preset::for_state(on);
        self.set_mode(true, true).await?;
        self.set_target_temp(preset.temperature()).await?;
        tracing::info!(address = %self.address, %preset, "Applied preset");
        Ok(())
    }

    /// Sets how long the display stays lit after the last key press.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the write fails.
    pub async fn set_display_idle(&self, idle_off_seconds: u8) -> Result<()> {
        self.write(
            Handle::DISPLAY,
            &encode_display_timing(idle_off_seconds),
            WriteType::WithoutResponse,
        )
        .await
    }

    // ========== Status ==========

    /// Reads mode, temperatures, battery and clock.
    ///
    /// # Errors
    ///
    /// Returns `Error::Codec` if a record has the wrong length, or
    /// `Error::Transport` if a read fails.
    pub async fn read_status(&self) -> Result<DeviceStatus> {
        let clock = self.read_record::<CLOCK_LEN>(Handle::CLOCK, "clock").await?;
        let mode = self.read_record::<MODE_LEN>(Handle::MODE, "mode").await?;
        let temps = self.read_record::<TEMPS_LEN>(Handle::TEMPS, "temps").await?;
        let battery = self
            .read_record::<BATTERY_LEN>(Handle::BATTERY, "battery")
            .await?;
        Ok(decode_status(Some(&clock), &mode, &temps, &battery))
    }

    /// Reads the device clock; `None` while it is unset.
    ///
    /// # Errors
    ///
    /// Returns `Error::Codec` if the record has the wrong length, or
    /// `Error::Transport` if the read fails.
    pub async fn read_clock(&self) -> Result<Option<NaiveDateTime>> {
        let clock = self.read_record::<CLOCK_LEN>(Handle::CLOCK, "clock").await?;
        Ok(decode_time(&clock))
    }

    /// Sets the device clock to `now`, rounded to the minute, unless it
    /// already shows that time.
    ///
    /// The clock write is acknowledged by the device; a lost clock write
    /// would otherwise go unnoticed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `now` is outside 2000-2255, or error if the
    /// read or write fails.
    pub async fn sync_time(&self, now: NaiveDateTime) -> Result<TimeSync> {
        let current = self.read_record::<CLOCK_LEN>(Handle::CLOCK, "clock").await?;
        let previous = decode_time(&current);
        let wanted = round_to_minute(now);
        let encoded = encode_time(now)?;

        if encoded == current {
            tracing::debug!(address = %self.address, clock = %wanted, "Device time is correct");
            return Ok(TimeSync::AlreadyCorrect(wanted));
        }

        self.write(Handle::CLOCK, &encoded, WriteType::WithResponse)
            .await?;
        tracing::info!(
            address = %self.address,
            previous = ?previous,
            current = %wanted,
            "Updated device time"
        );
        Ok(TimeSync::Updated {
            previous,
            current: wanted,
        })
    }

    /// Reads the firmware version string.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the read fails.
    pub async fn read_firmware_version(&self) -> Result<String> {
        let value = self.read_raw(Handle::FIRMWARE).await?;
        Ok(decode_firmware_version(&value))
    }

    /// Reads the display timing record.
    ///
    /// # Errors
    ///
    /// Returns `Error::Codec` if the record has the wrong length, or
    /// `Error::Transport` if the read fails.
    pub async fn read_display_timing(&self) -> Result<DisplayTiming> {
        let record = self
            .read_record::<DISPLAY_LEN>(Handle::DISPLAY, "display")
            .await?;
        Ok(decode_display_timing(&record))
    }

    /// Reads every readable characteristic, clock through display timing.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` on the first failed read.
    pub async fn dump(&self) -> Result<Vec<(Handle, Vec<u8>)>> {
        let mut values = Vec::new();
        for handle in Handle::readable() {
            values.push((handle, self.read_raw(handle).await?));
        }
        Ok(values)
    }

    /// Reads the status repeatedly, waiting `interval` between reads.
    ///
    /// Stops after the first read when `interval` is zero, or as soon as
    /// `on_status` returns [`ControlFlow::Break`].
    ///
    /// # Errors
    ///
    /// Returns the first error from [`read_status`](Self::read_status).
    pub async fn poll_status<F>(&self, interval: Duration, mut on_status: F) -> Result<()>
    where
        F: FnMut(&DeviceStatus) -> ControlFlow<()>,
    {
        loop {
            let status = self.read_status().await?;
            if on_status(&status).is_break() || interval.is_zero() {
                return Ok(());
            }
            tokio::time::sleep(interval).await;
        }
    }
}
