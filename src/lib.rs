// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Xavax Lib - A Rust library to control Xavax Bluetooth LE radiator
//! thermostats.
//!
//! The library speaks the thermostat's GATT protocol and decodes its
//! broadcast advertisements. It can bring heaters in line with a desired
//! on/off state kept in a device map. The Bluetooth stack itself is not
//! included: embedders implement [`transport::BleHost`] over the stack of
//! their choice.
//!
//! # Supported Features
//!
//! - **Passive monitoring**: Temperatures, battery, lock/manual flags and
//!   valve state from advertisements, without connecting
//! - **Control**: Unlock, manual/lock mode, set-point, display timing
//! - **Status queries**: Full status read, clock, firmware version, raw dump
//! - **Time sync**: Set the device clock only when it drifted
//! - **Reconciliation**: Turn heaters on or off to match a device map
//!
//! # Quick Start
//!
//! ## Switching One Heater
//!
//! ```no_run
//! use xavax_lib::{ControlAction, ControlRunner};
//! # use xavax_lib::transport::BleHost;
//!
//! # async fn example<H: BleHost>(host: &H) -> xavax_lib::Result<()> {
//! ControlRunner::new(host)
//!     .apply(&ControlAction::new("00:1a:22:0c:aa:bb", true))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Scan and Reconcile
//!
//! ```no_run
//! use std::path::Path;
//!
//! use xavax_lib::{ControlRunner, DevicePolicy, ReconciliationEngine};
//! # use xavax_lib::transport::{BleHost, DiscoveryEvent};
//!
//! # async fn example<H: BleHost>(host: &H, scan: Vec<DiscoveryEvent>) -> xavax_lib::Result<()> {
//! let policy = DevicePolicy::load(Path::new("devices.json"))?;
//! let mut engine = ReconciliationEngine::new(&policy);
//!
//! for event in &scan {
//!     if let Some(observation) = engine.process(event) {
//!         println!("{observation}");
//!     }
//! }
//!
//! let report = ControlRunner::new(host)
//!     .with_policy(&policy)
//!     .run(engine.actions())
//!     .await;
//! println!("{} updated, {} failed", report.succeeded.len(), report.failures.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading Status
//!
//! ```no_run
//! use xavax_lib::DeviceSession;
//! # use xavax_lib::transport::BleHost;
//!
//! # async fn example<H: BleHost>(host: &H) -> xavax_lib::Result<()> {
//! let session = DeviceSession::open(host, "00:1a:22:0c:aa:bb").await?;
//! let status = session.read_status().await;
//! let status = session.finish(status).await?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

pub mod advertisement;
pub mod codec;
pub mod error;
pub mod policy;
pub mod reconcile;
pub mod runner;
pub mod session;
pub mod transport;
pub mod types;

pub use advertisement::DeviceAdvertisement;
pub use codec::{DeviceStatus, DisplayTiming};
pub use error::{CodecError, Error, PolicyError, Result, TransportError, ValueError};
pub use policy::{DevicePolicy, PolicyEntry};
pub use reconcile::{Assessment, ControlAction, Observation, ReconciliationEngine};
pub use runner::{ControlFailure, ControlRunner, RunReport};
pub use session::{DeviceSession, TimeSync};
pub use types::{
    BatteryLevel, Handle, ModeFlags, OperatingMode, Pin, Preset, StateCode, Temperature,
    WindowSensitivity,
};
