// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Execution of control actions.
//!
//! [`ControlRunner`] connects to each device in turn, unlocks it and applies
//! the desired preset. Only one connection is open at a time.
//!
//! # Examples
//!
//! ```no_run
//! # use xavax_lib::transport::{BleHost, DiscoveryEvent};
//! # use xavax_lib::DevicePolicy;
//! # async fn example<H: BleHost>(host: &H, policy: &DevicePolicy, events: &[DiscoveryEvent]) {
//! use xavax_lib::{ControlRunner, reconcile::reconcile};
//!
//! let actions = reconcile(policy, events);
//! let report = ControlRunner::new(host).with_policy(policy).run(&actions).await;
//!
//! for failure in &report.failures {
//!     eprintln!("Failed to control {}: {}", failure.address, failure.error);
//! }
//! # }
//! ```

use crate::error::{Error, Result};
use crate::policy::DevicePolicy;
use crate::reconcile::ControlAction;
use crate::session::DeviceSession;
use crate::transport::BleHost;

/// A device that could not be controlled.
#[derive(Debug)]
pub struct ControlFailure {
    /// Device address.
    pub address: String,
    /// What went wrong.
    pub error: Error,
}

/// Result of a batch of control actions.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Addresses that were updated, in execution order.
    pub succeeded: Vec<String>,
    /// Devices that failed, in execution order.
    pub failures: Vec<ControlFailure>,
}

impl RunReport {
    /// Returns `true` if every action succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the number of actions attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }
}

/// Applies control actions one device at a time.
#[derive(Debug)]
pub struct ControlRunner<'h, H: BleHost> {
    host: &'h H,
    policy: Option<&'h DevicePolicy>,
}

impl<'h, H: BleHost> ControlRunner<'h, H> {
    /// Creates a runner using `host` for connections.
    #[must_use]
    pub const fn new(host: &'h H) -> Self {
        Self { host, policy: None }
    }

    /// Uses `policy` for device names in log output.
    #[must_use]
    pub const fn with_policy(mut self, policy: &'h DevicePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    fn name(&self, address: &str) -> &str {
        self.policy.map_or("", |policy| policy.name(address))
    }

    /// Connects, unlocks and applies the desired preset to one device.
    ///
    /// The connection is closed whether or not the writes succeed.
    ///
    /// # Errors
    ///
    /// Returns error if the connection, any write, or the disconnect fails.
    pub async fn apply(&self, action: &ControlAction) -> Result<()> {
        tracing::info!(
            address = %action.address,
            name = self.name(&action.address),
            preset = %action.preset(),
            "Controlling thermostat"
        );
        let session = DeviceSession::open(self.host, &action.address).await?;
        let outcome = async {
            session.unlock().await?;
            session.apply_desired_state(action.desired_on).await
        }
        .await;
        session.finish(outcome).await
    }

    /// Applies every action in order.
    ///
    /// A failing device is logged and recorded in the report; the remaining
    /// actions still run.
    pub async fn run(&self, actions: &[ControlAction]) -> RunReport {
        let mut report = RunReport::default();
        for action in actions {
            match self.apply(action).await {
                Ok(()) => report.succeeded.push(action.address.clone()),
                Err(error) => {
                    tracing::warn!(
                        address = %action.address,
                        name = self.name(&action.address),
                        error = %error,
                        "Failed to control thermostat"
                    );
                    report.failures.push(ControlFailure {
                        address: action.address.clone(),
                        error,
                    });
                }
            }
        }
        tracing::info!(
            succeeded = report.succeeded.len(),
            failed = report.failures.len(),
            "Control run finished"
        );
        report
    }
}
