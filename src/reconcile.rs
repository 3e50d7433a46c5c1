// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation of desired and advertised heater state.
//!
//! During a scan every thermostat advertisement is compared with the
//! [`DevicePolicy`]. A device whose broadcast state differs from the desired
//! one gets a [`ControlAction`], at most once per scan.
//!
//! A device is only ever touched while it is idle and reports both
//! temperatures. A device that is moving its valve, adapting, installing or
//! in error is left alone whatever the policy says.
//!
//! # Examples
//!
//! ```
//! use xavax_lib::advertisement::SERVICE_UUID;
//! use xavax_lib::reconcile::{ControlAction, reconcile};
//! use xavax_lib::transport::DiscoveryEvent;
//! use xavax_lib::DevicePolicy;
//!
//! let policy = DevicePolicy::new().with_device("00:1a:22:0c:aa:bb", "Hall", Some(true));
//! let service = SERVICE_UUID.to_string();
//!
//! // Idle, manual, unlocked, set to the OFF preset
//! let event = DiscoveryEvent::new(
//!     "00:1a:22:0c:aa:bb",
//!     service.as_str(),
//!     [0x34, 0x0f, 0x46, 0x03, 0x00, 0xff, 0x06],
//! );
//!
//! let actions = reconcile(&policy, [&event, &event]);
//! assert_eq!(actions, vec![ControlAction::new("00:1a:22:0c:aa:bb", true)]);
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::advertisement::{self, DeviceAdvertisement};
use crate::policy::DevicePolicy;
use crate::transport::DiscoveryEvent;
use crate::types::{ModeFlags, Preset, StateCode};

/// A corrective write to perform on one device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlAction {
    /// Device address.
    pub address: String,
    /// State to apply.
    pub desired_on: bool,
}

impl ControlAction {
    /// Creates a control action.
    #[must_use]
    pub fn new(address: impl Into<String>, desired_on: bool) -> Self {
        Self {
            address: address.into(),
            desired_on,
        }
    }

    /// Returns the preset this action applies.
    #[must_use]
    pub const fn preset(&self) -> Preset {
        Preset::for_state(self.desired_on)
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.address, self.preset())
    }
}

/// Decision for a single advertisement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    /// The device is idle and both temperatures are known.
    pub controllable: bool,
    /// Whether the heater is calling for heat, known only when controllable.
    pub is_on: Option<bool>,
    /// A control action should be issued.
    pub needs_action: bool,
}

/// Compares a desired state with an advertised one.
///
/// The heater counts as on while the ambient temperature is below the
/// set-point. An action is needed when a desired state is declared, the
/// device is controllable, and any of these hold: the on/off state differs,
/// the device is not both locked and manual, or the set-point is not one of
/// the two presets.
///
/// A device on the right preset but unlocked is re-applied in full,
/// set-point included.
#[must_use]
pub fn assess(desired_on: Option<bool>, adv: &DeviceAdvertisement) -> Assessment {
    let is_on = match (adv.state, adv.ambient_temp, adv.target_temp) {
        (StateCode::Idle, Some(ambient), Some(target)) => Some(ambient < target),
        _ => None,
    };

    let needs_action = match (desired_on, is_on, adv.target_temp) {
        (Some(want), Some(is_on), Some(target)) => {
            want != is_on
                || adv.flags != Some(ModeFlags::CONTROLLED)
                || Preset::from_temperature(target).is_none()
        }
        _ => false,
    };

    Assessment {
        controllable: is_on.is_some(),
        is_on,
        needs_action,
    }
}

/// Outcome of observing one advertisement, printable as a scan report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Source address.
    pub address: String,
    /// Friendly name from the policy, or `""`.
    pub name: String,
    /// Desired state from the policy.
    pub desired_on: Option<bool>,
    /// Decoded advertisement.
    pub advertisement: DeviceAdvertisement,
    /// Reconciliation decision.
    pub assessment: Assessment,
    /// `true` if this observation queued a new action. Repeated triggering
    /// advertisements of the same device leave this `false`.
    pub queued: bool,
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:<20}), status {} [{}]",
            self.address,
            self.name,
            self.advertisement.hex(),
            self.advertisement
        )?;
        match (self.assessment.needs_action, self.desired_on) {
            (true, Some(want)) => write!(f, " want {}", Preset::for_state(want)),
            _ => Ok(()),
        }
    }
}

/// Accumulates control actions over one scan.
///
/// # Examples
///
/// ```
/// use xavax_lib::advertisement::decode_payload;
/// use xavax_lib::{DevicePolicy, ReconciliationEngine};
///
/// let policy = DevicePolicy::new().with_device("00:1a:22:0c:aa:bb", "Hall", Some(false));
/// let mut engine = ReconciliationEngine::new(&policy);
///
/// // Idle, locked manual, set to the ON preset while OFF is wanted
/// let adv = decode_payload(&[0x2c, 0x40, 0x46, 0x81, 0x00, 0xff, 0x06]);
/// let observation = engine.observe("00:1a:22:0c:aa:bb", &adv);
///
/// assert!(observation.queued);
/// assert!(observation.to_string().ends_with(" want OFF"));
/// assert_eq!(engine.actions().len(), 1);
/// ```
#[derive(Debug)]
pub struct ReconciliationEngine<'p> {
    policy: &'p DevicePolicy,
    actions: Vec<ControlAction>,
    queued: HashSet<String>,
}

impl<'p> ReconciliationEngine<'p> {
    /// Creates an engine for one scan.
    #[must_use]
    pub fn new(policy: &'p DevicePolicy) -> Self {
        Self {
            policy,
            actions: Vec::new(),
            queued: HashSet::new(),
        }
    }

    /// Records an advertisement and queues an action if one is needed.
    pub fn observe(&mut self, address: &str, adv: &DeviceAdvertisement) -> Observation {
        let desired_on = self.policy.desired_on(address);
        let assessment = assess(desired_on, adv);

        let queued = match desired_on {
            Some(want) if assessment.needs_action => self.queue(address, want),
            _ => false,
        };

        Observation {
            address: address.to_string(),
            name: self.policy.name(address).to_string(),
            desired_on,
            advertisement: *adv,
            assessment,
            queued,
        }
    }

    /// Decodes a discovery event and observes it.
    ///
    /// Returns `None` for other devices and for malformed thermostat
    /// payloads, which are logged and skipped.
    pub fn process(&mut self, event: &DiscoveryEvent) -> Option<Observation> {
        match advertisement::decode(&event.service_uuid, &event.manufacturer_data) {
            Ok(Some(adv)) => {
                tracing::debug!(
                    address = %event.address,
                    payload = %adv.hex(),
                    "Decoded advertisement"
                );
                Some(self.observe(&event.address, &adv))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(
                    address = %event.address,
                    error = %e,
                    "Skipping malformed advertisement"
                );
                None
            }
        }
    }

    /// Returns the actions queued so far, in discovery order.
    #[must_use]
    pub fn actions(&self) -> &[ControlAction] {
        &self.actions
    }

    /// Consumes the engine and returns the queued actions.
    #[must_use]
    pub fn into_actions(self) -> Vec<ControlAction> {
        self.actions
    }

    fn queue(&mut self, address: &str, desired_on: bool) -> bool {
        if !self.queued.insert(address.to_ascii_lowercase()) {
            return false;
        }
        tracing::info!(
            address,
            name = self.policy.name(address),
            desired_on,
            "Queued control action"
        );
        self.actions.push(ControlAction::new(address, desired_on));
        true
    }
}

/// Reconciles a batch of discovery events in one pass.
pub fn reconcile<'e>(
    policy: &DevicePolicy,
    events: impl IntoIterator<Item = &'e DiscoveryEvent>,
) -> Vec<ControlAction> {
    let mut engine = ReconciliationEngine::new(policy);
    for event in events {
        engine.process(event);
    }
    engine.into_actions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advertisement::{SERVICE_UUID, decode_payload};

    const ADDR: &str = "00:1a:22:0c:aa:bb";

    fn payload(ambient: u8, target: u8, flags: u8, state: u8) -> DeviceAdvertisement {
        decode_payload(&[ambient, target, 0x46, flags, state, 0xff, 0x06])
    }

    fn policy(desired_on: Option<bool>) -> DevicePolicy {
        DevicePolicy::new().with_device(ADDR, "Living room", desired_on)
    }

    #[test]
    fn on_preset_is_on() {
        let assessment = assess(Some(true), &payload(0x2c, 0x40, 0x81, 0x00));
        assert!(assessment.controllable);
        assert_eq!(assessment.is_on, Some(true));
        assert!(!assessment.needs_action);
    }

    #[test]
    fn off_preset_is_off() {
        let assessment = assess(Some(false), &payload(0x2c, 0x08, 0x81, 0x00));
        assert_eq!(assessment.is_on, Some(false));
        assert!(!assessment.needs_action);
    }

    #[test]
    fn wrong_state_needs_action() {
        assert!(assess(Some(false), &payload(0x2c, 0x40, 0x81, 0x00)).needs_action);
        assert!(assess(Some(true), &payload(0x2c, 0x08, 0x81, 0x00)).needs_action);
    }

    #[test]
    fn unlocked_on_preset_needs_action() {
        assert!(assess(Some(true), &payload(0x2c, 0x40, 0x01, 0x00)).needs_action);
    }

    #[test]
    fn auto_mode_needs_action() {
        assert!(assess(Some(true), &payload(0x2c, 0x40, 0x80, 0x00)).needs_action);
    }

    #[test]
    fn unknown_flags_need_action() {
        assert!(assess(Some(true), &payload(0x2c, 0x40, 0xff, 0x00)).needs_action);
    }

    #[test]
    fn non_preset_target_needs_action() {
        // 21.0 with ambient 20.0: on, but not on a preset
        assert!(assess(Some(true), &payload(0x28, 0x2a, 0x81, 0x00)).needs_action);
    }

    #[test]
    fn no_desire_never_acts() {
        let assessment = assess(None, &payload(0x2c, 0x0f, 0x00, 0x00));
        assert!(assessment.controllable);
        assert!(!assessment.needs_action);
    }

    #[test]
    fn not_controllable_never_acts() {
        let cases = [
            payload(0x2c, 0x08, 0x03, 0x01),
            payload(0x2c, 0x08, 0x03, 0x03),
            payload(0x2c, 0x08, 0x03, 0x06),
            payload(0x2c, 0x08, 0x03, 0x07),
            payload(0x2c, 0x08, 0x03, 0x02),
            payload(0x00, 0x08, 0x03, 0x00),
            payload(0xff, 0x08, 0x03, 0x00),
            payload(0x2c, 0x00, 0x03, 0x00),
            payload(0x2c, 0xff, 0x03, 0x00),
        ];
        for adv in &cases {
            for desired_on in [Some(true), Some(false), None] {
                let assessment = assess(desired_on, adv);
                assert!(!assessment.controllable, "{adv}");
                assert_eq!(assessment.is_on, None);
                assert!(!assessment.needs_action, "{adv}");
            }
        }
    }

    #[test]
    fn state_uses_low_three_bits() {
        // 0x08 masks to idle
        let assessment = assess(Some(true), &payload(0x2c, 0x08, 0x81, 0x08));
        assert!(assessment.controllable);
        assert!(assessment.needs_action);
    }

    #[test]
    fn idle_manual_off_wanting_on() {
        let policy = policy(Some(true));
        let mut engine = ReconciliationEngine::new(&policy);
        let adv = decode_payload(&[0x34, 0x0f, 0x46, 0x03, 0x00, 0xff, 0x06]);

        let observation = engine.observe(ADDR, &adv);

        assert!(observation.queued);
        assert_eq!(engine.actions(), &[ControlAction::new(ADDR, true)]);
    }

    #[test]
    fn captured_error_state_takes_no_action() {
        let policy = policy(Some(true));
        let mut engine = ReconciliationEngine::new(&policy);
        let adv = decode_payload(&[0x34, 0x0f, 0x46, 0x00, 0x03, 0xff, 0x06]);

        let observation = engine.observe(ADDR, &adv);

        assert!(!observation.assessment.controllable);
        assert!(!observation.queued);
        assert!(engine.actions().is_empty());
    }

    #[test]
    fn repeated_advertisements_queue_once() {
        let policy = policy(Some(true));
        let mut engine = ReconciliationEngine::new(&policy);
        let adv = payload(0x2c, 0x08, 0x81, 0x00);

        assert!(engine.observe(ADDR, &adv).queued);
        let again = engine.observe(&ADDR.to_uppercase(), &adv);
        assert!(again.assessment.needs_action);
        assert!(!again.queued);
        assert_eq!(engine.into_actions().len(), 1);
    }

    #[test]
    fn unknown_device_is_reported_without_action() {
        let policy = policy(Some(true));
        let mut engine = ReconciliationEngine::new(&policy);
        let observation = engine.observe("11:22:33:44:55:66", &payload(0x2c, 0x08, 0x81, 0x00));
        assert_eq!(observation.name, "");
        assert_eq!(observation.desired_on, None);
        assert!(engine.actions().is_empty());
    }

    #[test]
    fn process_skips_foreign_and_malformed() {
        let policy = policy(Some(true));
        let service = SERVICE_UUID.to_string();
        let foreign = DiscoveryEvent::new(ADDR, "0000180f-0000-1000-8000-00805f9b34fb", [1, 2]);
        let malformed = DiscoveryEvent::new(ADDR, service.as_str(), [0x34, 0x0f, 0x46]);
        let good = DiscoveryEvent::new(
            ADDR,
            service.as_str(),
            [0x2c, 0x08, 0x46, 0x81, 0, 0xff, 6],
        );

        let mut engine = ReconciliationEngine::new(&policy);
        assert!(engine.process(&foreign).is_none());
        assert!(engine.process(&malformed).is_none());
        assert!(engine.process(&good).is_some_and(|o| o.queued));
    }

    #[test]
    fn reconcile_keeps_discovery_order() {
        let policy = DevicePolicy::new()
            .with_device("00:1a:22:0c:aa:01", "a", Some(true))
            .with_device("00:1a:22:0c:aa:02", "b", Some(false))
            .with_device("00:1a:22:0c:aa:03", "c", Some(true));
        let service = SERVICE_UUID.to_string();
        let on = [0x2c, 0x40, 0x46, 0x81, 0, 0xff, 6];
        let off = [0x2c, 0x08, 0x46, 0x81, 0, 0xff, 6];
        let events = [
            DiscoveryEvent::new("00:1a:22:0c:aa:02", service.as_str(), on),
            DiscoveryEvent::new("00:1a:22:0c:aa:03", service.as_str(), on),
            DiscoveryEvent::new("00:1a:22:0c:aa:01", service.as_str(), off),
            DiscoveryEvent::new("00:1a:22:0c:aa:02", service.as_str(), on),
        ];

        let actions = reconcile(&policy, &events);

        assert_eq!(
            actions,
            vec![
                ControlAction::new("00:1a:22:0c:aa:02", false),
                ControlAction::new("00:1a:22:0c:aa:01", true),
            ]
        );
    }

    #[test]
    fn report_line() {
        let policy = policy(Some(true));
        let mut engine = ReconciliationEngine::new(&policy);
        let observation = engine.observe(ADDR, &payload(0x34, 0x08, 0x81, 0x00));
        assert_eq!(
            observation.to_string(),
            "00:1a:22:0c:aa:bb (Living room         ), status 3408468100ff06 \
             [T 26.0 TT  OFF batt 70% flags LM(0x81) state idle(0x0)] want ON"
        );
    }

    #[test]
    fn report_line_without_action() {
        let policy = policy(None);
        let mut engine = ReconciliationEngine::new(&policy);
        let observation = engine.observe(ADDR, &payload(0x34, 0x08, 0x81, 0x00));
        assert!(!observation.to_string().contains("want"));
    }

    #[test]
    fn action_serializes() {
        let action = ControlAction::new(ADDR, false);
        assert_eq!(action.to_string(), "00:1a:22:0c:aa:bb -> OFF");
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"address":"00:1a:22:0c:aa:bb","desired_on":false}"#);
    }
}
