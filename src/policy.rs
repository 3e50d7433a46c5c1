// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Desired-state policy for known thermostats.
//!
//! The policy maps device addresses to a friendly name and an optional
//! desired on/off state. It is usually kept in a JSON device map:
//!
//! ```json
//! {
//!   "00:1a:22:0c:aa:bb": { "name": "Living room", "want_on": true },
//!   "00:1a:22:0c:aa:cc": { "name": "Bedroom", "want_on": null }
//! }
//! ```
//!
//! Addresses are matched case-insensitively.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Policy for one device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyEntry {
    /// Friendly name, empty if not configured.
    #[serde(default)]
    pub name: String,
    /// Desired state; `None` leaves the device alone.
    #[serde(default, rename = "want_on", alias = "desired_on")]
    pub desired_on: Option<bool>,
}

impl PolicyEntry {
    /// Creates a policy entry.
    #[must_use]
    pub fn new(name: impl Into<String>, desired_on: Option<bool>) -> Self {
        Self {
            name: name.into(),
            desired_on,
        }
    }
}

/// Device policy keyed by address.
///
/// # Examples
///
/// ```
/// use xavax_lib::DevicePolicy;
///
/// let policy = DevicePolicy::new()
///     .with_device("00:1A:22:0C:AA:BB", "Living room", Some(true))
///     .with_device("00:1a:22:0c:aa:cc", "Bedroom", None);
///
/// assert_eq!(policy.desired_on("00:1a:22:0c:aa:bb"), Some(true));
/// assert_eq!(policy.desired_on("00:1a:22:0c:aa:cc"), None);
/// assert_eq!(policy.name("00:1a:22:0c:aa:bb"), "Living room");
/// assert_eq!(policy.name("unknown"), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DevicePolicy {
    entries: HashMap<String, PolicyEntry>,
}

impl DevicePolicy {
    /// Creates an empty policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy from `(address, entry)` pairs.
    #[must_use]
    pub fn from_entries<I, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, PolicyEntry)>,
        A: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(address, entry)| (normalize(address.as_ref()), entry))
                .collect(),
        }
    }

    /// Adds a device to the policy.
    #[must_use]
    pub fn with_device(
        mut self,
        address: &str,
        name: impl Into<String>,
        desired_on: Option<bool>,
    ) -> Self {
        self.entries
            .insert(normalize(address), PolicyEntry::new(name, desired_on));
        self
    }

    /// Parses a JSON device map.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Json` if the document is not a map of
    /// address to `{name, want_on}` objects.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let entries: HashMap<String, PolicyEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Loads a JSON device map from a file.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Io` if the file cannot be read, or
    /// `PolicyError::Json` if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let policy = Self::from_json_str(&json)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            devices = policy.len(),
            "Loaded device policy"
        );
        Ok(policy)
    }

    /// Loads a device map if a path is given, otherwise returns an empty
    /// policy.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_optional(path: Option<&Path>) -> Result<Self, PolicyError> {
        path.map_or_else(|| Ok(Self::new()), Self::load)
    }

    /// Returns the entry for `address`.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&PolicyEntry> {
        self.entries.get(&normalize(address))
    }

    /// Returns the desired state for `address`, if one is declared.
    #[must_use]
    pub fn desired_on(&self, address: &str) -> Option<bool> {
        self.get(address).and_then(|entry| entry.desired_on)
    }

    /// Returns the friendly name for `address`, or `""`.
    #[must_use]
    pub fn name(&self, address: &str) -> &str {
        self.get(address).map_or("", |entry| entry.name.as_str())
    }

    /// Returns the number of devices in the policy.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the policy has no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(address, entry)` pairs; addresses are lowercase.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PolicyEntry)> {
        self.entries
            .iter()
            .map(|(address, entry)| (address.as_str(), entry))
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{
        "00:1A:22:0C:AA:BB": { "name": "Living room", "want_on": true },
        "00:1a:22:0c:aa:cc": { "name": "Bedroom", "want_on": null },
        "00:1a:22:0c:aa:dd": { "desired_on": false },
        "00:1a:22:0c:aa:ee": {}
    }"#;

    #[test]
    fn parse_device_map() {
        let policy = DevicePolicy::from_json_str(MAP).unwrap();
        assert_eq!(policy.len(), 4);
        assert_eq!(policy.desired_on("00:1a:22:0c:aa:bb"), Some(true));
        assert_eq!(policy.desired_on("00:1a:22:0c:aa:cc"), None);
        assert_eq!(policy.desired_on("00:1a:22:0c:aa:dd"), Some(false));
        assert_eq!(policy.desired_on("00:1a:22:0c:aa:ee"), None);
        assert_eq!(policy.name("00:1a:22:0c:aa:dd"), "");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let policy = DevicePolicy::from_json_str(MAP).unwrap();
        assert_eq!(policy.name("00:1a:22:0c:aa:bb"), "Living room");
        assert_eq!(policy.name("00:1A:22:0C:AA:CC"), "Bedroom");
    }

    #[test]
    fn unknown_address() {
        let policy = DevicePolicy::from_json_str(MAP).unwrap();
        assert!(policy.get("11:22:33:44:55:66").is_none());
        assert_eq!(policy.desired_on("11:22:33:44:55:66"), None);
    }

    #[test]
    fn invalid_json() {
        let err = DevicePolicy::from_json_str(r#"{"aa": {"want_on": "yes"}}"#).unwrap_err();
        assert!(matches!(err, PolicyError::Json(_)));
    }

    #[test]
    fn load_missing_file() {
        let err = DevicePolicy::load("/nonexistent/xavax-device-map.json").unwrap_err();
        assert!(matches!(err, PolicyError::Io(_)));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("xavax-policy-{}.json", std::process::id()));
        std::fs::write(&path, MAP).unwrap();
        let policy = DevicePolicy::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(policy.len(), 4);
    }

    #[test]
    fn no_path_gives_empty_policy() {
        let policy = DevicePolicy::load_optional(None).unwrap();
        assert!(policy.is_empty());
    }

    #[test]
    fn iter_yields_normalized_addresses() {
        let policy = DevicePolicy::from_json_str(MAP).unwrap();
        let mut addresses: Vec<&str> = policy.iter().map(|(address, _)| address).collect();
        addresses.sort_unstable();
        assert_eq!(
            addresses,
            [
                "00:1a:22:0c:aa:bb",
                "00:1a:22:0c:aa:cc",
                "00:1a:22:0c:aa:dd",
                "00:1a:22:0c:aa:ee"
            ]
        );
        let (_, entry) = policy
            .iter()
            .find(|(address, _)| *address == "00:1a:22:0c:aa:bb")
            .unwrap();
        assert_eq!(entry.name, "Living room");
    }

    #[test]
    fn serializes_with_want_on_key() {
        let entry = PolicyEntry::new("Hall", Some(false));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"name":"Hall","want_on":false}"#);
    }
}
