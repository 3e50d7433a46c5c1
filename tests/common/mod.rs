// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory BLE host for integration tests.
//!
//! Every device is a map of handle to register bytes. Writes update the
//! registers, so a read after a write sees the new value. All operations are
//! recorded in a journal.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use xavax_lib::TransportError;
use xavax_lib::transport::{BleHost, GattLink, WriteType};
use xavax_lib::types::Handle;

/// One transport operation as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Connect(String),
    Read {
        address: String,
        handle: Handle,
    },
    Write {
        address: String,
        handle: Handle,
        data: Vec<u8>,
        write_type: WriteType,
    },
    Disconnect(String),
}

#[derive(Debug, Default)]
struct Inner {
    devices: HashMap<String, HashMap<Handle, Vec<u8>>>,
    journal: Vec<Op>,
    fail_connect: HashSet<String>,
    fail_write: HashSet<(String, Handle)>,
    fail_disconnect: HashSet<String>,
}

/// Registers of a thermostat in auto mode, idle, 22.0 °C, set to 20.5 °C.
pub fn thermostat_registers() -> HashMap<Handle, Vec<u8>> {
    let mut registers = HashMap::new();
    registers.insert(Handle::CLOCK, vec![0x30, 0x13, 0x05, 0x08, 0x13]);
    for i in 0..Handle::PROGRAM_COUNT {
        if let Some(handle) = Handle::program(i) {
            registers.insert(handle, vec![0; 8]);
        }
    }
    for i in 0..Handle::SCHEDULE_COUNT {
        if let Some(handle) = Handle::schedule(i) {
            registers.insert(handle, vec![0; 9]);
        }
    }
    registers.insert(Handle::MODE, vec![0x00, 0x00, 0x00]);
    registers.insert(Handle::TEMPS, vec![0x2c, 0x29, 0x22, 0x29, 0x00, 0x08, 0x0a]);
    registers.insert(Handle::BATTERY, vec![0x46]);
    registers.insert(Handle::FIRMWARE, b"COBL0126".to_vec());
    registers.insert(Handle::DISPLAY, vec![0x1e, 0x00]);
    registers
}

/// Mock [`BleHost`] shared between the test and the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    inner: Arc<Mutex<Inner>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a thermostat with default registers.
    pub fn with_device(self, address: &str) -> Self {
        self.inner
            .lock()
            .devices
            .insert(address.to_string(), thermostat_registers());
        self
    }

    pub fn fail_connect(self, address: &str) -> Self {
        self.inner.lock().fail_connect.insert(address.to_string());
        self
    }

    pub fn fail_write(self, address: &str, handle: Handle) -> Self {
        self.inner
            .lock()
            .fail_write
            .insert((address.to_string(), handle));
        self
    }

    pub fn fail_disconnect(self, address: &str) -> Self {
        self.inner.lock().fail_disconnect.insert(address.to_string());
        self
    }

    pub fn set_register(&self, address: &str, handle: Handle, value: &[u8]) {
        if let Some(device) = self.inner.lock().devices.get_mut(address) {
            device.insert(handle, value.to_vec());
        }
    }

    pub fn remove_register(&self, address: &str, handle: Handle) {
        if let Some(device) = self.inner.lock().devices.get_mut(address) {
            device.remove(&handle);
        }
    }

    pub fn register(&self, address: &str, handle: Handle) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .devices
            .get(address)
            .and_then(|device| device.get(&handle).cloned())
    }

    pub fn journal(&self) -> Vec<Op> {
        self.inner.lock().journal.clone()
    }

    /// Writes to `address`, as `(handle, data, write_type)`.
    pub fn writes(&self, address: &str) -> Vec<(Handle, Vec<u8>, WriteType)> {
        self.inner
            .lock()
            .journal
            .iter()
            .filter_map(|op| match op {
                Op::Write {
                    address: a,
                    handle,
                    data,
                    write_type,
                } if a == address => Some((*handle, data.clone(), *write_type)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Op) -> bool) -> usize {
        self.inner.lock().journal.iter().filter(|op| predicate(op)).count()
    }

    /// Number of connections opened and not closed again.
    pub fn open_links(&self) -> usize {
        let connects = self.count(|op| matches!(op, Op::Connect(_)));
        let disconnects = self.count(|op| matches!(op, Op::Disconnect(_)));
        connects - disconnects
    }
}

#[derive(Debug)]
pub struct MockLink {
    address: String,
    inner: Arc<Mutex<Inner>>,
}

impl GattLink for MockLink {
    async fn read(&self, handle: Handle) -> Result<Vec<u8>, TransportError> {
        let mut inner = self.inner.lock();
        inner.journal.push(Op::Read {
            address: self.address.clone(),
            handle,
        });
        inner
            .devices
            .get(&self.address)
            .and_then(|device| device.get(&handle).cloned())
            .ok_or_else(|| TransportError::ReadFailed {
                handle,
                message: "no such characteristic".to_string(),
            })
    }

    async fn write(
        &self,
        handle: Handle,
        data: &[u8],
        write_type: WriteType,
    ) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.journal.push(Op::Write {
            address: self.address.clone(),
            handle,
            data: data.to_vec(),
            write_type,
        });
        if inner.fail_write.contains(&(self.address.clone(), handle)) {
            return Err(TransportError::WriteFailed {
                handle,
                message: "GATT error 0x03".to_string(),
            });
        }
        if let Some(device) = inner.devices.get_mut(&self.address) {
            device.insert(handle, data.to_vec());
        }
        Ok(())
    }
}

impl BleHost for MockHost {
    type Link = MockLink;

    async fn connect(&self, address: &str) -> Result<MockLink, TransportError> {
        let mut inner = self.inner.lock();
        if inner.fail_connect.contains(address) || !inner.devices.contains_key(address) {
            return Err(TransportError::ConnectionFailed {
                address: address.to_string(),
                message: "device not reachable".to_string(),
            });
        }
        inner.journal.push(Op::Connect(address.to_string()));
        Ok(MockLink {
            address: address.to_string(),
            inner: Arc::clone(&self.inner),
        })
    }

    async fn disconnect(&self, link: MockLink) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.journal.push(Op::Disconnect(link.address.clone()));
        if inner.fail_disconnect.contains(&link.address) {
            return Err(TransportError::DisconnectFailed {
                address: link.address,
                message: "adapter busy".to_string(),
            });
        }
        Ok(())
    }
}
