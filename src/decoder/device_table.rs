//! Device id to device kind dispatch

use std::collections::BTreeMap;

use crate::types::DeviceKind;

/// Device id of the electricity energy meter node.
pub const ENERGY_METER_DEVICE_ID: u16 = 1;

/// Maps device ids to the kind of payload they send.
///
/// Adding a new sensor class means adding a [`DeviceKind`] variant and registering
/// its id here; the assembler never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTable {
    kinds: BTreeMap<u16, DeviceKind>,
}

impl Default for DeviceTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(ENERGY_METER_DEVICE_ID, DeviceKind::EnergyMeter);
        table
    }
}

impl DeviceTable {
    /// Table with no registered devices; everything decodes as unknown.
    pub fn empty() -> Self {
        Self { kinds: BTreeMap::new() }
    }

    /// Register or replace the kind for a device id. Returns the previous kind.
    pub fn register(&mut self, device_id: u16, kind: DeviceKind) -> Option<DeviceKind> {
        self.kinds.insert(device_id, kind)
    }

    pub fn lookup(&self, device_id: u16) -> Option<DeviceKind> {
        self.kinds.get(&device_id).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl FromIterator<(u16, DeviceKind)> for DeviceTable {
    fn from_iter<I: IntoIterator<Item = (u16, DeviceKind)>>(iter: I) -> Self {
        Self { kinds: iter.into_iter().collect() }
    }
}
