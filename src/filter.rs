//! Retransmission deduplication

use std::collections::HashMap;

/// Drops readings that repeat the last accepted sequence number of their device.
///
/// The gateway retransmits each physical sample several times. Only the first copy of
/// a sequence number is forwarded; a device with no recorded number accepts anything,
/// including sequence number 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceFilter {
    last_seen: HashMap<u16, u32>,
}

impl SequenceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` and records `sequence_number` unless it equals the last number
    /// accepted for `device_id`.
    pub fn accept(&mut self, device_id: u16, sequence_number: u32) -> bool {
        match self.last_seen.insert(device_id, sequence_number) {
            Some(previous) => previous != sequence_number,
            None => true,
        }
    }

    /// Last accepted sequence number for a device, if any.
    pub fn last_seen(&self, device_id: u16) -> Option<u32> {
        self.last_seen.get(&device_id).copied()
    }

    /// Number of devices with a recorded sequence number.
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
