// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Packet structure statistics (C7): per-slot fingerprints, linearity
//! tracking, and the global read-error ceiling.

use crate::decoder::Packet;
use crate::error::{Result, VeError};

const MAX_SLOTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    nb: usize,
    keys: Vec<String>,
}

impl Fingerprint {
    fn of(packet: &Packet) -> Self {
        Self { nb: packet.len(), keys: packet.keys().cloned().collect() }
    }
}

/// Per-slot bookkeeping entry.
#[derive(Debug, Clone)]
pub struct SlotStats {
    fingerprint: Fingerprint,
    last_index: usize,
    pub step: i64,
    pub is_linear: bool,
    pub nb_linear: u64,
    pub nb_resets: u64,
    pub nb_bad_packets: u64,
}

/// Tracks per-slot packet fingerprints across a round plus global counters.
#[derive(Debug, Default)]
pub struct PacketStats {
    slots: Vec<Option<SlotStats>>,
    pub is_linear_flow: bool,
    pub serial_read_errors: u64,
    accepted_keys: Option<Vec<String>>,
    max_read_error: u32,
}

impl PacketStats {
    pub fn new(accepted_keys: Option<Vec<String>>, max_read_error: u32) -> Self {
        Self {
            slots: Vec::new(),
            is_linear_flow: true,
            serial_read_errors: 0,
            accepted_keys,
            max_read_error,
        }
    }

    fn has_bad_keys(&self, packet: &Packet) -> bool {
        match &self.accepted_keys {
            Some(accepted) => packet.keys().any(|k| !accepted.contains(k)),
            None => false,
        }
    }

    /// Registers the packet observed at `index` within the current round.
    pub fn set_packet_stats(&mut self, index: usize, packet: &Packet) {
        if index >= MAX_SLOTS {
            return;
        }
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }

        let fp = Fingerprint::of(packet);
        let bad_keys = self.has_bad_keys(packet);

        match self.slots[index].clone() {
            None => {
                // Look for an existing slot with a matching fingerprint to
                // link this one to, establishing the initial step.
                let matched_last =
                    self.slots.iter().flatten().find(|s| s.fingerprint == fp).map(|s| s.last_index);
                let (is_linear, step) = match matched_last {
                    Some(matched_last) => (true, index as i64 - matched_last as i64),
                    None => (false, 0),
                };
                self.slots[index] = Some(SlotStats {
                    fingerprint: fp,
                    last_index: index,
                    step,
                    is_linear,
                    nb_linear: if is_linear { 1 } else { 0 },
                    nb_resets: 0,
                    nb_bad_packets: u64::from(bad_keys),
                });
                if !is_linear {
                    self.is_linear_flow = false;
                }
            }
            Some(prev) => {
                let same_fingerprint = prev.fingerprint == fp;
                let same_index = prev.last_index == index;
                let is_linear = same_fingerprint && same_index;
                let slot = self.slots[index].as_mut().expect("slot just matched");
                if is_linear {
                    slot.nb_linear += 1;
                } else {
                    slot.nb_resets += 1;
                    slot.nb_linear = 0;
                    slot.fingerprint = fp;
                    self.is_linear_flow = false;
                }
                slot.is_linear = is_linear;
                slot.last_index = index;
                if bad_keys {
                    slot.nb_bad_packets += 1;
                }
            }
        }
    }

    pub fn slot(&self, index: usize) -> Option<&SlotStats> {
        self.slots.get(index).and_then(|s| s.as_ref())
    }

    fn total_bad_packets(&self) -> u64 {
        self.slots.iter().flatten().map(|s| s.nb_bad_packets).sum()
    }

    /// Returns true once the error ceiling has been reached; when `raise` is
    /// set, returns the error instead so the caller can propagate it.
    pub fn has_reached_max_errors(&self, raise: bool) -> Result<bool> {
        if self.max_read_error == 0 {
            return Ok(false);
        }
        let reached = self.serial_read_errors >= self.max_read_error as u64
            || self.total_bad_packets() >= self.max_read_error as u64;
        if reached && raise {
            return Err(VeError::input_read(
                format!(
                    "max read errors reached: serial={}, bad_packets={}",
                    self.serial_read_errors,
                    self.total_bad_packets()
                ),
                self.serial_read_errors as u32,
            ));
        }
        Ok(reached)
    }

    pub fn record_serial_read_error(&mut self) {
        self.serial_read_errors += 1;
    }

    pub fn reset_global_stats(&mut self) {
        self.serial_read_errors = 0;
        self.is_linear_flow = true;
        for slot in self.slots.iter_mut().flatten() {
            slot.nb_bad_packets = 0;
        }
    }
}
