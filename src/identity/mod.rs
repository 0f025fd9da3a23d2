// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Probe/match tester (C4): decides whether a decoded packet identifies the
//! expected device.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cfg::reader_options::ReadBudgets;
use crate::decoder::Packet;
use crate::error::{Result, VeError};
use crate::reader::Reader;
use crate::transport::Transport;

/// Maximum probe attempts `read_to_test` makes before giving up.
const MAX_PROBE_READS: u32 = 4;
/// Per-attempt read budget while probing, per §4.4.
const PROBE_TIMEOUT_SECS: f64 = 2.0;
const PROBE_BACKOFF: Duration = Duration::from_millis(50);

/// Drives `reader` up to [`MAX_PROBE_READS`] times, merging the resulting
/// packets, swallowing decoder errors with a brief back-off between
/// attempts. Used by the identity tester and by port discovery to gather
/// enough fields to evaluate an [`IdentitySpec`].
pub fn read_to_test<T: Transport>(reader: &mut Reader<T>) -> Result<Packet> {
    let budgets = ReadBudgets {
        timeout_secs: PROBE_TIMEOUT_SECS,
        max_block_errors: -1,
        max_packet_errors: -1,
        ..Default::default()
    };
    let mut merged = Packet::new();
    let mut last_err = None;
    for _ in 0..MAX_PROBE_READS {
        match reader.read_one(&budgets) {
            Ok(packet) => {
                merged.extend(packet);
            }
            Err(e) => {
                last_err = Some(e);
                std::thread::sleep(PROBE_BACKOFF);
            }
        }
    }
    if merged.is_empty()
        && let Some(e) = last_err
    {
        return Err(e);
    }
    Ok(merged)
}

fn is_key_pattern(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 30
        && s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric() || c == '#')
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '#' || c == '_')
}

/// One named sub-test in an [`IdentitySpec`].
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "kind")]
pub enum SubTest {
    /// The packet must contain `key` with exactly `expected_value`.
    ValueTest { name: String, key: String, expected_value: String },
    /// The packet must contain every key listed.
    ColumnsTest { name: String, keys: Vec<String> },
}

impl SubTest {
    fn name(&self) -> &str {
        match self {
            SubTest::ValueTest { name, .. } => name,
            SubTest::ColumnsTest { name, .. } => name,
        }
    }

    fn is_well_formed(&self) -> bool {
        if !is_key_pattern(self.name()) {
            return false;
        }
        match self {
            SubTest::ValueTest { key, expected_value, .. } => {
                is_key_pattern(key) && !expected_value.is_empty()
            }
            SubTest::ColumnsTest { keys, .. } => !keys.is_empty() && keys.iter().all(|k| is_key_pattern(k)),
        }
    }

    fn run(&self, packet: &Packet) -> bool {
        match self {
            SubTest::ValueTest { key, expected_value, .. } => {
                packet.get(key).map(String::as_str) == Some(expected_value.as_str())
            }
            SubTest::ColumnsTest { keys, .. } => keys.iter().all(|k| packet.contains_key(k)),
        }
    }
}

/// A declarative identity test: all sub-tests combine by logical AND.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct IdentitySpec {
    pub sub_tests: Vec<SubTest>,
}

impl IdentitySpec {
    pub fn validate(&self) -> Result<()> {
        for t in &self.sub_tests {
            if !t.is_well_formed() {
                return Err(VeError::setting_invalid(format!(
                    "identity sub-test {:?} is not well-formed",
                    t.name()
                )));
            }
        }
        Ok(())
    }

    /// True iff the packet satisfies every sub-test. An empty spec always
    /// matches (no identity requirement configured).
    pub fn matches(&self, packet: &Packet) -> bool {
        self.sub_tests.iter().all(|t| t.run(packet))
    }
}
