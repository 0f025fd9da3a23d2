// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::{Deserialize, Serialize};

use crate::decoder::DEFAULT_MAX_BLOCKS_PER_PACKET;
use crate::error::{Result, VeError};

/// Error budgets and timeout bounding a single packet read (C2).
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct ReadBudgets {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
    /// `-1` never exits on this class, `0` exits on first, `n > 0` after n.
    #[serde(default)]
    pub max_block_errors: i64,
    #[serde(default)]
    pub max_packet_errors: i64,
    #[serde(default = "default_max_blocks")]
    pub max_blocks_per_packet: u32,
}

fn default_timeout_secs() -> f64 {
    60.0
}

fn default_max_blocks() -> u32 {
    DEFAULT_MAX_BLOCKS_PER_PACKET
}

impl Default for ReadBudgets {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_block_errors: 0,
            max_packet_errors: 0,
            max_blocks_per_packet: default_max_blocks(),
        }
    }
}

impl ReadBudgets {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs <= 0.0 {
            return Err(VeError::setting_invalid("timeout_secs must be > 0"));
        }
        if self.max_blocks_per_packet == 0 {
            return Err(VeError::setting_invalid("max_blocks_per_packet must be > 0"));
        }
        Ok(())
    }
}

/// Options for the continuous callback loop (C3), §4.3.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct CallbackOptions {
    #[serde(default = "default_cb_timeout")]
    pub timeout_secs: f64,
    #[serde(default = "default_sleep_time")]
    pub sleep_time_secs: f64,
    #[serde(default)]
    pub max_loops: Option<u64>,
    #[serde(default)]
    pub max_block_errors: i64,
    #[serde(default)]
    pub max_packet_errors: i64,
}

fn default_cb_timeout() -> f64 {
    2.0
}

fn default_sleep_time() -> f64 {
    1.0
}

impl Default for CallbackOptions {
    fn default() -> Self {
        Self {
            timeout_secs: default_cb_timeout(),
            sleep_time_secs: default_sleep_time(),
            max_loops: None,
            max_block_errors: 0,
            max_packet_errors: 0,
        }
    }
}

impl CallbackOptions {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs <= 0.0 {
            return Err(VeError::setting_invalid("timeout_secs must be > 0"));
        }
        if self.sleep_time_secs < 0.0 {
            return Err(VeError::setting_invalid("sleep_time_secs must be >= 0"));
        }
        Ok(())
    }
}
