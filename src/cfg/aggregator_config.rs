// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use serde::{Deserialize, Serialize};

use crate::error::{Result, VeError};
use crate::identity::IdentitySpec;

/// Packet aggregator policy (C6), §4.6.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AggregatorConfig {
    #[serde(default = "default_nb_packets")]
    pub nb_packets_per_round: u32,
    #[serde(default = "default_min_interval")]
    pub min_interval_secs: f64,
    #[serde(default)]
    pub accepted_keys: Option<Vec<String>>,
    #[serde(default)]
    pub max_read_error: u32,
}

fn default_nb_packets() -> u32 {
    10
}

fn default_min_interval() -> f64 {
    1.0
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            nb_packets_per_round: default_nb_packets(),
            min_interval_secs: default_min_interval(),
            accepted_keys: None,
            max_read_error: 0,
        }
    }
}

impl AggregatorConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=20).contains(&self.nb_packets_per_round) {
            return Err(VeError::setting_invalid("nb_packets_per_round must be in 1..=20"));
        }
        if self.min_interval_secs < 1.0 {
            return Err(VeError::setting_invalid("min_interval_secs must be >= 1"));
        }
        Ok(())
    }
}

/// Reconnect controller policy (C5), §4.5.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ReconnectConfig {
    #[serde(default = "default_reconnect_timeout")]
    pub reconnect_timeout_secs: f64,
    #[serde(default = "default_sleep_between_tries")]
    pub sleep_between_tries_secs: f64,
    #[serde(default)]
    pub identity: IdentitySpec,
}

fn default_reconnect_timeout() -> f64 {
    60.0
}

fn default_sleep_between_tries() -> f64 {
    1.0
}

impl ReconnectConfig {
    pub fn validate(&self) -> Result<()> {
        if self.reconnect_timeout_secs <= 0.0 {
            return Err(VeError::setting_invalid("reconnect_timeout_secs must be > 0"));
        }
        self.identity.validate()
    }
}
