// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cfg::aggregator_config::{AggregatorConfig, ReconnectConfig};
use crate::cfg::logger::LoggerConfig;
use crate::cfg::reader_options::{CallbackOptions, ReadBudgets};
use crate::cfg::serial_config::SerialConfig;

/// One YAML document describing everything the controller needs: the
/// serial line, read/callback budgets, the aggregator's merge policy, an
/// optional reconnect policy, and the logger.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct VedirectConfig {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub read_budgets: ReadBudgets,
    #[serde(default)]
    pub callback: CallbackOptions,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    #[serde(default)]
    pub reconnect: Option<ReconnectConfig>,
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl VedirectConfig {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {:?}", path.as_ref()))?;
        let mut cfg: VedirectConfig = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants across the whole document.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        self.serial.validate()?;
        self.read_budgets.validate()?;
        self.callback.validate()?;
        self.aggregator.validate()?;
        if let Some(rc) = &self.reconnect {
            rc.validate()?;
        }
        Ok(())
    }
}
