// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VeError};
use crate::transport::port_path::is_valid_port_path;

/// Standard baud rates accepted for a VE.Direct line. Victron devices run at
/// 19200 (the default); the rest are kept because the upstream connection
/// tool validated against the same fixed table.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u32", into = "u32")]
pub enum BaudRate {
    B110,
    B300,
    B600,
    B1200,
    B2400,
    B4800,
    B9600,
    B14400,
    B19200,
    B38400,
    B57600,
    B115200,
    B128000,
    B256000,
}

impl BaudRate {
    pub const DEFAULT: BaudRate = BaudRate::B19200;

    pub fn as_u32(self) -> u32 {
        match self {
            BaudRate::B110 => 110,
            BaudRate::B300 => 300,
            BaudRate::B600 => 600,
            BaudRate::B1200 => 1200,
            BaudRate::B2400 => 2400,
            BaudRate::B4800 => 4800,
            BaudRate::B9600 => 9600,
            BaudRate::B14400 => 14400,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
            BaudRate::B128000 => 128000,
            BaudRate::B256000 => 256000,
        }
    }

    /// Seconds to sleep between byte reads so a blocking loop does not spin
    /// faster than the line can actually deliver (`10 bits / baud`).
    pub fn bit_time_secs(self) -> f64 {
        10.0 / self.as_u32() as f64
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        Ok(match value {
            110 => BaudRate::B110,
            300 => BaudRate::B300,
            600 => BaudRate::B600,
            1200 => BaudRate::B1200,
            2400 => BaudRate::B2400,
            4800 => BaudRate::B4800,
            9600 => BaudRate::B9600,
            14400 => BaudRate::B14400,
            19200 => BaudRate::B19200,
            38400 => BaudRate::B38400,
            57600 => BaudRate::B57600,
            115200 => BaudRate::B115200,
            128000 => BaudRate::B128000,
            256000 => BaudRate::B256000,
            other => return Err(format!("unsupported baud rate {other}")),
        })
    }
}

impl From<BaudRate> for u32 {
    fn from(b: BaudRate) -> Self {
        b.as_u32()
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// A read/write timeout: a finite duration, non-blocking (poll and return
/// immediately), or unbounded.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SerialTimeout {
    Seconds(f64),
    NonBlocking,
    Infinite,
}

impl SerialTimeout {
    pub fn as_duration(self) -> Option<std::time::Duration> {
        match self {
            SerialTimeout::Seconds(s) => Some(std::time::Duration::from_secs_f64(s.max(0.0))),
            SerialTimeout::NonBlocking => Some(std::time::Duration::from_secs(0)),
            SerialTimeout::Infinite => None,
        }
    }
}

impl Default for SerialTimeout {
    fn default() -> Self {
        SerialTimeout::Seconds(0.0)
    }
}

/// Serial-line configuration (§3 "Serial Configuration").
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SerialConfig {
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub baud: BaudRate,
    #[serde(default)]
    pub read_timeout: SerialTimeout,
    #[serde(default)]
    pub write_timeout: SerialTimeout,
    /// POSIX-only exclusive access flag; ignored elsewhere.
    #[serde(default)]
    pub exclusive: bool,
    #[serde(default = "default_source_name")]
    pub source_name: String,
}

fn default_source_name() -> String {
    "vedirect".to_string()
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: BaudRate::default(),
            read_timeout: SerialTimeout::default(),
            write_timeout: SerialTimeout::default(),
            exclusive: false,
            source_name: default_source_name(),
        }
    }
}

impl SerialConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(port) = &self.port
            && !is_valid_port_path(port)
        {
            return Err(VeError::SerialConf(format!("invalid port path: {port}")));
        }
        if let SerialTimeout::Seconds(s) = self.read_timeout
            && s < 0.0
        {
            return Err(VeError::SerialConf("read_timeout must be >= 0".into()));
        }
        if let SerialTimeout::Seconds(s) = self.write_timeout
            && s < 0.0
        {
            return Err(VeError::SerialConf("write_timeout must be >= 0".into()));
        }
        Ok(())
    }
}
