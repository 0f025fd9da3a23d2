// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The typed error taxonomy shared by every component of the decoder.
//!
//! Upstream (Python) code raises one exception per failure and lets callers
//! catch broad classes of them. Here every failure is a variant of one
//! [`VeError`] enum so callers can match exhaustively instead of downcasting.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, VeError>;

/// All failure modes the core can produce.
#[derive(Debug, Error)]
pub enum VeError {
    /// A configuration value is out of range, malformed, or an identity-spec
    /// variant tag is unrecognized.
    #[error("invalid setting: {0}")]
    SettingInvalid(String),

    /// A single byte caused an unexpected decode error (non-ASCII where ASCII
    /// was required, or an impossible state transition).
    #[error("input read error (block_errors={block_errors}): {message}")]
    InputRead { message: String, block_errors: u32 },

    /// A framing violation: bad header byte, checksum mismatch, or block
    /// count overrun.
    #[error("packet read error (packet_errors={packet_errors}): {message}")]
    PacketRead { message: String, packet_errors: u32 },

    /// A wall-clock budget was exceeded.
    #[error("read timeout after {elapsed_secs:.3}s (budget {timeout_secs:.3}s)")]
    ReadTimeout { elapsed_secs: f64, timeout_secs: f64 },

    /// Transport configuration was rejected (bad baud, invalid port syntax,
    /// bad timeout value).
    #[error("serial configuration rejected: {0}")]
    SerialConf(String),

    /// Transport I/O failed (device removed, permission denied, OS error).
    #[error("serial I/O error on {port}: {message}")]
    SerialVe { port: String, message: String },

    /// The transport was opened but is not actually usable.
    #[error("serial port opened but not ready: {0}")]
    OpenSerialVe(String),

    /// No usable transport is available and no recovery was attempted.
    #[error("no serial connection available: {0}")]
    SerialConnection(String),
}

impl VeError {
    pub fn setting_invalid(msg: impl Into<String>) -> Self {
        Self::SettingInvalid(msg.into())
    }

    pub fn input_read(msg: impl Into<String>, block_errors: u32) -> Self {
        Self::InputRead { message: msg.into(), block_errors }
    }

    pub fn packet_read(msg: impl Into<String>, packet_errors: u32) -> Self {
        Self::PacketRead { message: msg.into(), packet_errors }
    }

    pub fn read_timeout(elapsed_secs: f64, timeout_secs: f64) -> Self {
        Self::ReadTimeout { elapsed_secs, timeout_secs }
    }

    /// True for the classes that a reconnect controller should try to
    /// recover from.
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, Self::SerialVe { .. } | Self::OpenSerialVe(_) | Self::SerialConnection(_))
    }
}
