// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The byte-stream transport boundary (§6). The core depends only on this
//! trait; [`serial_port::SerialPortTransport`] is the one concrete backend
//! shipped for real hardware, and the test harness supplies a second
//! implementation over an in-memory/virtual pair.

pub mod port_path;
pub mod serial_port;

use crate::error::Result;

/// A byte-stream endpoint. Implementations are expected to be configured for
/// non-blocking or very-short-timeout reads: a read returning zero bytes
/// means "no data yet", not EOF.
pub trait Transport {
    /// Opens (or re-opens) the underlying device.
    fn open(&mut self) -> Result<()>;

    /// Reads up to `buf.len()` bytes, returning the number actually read.
    /// Zero is a valid, non-error result.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Writes `data`, returning the number of bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Flushes any buffered output.
    fn flush(&mut self) -> Result<()>;

    /// Closes the device. Idempotent.
    fn close(&mut self) -> Result<()>;

    /// True once `open` succeeded and `close` has not since been called.
    fn is_ready(&self) -> bool;

    /// The port path or other human-readable source identifier.
    fn source_name(&self) -> &str;

    /// Lists candidate ports this transport family could open.
    fn list_ports(&self) -> Vec<String>;
}
