// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The VE.Direct byte-level state machine (component C1).
//!
//! Feeds one byte at a time, accumulating an ordered key/value map, and
//! returns a completed [`Packet`] once a frame's checksum byte closes the sum
//! to zero modulo 256.

pub mod state;

use indexmap::IndexMap;

use crate::error::{Result, VeError};

pub use state::State;

pub const HEADER1: u8 = 0x0D; // '\r'
pub const HEADER2: u8 = 0x0A; // '\n'
pub const HEXMARK: u8 = 0x3A; // ':'
pub const TAB: u8 = 0x09; // '\t'

pub const DEFAULT_MAX_BLOCKS_PER_PACKET: u32 = 18;
pub const CHECKSUM_KEY: &str = "Checksum";

/// An ordered label → raw-value map, insertion order preserved.
pub type Packet = IndexMap<String, String>;

/// Streaming VE.Direct frame decoder.
pub struct Decoder {
    state: State,
    key: Vec<u8>,
    value: Vec<u8>,
    sum: u32,
    map: Packet,
    max_blocks_per_packet: Option<u32>,
}

impl Decoder {
    /// `max_blocks_per_packet`: `None` disables the limit, `Some(0)` is
    /// rejected.
    pub fn new(max_blocks_per_packet: Option<u32>) -> Result<Self> {
        if max_blocks_per_packet == Some(0) {
            return Err(VeError::setting_invalid(
                "max_blocks_per_packet must be > 0 or disabled",
            ));
        }
        Ok(Self {
            state: State::WaitHeader,
            key: Vec::new(),
            value: Vec::new(),
            sum: 0,
            map: Packet::new(),
            max_blocks_per_packet,
        })
    }

    pub fn with_default_limit() -> Self {
        Self::new(Some(DEFAULT_MAX_BLOCKS_PER_PACKET)).expect("default limit is valid")
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Resets scratch buffers and state; called after every delivered packet
    /// and every recoverable error.
    fn reset(&mut self) {
        self.state = State::WaitHeader;
        self.key.clear();
        self.value.clear();
        self.sum = 0;
        self.map = Packet::new();
    }

    fn push_ascii(buf: &mut Vec<u8>, byte: u8) -> Result<()> {
        if !byte.is_ascii() {
            return Err(VeError::input_read(
                format!("non-ascii byte 0x{byte:02x} in field"),
                1,
            ));
        }
        buf.push(byte);
        Ok(())
    }

    /// Feeds a single byte; returns `Some(packet)` once a frame closes with a
    /// valid checksum.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>> {
        if byte == HEXMARK && self.state != State::InChecksum {
            self.state = State::Hex;
            return Ok(None);
        }

        match self.state {
            State::WaitHeader => {
                self.sum = self.sum.wrapping_add(byte as u32);
                if byte == HEADER2 {
                    self.state = State::InKey;
                }
                // HEADER1 and any other byte (including 0x00) are a no-op.
                Ok(None)
            }
            State::InKey => {
                self.sum = self.sum.wrapping_add(byte as u32);
                match byte {
                    TAB => {
                        self.state = if self.key == CHECKSUM_KEY.as_bytes() {
                            State::InChecksum
                        } else {
                            State::InValue
                        };
                        Ok(None)
                    }
                    HEADER1 | HEADER2 => {
                        self.reset();
                        Err(VeError::packet_read("unexpected header byte in key", 1))
                    }
                    _ => {
                        if let Err(e) = Self::push_ascii(&mut self.key, byte) {
                            self.reset();
                            return Err(e);
                        }
                        Ok(None)
                    }
                }
            }
            State::InValue => {
                self.sum = self.sum.wrapping_add(byte as u32);
                match byte {
                    HEADER1 => {
                        if let Some(limit) = self.max_blocks_per_packet
                            && self.map.len() as u32 >= limit
                        {
                            self.reset();
                            return Err(VeError::packet_read("max blocks per packet exceeded", 1));
                        }
                        let key = String::from_utf8(std::mem::take(&mut self.key))
                            .expect("key bytes validated ascii");
                        let value = String::from_utf8(std::mem::take(&mut self.value))
                            .expect("value bytes validated ascii");
                        self.map.insert(key, value);
                        self.state = State::WaitHeader;
                        Ok(None)
                    }
                    HEADER2 => {
                        self.reset();
                        Err(VeError::packet_read("unexpected header byte in value", 1))
                    }
                    _ => {
                        if let Err(e) = Self::push_ascii(&mut self.value, byte) {
                            self.reset();
                            return Err(e);
                        }
                        Ok(None)
                    }
                }
            }
            State::InChecksum => {
                self.sum = self.sum.wrapping_add(byte as u32);
                let remainder = self.sum % 256;
                if remainder == 0 {
                    let packet = std::mem::take(&mut self.map);
                    self.reset();
                    Ok(Some(packet))
                } else {
                    self.reset();
                    Err(VeError::packet_read(format!("checksum mismatch, remainder {remainder}"), 1))
                }
            }
            State::Hex => {
                self.sum = 0;
                if byte == HEADER2 {
                    self.state = State::WaitHeader;
                }
                Ok(None)
            }
        }
    }
}
