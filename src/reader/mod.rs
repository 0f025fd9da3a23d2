// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Packet reader (C2): drives the decoder with bytes from a transport,
//! bounding timeouts and per-call error counts.

use std::time::{Duration, Instant};

use crate::cfg::reader_options::ReadBudgets;
use crate::cfg::serial_config::BaudRate;
use crate::counters::{Counter, ErrorBudget};
use crate::decoder::{Decoder, Packet};
use crate::error::{Result, VeError};
use crate::transport::Transport;

/// Drives a [`Decoder`] over a [`Transport`], one byte at a time.
pub struct Reader<T: Transport> {
    transport: T,
    decoder: Decoder,
    bit_time: Duration,
    pub block_errors: Counter,
    pub packet_errors: Counter,
    pub timeouts: Counter,
    pub packets: Counter,
}

impl<T: Transport> Reader<T> {
    pub fn new(transport: T, baud: BaudRate, budgets: &ReadBudgets) -> Result<Self> {
        budgets.validate()?;
        Ok(Self {
            transport,
            decoder: Decoder::new(Some(budgets.max_blocks_per_packet))?,
            bit_time: Duration::from_secs_f64(baud.bit_time_secs()),
            block_errors: Counter::new(),
            packet_errors: Counter::new(),
            timeouts: Counter::new(),
            packets: Counter::new(),
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Reads exactly one packet, honoring the timeout and error budgets in
    /// `budgets`. Error counters (`block_errors`, `packet_errors`) persist
    /// across calls on this reader so a caller can enforce a total-error
    /// ceiling across many packets if desired; reset them explicitly between
    /// rounds if per-round counting is wanted instead.
    pub fn read_one(&mut self, budgets: &ReadBudgets) -> Result<Packet> {
        let block_budget = ErrorBudget::new(budgets.max_block_errors);
        let packet_budget = ErrorBudget::new(budgets.max_packet_errors);
        let timeout = Duration::from_secs_f64(budgets.timeout_secs);
        let start = Instant::now();
        let mut byte = [0u8; 1];

        loop {
            let n = self.transport.read(&mut byte)?;
            if n == 1 {
                match self.decoder.feed(byte[0]) {
                    Ok(Some(packet)) => {
                        self.packets.increment();
                        return Ok(packet);
                    }
                    Ok(None) => {}
                    Err(VeError::InputRead { .. }) => {
                        let count = self.block_errors.increment();
                        if block_budget.is_exhausted(count) {
                            return Err(VeError::input_read("block error budget exhausted", count as u32));
                        }
                    }
                    Err(VeError::PacketRead { .. }) => {
                        let count = self.packet_errors.increment();
                        if packet_budget.is_exhausted(count) {
                            return Err(VeError::packet_read("packet error budget exhausted", count as u32));
                        }
                    }
                    Err(other) => return Err(other),
                }
            } else if !self.bit_time.is_zero() {
                std::thread::sleep(self.bit_time);
            }

            let elapsed = start.elapsed();
            if elapsed > timeout {
                self.timeouts.increment();
                return Err(VeError::read_timeout(elapsed.as_secs_f64(), timeout.as_secs_f64()));
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.transport.is_ready()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.transport.flush()
    }

    pub fn close(&mut self) -> Result<()> {
        self.transport.close()
    }
}
