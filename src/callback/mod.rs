// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Callback-driven continuous reader (C3): repeatedly drives the packet
//! reader and delivers packets to a user callback at a paced cadence.

use std::time::{Duration, Instant};

use crate::cfg::reader_options::{CallbackOptions, ReadBudgets};
use crate::decoder::Packet;
use crate::error::{Result, VeError};
use crate::reader::Reader;
use crate::transport::Transport;

/// Runs `cb` for every packet `reader` produces until `options.max_loops` is
/// reached or an unrecoverable error surfaces.
pub fn read_callback<T, F>(reader: &mut Reader<T>, options: &CallbackOptions, mut cb: F) -> Result<u64>
where
    T: Transport,
    F: FnMut(&Packet),
{
    options.validate()?;
    let budgets = ReadBudgets {
        timeout_secs: options.timeout_secs,
        max_block_errors: options.max_block_errors,
        max_packet_errors: options.max_packet_errors,
        ..Default::default()
    };
    let sleep_time = Duration::from_secs_f64(options.sleep_time_secs);
    let mut delivered = 0u64;

    loop {
        if let Some(max) = options.max_loops
            && delivered >= max
        {
            return Ok(delivered);
        }

        let read_start = Instant::now();
        let packet = match reader.read_one(&budgets) {
            Ok(p) => p,
            Err(e @ VeError::PacketRead { .. }) => {
                // Counted and thresholded inside `read_one`; a propagated
                // PacketRead here means the budget was already exhausted.
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        let read_elapsed = read_start.elapsed();

        let cb_start = Instant::now();
        cb(&packet);
        let cb_elapsed = cb_start.elapsed();

        delivered += 1;

        // §4.3 defines the remainder as `sleep_time − callback_time −
        // (bytes_read_in_this_packet × bit_time)`; that's an estimate of
        // time already spent sleeping inside the read. Using the read's own
        // measured wall time in its place is equivalent when the read
        // doesn't block waiting on the transport, and more accurate than
        // the byte-count estimate when it does (the read's sleeps are
        // counted exactly rather than approximated), so this reader
        // subtracts `read_elapsed` as a whole instead of threading a byte
        // count and bit_time out of `Reader`.
        let spent = read_elapsed + cb_elapsed;
        if spent < sleep_time {
            std::thread::sleep(sleep_time - spent);
        }
    }
}
