// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Packet aggregator (C6): coalesces a device's multi-packet round into one
//! cached snapshot and tracks per-packet structural statistics.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::cfg::aggregator_config::AggregatorConfig;
use crate::cfg::reader_options::ReadBudgets;
use crate::decoder::Packet;
use crate::error::Result;
use crate::stats::PacketStats;
use crate::transport::Transport;

/// Whatever layer can actually perform a single read and, on a transport
/// fault, try to recover. The controller (`src/controller.rs`) implements
/// this over a [`crate::reader::Reader`] plus a reconnect controller; tests
/// can substitute a simpler fake.
pub trait RoundReader {
    fn read_serial_data(&mut self, timeout_secs: f64) -> Result<Packet>;
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    at: Instant,
    closed_at_unix_secs: u64,
    packet: Packet,
}

/// C6 "VePackets": merges one round of packets into a coherent snapshot.
pub struct Aggregator {
    config: AggregatorConfig,
    cache: Option<CachedSnapshot>,
    stats: PacketStats,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        config.validate()?;
        let stats = PacketStats::new(config.accepted_keys.clone(), config.max_read_error);
        Ok(Self { config, cache: None, stats })
    }

    pub fn stats(&self) -> &PacketStats {
        &self.stats
    }

    fn now_unix_secs() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
    }

    /// Reads (or returns a cached) aggregated snapshot. Returns
    /// `(snapshot, from_cache)`; `snapshot` is `None` only when a fresh round
    /// produced no data at all.
    pub fn read<R: RoundReader>(&mut self, reader: &mut R, timeout_secs: f64) -> Result<(Option<Packet>, bool)> {
        if let Some(cached) = &self.cache
            && cached.at.elapsed().as_secs_f64() < self.config.min_interval_secs
        {
            return Ok((Some(cached.packet.clone()), true));
        }
        self.cache = None;

        let mut merged = Packet::new();
        let mut observed = 0u32;
        for i in 0..self.config.nb_packets_per_round {
            match reader.read_serial_data(timeout_secs) {
                Ok(packet) => {
                    self.stats.set_packet_stats(i as usize, &packet);
                    merged.extend(packet);
                    observed += 1;
                }
                Err(_) => {
                    self.stats.record_serial_read_error();
                }
            }
        }

        if !merged.is_empty() {
            self.cache = Some(CachedSnapshot {
                at: Instant::now(),
                closed_at_unix_secs: Self::now_unix_secs(),
                packet: merged.clone(),
            });
            if observed > 0 {
                self.config.nb_packets_per_round = observed.clamp(1, 20);
            }
        }

        self.stats.has_reached_max_errors(true)?;

        if merged.is_empty() {
            Ok((None, false))
        } else {
            Ok((Some(merged), false))
        }
    }

    /// Wall-clock timestamp (seconds since epoch) the cached snapshot was
    /// closed at, if any.
    pub fn cached_at_unix_secs(&self) -> Option<u64> {
        self.cache.as_ref().map(|c| c.closed_at_unix_secs)
    }
}

/// Convenience `RoundReader` wrapping a plain `Reader<T>` with no
/// reconnection behavior (used when no [`crate::discovery::ReconnectController`]
/// is configured).
pub struct DirectRoundReader<'a, T: Transport> {
    pub reader: &'a mut crate::reader::Reader<T>,
}

impl<T: Transport> RoundReader for DirectRoundReader<'_, T> {
    fn read_serial_data(&mut self, timeout_secs: f64) -> Result<Packet> {
        let budgets = ReadBudgets { timeout_secs, ..Default::default() };
        self.reader.read_one(&budgets)
    }
}
