// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Port discovery and auto-reconnect controller (C5).

use std::time::{Duration, Instant};

use crate::cfg::aggregator_config::ReconnectConfig;
use crate::cfg::serial_config::{BaudRate, SerialConfig};
use crate::error::{Result, VeError};
use crate::identity::read_to_test;
use crate::reader::Reader;
use crate::transport::Transport;
use crate::transport::port_path::discover_virtual_modems;

/// Drives reconnection attempts for a [`Reader`] whose transport can be
/// rebuilt from a [`SerialConfig`] template plus a concrete port path.
///
/// `Open` constructs a fresh transport bound to one candidate port; kept
/// generic so tests can substitute an in-memory transport family.
pub struct ReconnectController<T: Transport, Open>
where Open: Fn(&str) -> Result<T>
{
    config: ReconnectConfig,
    open: Open,
    serial_template: SerialConfig,
}

impl<T: Transport, Open> ReconnectController<T, Open>
where Open: Fn(&str) -> Result<T>
{
    pub fn new(config: ReconnectConfig, serial_template: SerialConfig, open: Open) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, open, serial_template })
    }

    fn enumerate_candidate_ports(&self, reader: &Reader<T>) -> Vec<String> {
        let mut ports = reader.transport().list_ports();
        ports.extend(discover_virtual_modems());
        ports.sort();
        ports.dedup();
        ports
    }

    /// Enumerates candidate ports, opens and probes each, and on the first
    /// one whose decoded data passes the configured identity spec, rebinds
    /// `reader`'s transport to it. Returns `Ok(true)` on success, raises
    /// `ReadTimeout` if no port validates within the budget.
    pub fn wait_or_search(&self, reader: &mut Reader<T>) -> Result<bool> {
        let timeout = Duration::from_secs_f64(self.config.reconnect_timeout_secs);
        let sleep_between = Duration::from_secs_f64(self.config.sleep_between_tries_secs.max(0.0));
        let start = Instant::now();

        loop {
            for port in self.enumerate_candidate_ports(reader) {
                let budgets = crate::cfg::reader_options::ReadBudgets {
                    timeout_secs: 2.0,
                    ..Default::default()
                };
                let mut candidate_reader = match (self.open)(&port) {
                    Ok(mut t) => {
                        if t.open().is_err() {
                            continue;
                        }
                        match Reader::new(t, self.serial_template.baud, &budgets) {
                            Ok(r) => r,
                            Err(_) => continue,
                        }
                    }
                    Err(_) => continue,
                };

                if let Ok(packet) = read_to_test(&mut candidate_reader)
                    && self.config.identity.matches(&packet)
                {
                    let _ = reader.close();
                    *reader = candidate_reader;
                    return Ok(true);
                }
            }

            if start.elapsed() > timeout {
                return Err(VeError::read_timeout(start.elapsed().as_secs_f64(), timeout.as_secs_f64()));
            }
            std::thread::sleep(sleep_between);
        }
    }
}
