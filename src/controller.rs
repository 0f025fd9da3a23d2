// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Top-level composition: owns a [`Reader`] over the default serial
//! transport, an optional [`ReconnectController`], and a packet
//! [`Aggregator`], wiring C2 through C6 together the way a caller actually
//! uses the library.

use crate::aggregator::{Aggregator, RoundReader};
use crate::cfg::aggregator_config::{AggregatorConfig, ReconnectConfig};
use crate::cfg::reader_options::{CallbackOptions, ReadBudgets};
use crate::cfg::serial_config::SerialConfig;
use crate::decoder::Packet;
use crate::discovery::ReconnectController;
use crate::error::Result;
use crate::reader::Reader;
use crate::transport::Transport;
use crate::transport::serial_port::SerialPortTransport;

type OpenFn = Box<dyn Fn(&str) -> Result<SerialPortTransport>>;

pub struct VedirectController {
    reader: Reader<SerialPortTransport>,
    reconnect: Option<ReconnectController<SerialPortTransport, OpenFn>>,
    aggregator: Aggregator,
    read_budgets: ReadBudgets,
}

impl VedirectController {
    pub fn new(
        serial: SerialConfig,
        read_budgets: ReadBudgets,
        aggregator_config: AggregatorConfig,
        reconnect_config: Option<ReconnectConfig>,
    ) -> Result<Self> {
        serial.validate()?;
        let mut transport = SerialPortTransport::new(serial.clone())?;
        transport.open()?;
        let reader = Reader::new(transport, serial.baud, &read_budgets)?;
        let aggregator = Aggregator::new(aggregator_config)?;

        let reconnect = reconnect_config
            .map(|rc| {
                let template = serial.clone();
                let open: OpenFn = Box::new(move |port: &str| {
                    let mut cfg = template.clone();
                    cfg.port = Some(port.to_string());
                    SerialPortTransport::new(cfg)
                });
                ReconnectController::new(rc, serial.clone(), open)
            })
            .transpose()?;

        Ok(Self { reader, reconnect, aggregator, read_budgets })
    }

    pub fn is_ready(&self) -> bool {
        self.reader.is_ready()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.reader.flush()
    }

    pub fn close(&mut self) -> Result<()> {
        self.reader.close()
    }

    pub fn read_one_packet(&mut self) -> Result<Packet> {
        self.reader.read_one(&self.read_budgets)
    }

    pub fn read_packets<F: FnMut(&Packet)>(&mut self, options: &CallbackOptions, cb: F) -> Result<u64> {
        crate::callback::read_callback(&mut self.reader, options, cb)
    }

    /// Aggregated round (C6), recovering from transport faults via the
    /// reconnect controller when one is configured.
    pub fn read_round(&mut self, timeout_secs: f64) -> Result<(Option<Packet>, bool)> {
        let mut adapter = ControllerRoundReader { reader: &mut self.reader, reconnect: &self.reconnect };
        self.aggregator.read(&mut adapter, timeout_secs)
    }

    pub fn aggregator_stats(&self) -> &crate::stats::PacketStats {
        self.aggregator.stats()
    }
}

struct ControllerRoundReader<'a> {
    reader: &'a mut Reader<SerialPortTransport>,
    reconnect: &'a Option<ReconnectController<SerialPortTransport, OpenFn>>,
}

impl RoundReader for ControllerRoundReader<'_> {
    fn read_serial_data(&mut self, timeout_secs: f64) -> Result<Packet> {
        let budgets = ReadBudgets { timeout_secs, ..Default::default() };
        match self.reader.read_one(&budgets) {
            Ok(p) => Ok(p),
            Err(e) if e.is_transport_fault() => {
                if let Some(controller) = self.reconnect {
                    controller.wait_or_search(self.reader)?;
                    self.reader.read_one(&budgets)
                } else {
                    Err(e)
                }
            }
            Err(e) => Err(e),
        }
    }
}
