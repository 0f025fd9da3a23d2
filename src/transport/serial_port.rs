// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The default [`Transport`] backend, over the `serialport` crate.

use std::time::Duration;

use crate::cfg::serial_config::{SerialConfig, SerialTimeout};
use crate::error::{Result, VeError};
use crate::transport::Transport;

pub struct SerialPortTransport {
    config: SerialConfig,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialPortTransport {
    pub fn new(config: SerialConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, port: None })
    }

    fn duration_or_zero(timeout: SerialTimeout) -> Duration {
        timeout.as_duration().unwrap_or(Duration::from_secs(3600 * 24))
    }
}

impl Transport for SerialPortTransport {
    fn open(&mut self) -> Result<()> {
        let port_path = self
            .config
            .port
            .clone()
            .ok_or_else(|| VeError::SerialConf("no port configured".into()))?;

        let built = serialport::new(&port_path, self.config.baud.as_u32())
            .timeout(Self::duration_or_zero(self.config.read_timeout));

        #[cfg(unix)]
        let built = built.exclusive(self.config.exclusive);

        let opened = built.open().map_err(|e| VeError::SerialVe {
            port: port_path.clone(),
            message: e.to_string(),
        })?;

        self.port = Some(opened);
        if !self.is_ready() {
            return Err(VeError::OpenSerialVe(port_path));
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or_else(|| {
            VeError::SerialConnection("read attempted before open".into())
        })?;
        match port.read(buf) {
            Ok(n) => Ok(n),
            // A plain timeout with zero bytes available is "no data yet",
            // not a transport fault.
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(VeError::SerialVe {
                port: self.config.source_name.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let port = self.port.as_mut().ok_or_else(|| {
            VeError::SerialConnection("write attempted before open".into())
        })?;
        port.write(data).map_err(|e| VeError::SerialVe {
            port: self.config.source_name.clone(),
            message: e.to_string(),
        })
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(port) = self.port.as_mut() {
            port.flush().map_err(|e| VeError::SerialVe {
                port: self.config.source_name.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.port = None;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.port.is_some()
    }

    fn source_name(&self) -> &str {
        &self.config.source_name
    }

    fn list_ports(&self) -> Vec<String> {
        serialport::available_ports()
            .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
            .unwrap_or_default()
    }
}
