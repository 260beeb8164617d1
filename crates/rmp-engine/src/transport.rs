//! Byte transport to the panel
//!
//! The engine only needs short, non-blocking reads and best-effort writes.
//! [`SerialTransport`] provides them over a serial port by using a very short
//! port timeout and reporting a timed-out read as "nothing available".

use std::io::{self, Read, Write};

use serialport::SerialPort;
use tracing::{debug, info};

use crate::config::SerialConfig;
use crate::error::EngineError;

/// Duplex byte channel to the panel
pub trait Transport: Send {
    /// Read whatever is available; `Ok(0)` means nothing right now
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write once, returning how many bytes were accepted
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Release the underlying handle
    fn close(&mut self);
}

/// Opens transports by endpoint name
pub trait Connector {
    fn open(&mut self, endpoint: &str) -> Result<Box<dyn Transport>, EngineError>;
}

/// Serial connection to the panel
pub struct SerialTransport {
    /// Port name
    name: String,
    /// Open port, `None` once closed
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Open `port_name` with the given settings
    pub fn open(port_name: &str, config: &SerialConfig) -> Result<Self, EngineError> {
        let port = serialport::new(port_name, config.baud_rate)
            .timeout(config.timeout())
            .open()
            .map_err(|e| EngineError::TransportOpen {
                endpoint: port_name.to_string(),
                reason: e.to_string(),
            })?;

        info!("Opened {} @ {}", port_name, config.baud_rate);
        Ok(Self {
            name: port_name.to_string(),
            port: Some(port),
        })
    }

    /// Port name
    pub fn name(&self) -> &str {
        &self.name
    }

    fn port(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "port closed"))
    }
}

impl Transport for SerialTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.port()?.read(buf) {
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                ) =>
            {
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.port()?.write(data)
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            debug!("Closed {}", self.name);
        }
    }
}

/// Opens [`SerialTransport`]s with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct SerialConnector {
    config: SerialConfig,
}

impl SerialConnector {
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }
}

impl Connector for SerialConnector {
    fn open(&mut self, endpoint: &str) -> Result<Box<dyn Transport>, EngineError> {
        Ok(Box::new(SerialTransport::open(endpoint, &self.config)?))
    }
}
