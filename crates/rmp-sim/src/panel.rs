//! Virtual radio management panel
//!
//! Plays the panel side of the line protocol over an in-memory link. The
//! [`VirtualPanel`] handle and the [`VirtualPanelTransport`] handed to the
//! engine share one link, so a test can keep driving the panel after the
//! engine owns the transport.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rmp_engine::{Connector, EngineError, Transport, TrimDirection};
use rmp_protocol::{Heartbeat, LineAssembler};
use tracing::debug;

#[derive(Debug, Default)]
struct Link {
    /// Panel → bridge bytes not yet read
    inbound: VecDeque<u8>,
    /// Bridge → panel bytes not yet consumed by the panel
    outbound: Vec<u8>,
    /// Frames bridge output into lines for the panel
    received: LineAssembler,
    fail_reads: bool,
    fail_writes: bool,
    short_writes: bool,
    closed: bool,
    reads: usize,
    writes: usize,
}

/// Handle to a simulated panel
#[derive(Debug, Clone, Default)]
pub struct VirtualPanel {
    link: Arc<Mutex<Link>>,
}

impl VirtualPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn link(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Transport end to hand to the engine
    pub fn transport(&self) -> VirtualPanelTransport {
        self.link().closed = false;
        VirtualPanelTransport {
            link: self.link.clone(),
        }
    }

    /// Queue raw bytes from the panel
    pub fn send_bytes(&self, data: &[u8]) {
        self.link().inbound.extend(data);
    }

    /// Queue one line from the panel, terminated the way the firmware does
    pub fn send_line(&self, line: &str) {
        let mut link = self.link();
        link.inbound.extend(line.as_bytes());
        link.inbound.extend(b"\r\n");
    }

    /// Firmware debug output
    pub fn debug(&self, text: &str) {
        self.send_line(&format!("D{}", text));
    }

    /// Standby frequency knob turned
    pub fn tune_standby(&self, standby: i32) {
        self.send_line(&format!("S{:06}_", standby));
    }

    /// Transfer button pressed
    pub fn transfer(&self, active: i32, standby: i32) {
        self.send_line(&format!("X{:06}{:06}_", active, standby));
    }

    /// Trim wheel turned `detents` clicks in `direction`
    pub fn turn_trim(&self, direction: TrimDirection, detents: usize) {
        let line = match direction {
            TrimDirection::Up => "TU_",
            TrimDirection::Down => "TD_",
        };
        for _ in 0..detents {
            self.send_line(line);
        }
    }

    /// Take everything the bridge wrote since the last call
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut self.link().outbound)
    }

    /// Heartbeats the bridge wrote since the last call
    ///
    /// Lines that are not heartbeats are dropped.
    pub fn heartbeats(&self) -> Vec<Heartbeat> {
        let mut link = self.link();
        let output = std::mem::take(&mut link.outbound);
        let heartbeats = link
            .received
            .feed(&output)
            .filter_map(|line| Heartbeat::parse(&line))
            .collect();
        heartbeats
    }

    /// Make every read fail
    pub fn fail_reads(&self, fail: bool) {
        self.link().fail_reads = fail;
    }

    /// Make every write fail
    pub fn fail_writes(&self, fail: bool) {
        self.link().fail_writes = fail;
    }

    /// Accept only half of every write
    pub fn short_writes(&self, short: bool) {
        self.link().short_writes = short;
    }

    /// Number of (reads, writes) the bridge attempted
    pub fn io_count(&self) -> (usize, usize) {
        let link = self.link();
        (link.reads, link.writes)
    }

    /// Whether the bridge closed its end
    pub fn is_closed(&self) -> bool {
        self.link().closed
    }
}

/// The engine's end of a [`VirtualPanel`] link
#[derive(Debug)]
pub struct VirtualPanelTransport {
    link: Arc<Mutex<Link>>,
}

impl VirtualPanelTransport {
    fn link(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for VirtualPanelTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut link = self.link();
        link.reads += 1;
        if link.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "link closed"));
        }
        if link.fail_reads {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "panel unplugged"));
        }

        let n = buf.len().min(link.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(link.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut link = self.link();
        link.writes += 1;
        if link.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "link closed"));
        }
        if link.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "panel unplugged"));
        }

        let n = if link.short_writes {
            data.len() / 2
        } else {
            data.len()
        };
        link.outbound.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn close(&mut self) {
        debug!("Virtual panel link closed");
        self.link().closed = true;
    }
}

/// Connector that always hands out the same virtual panel
#[derive(Debug, Clone, Default)]
pub struct VirtualConnector {
    panel: VirtualPanel,
    fail_open: bool,
    opened: Vec<String>,
}

impl VirtualConnector {
    pub fn new(panel: VirtualPanel) -> Self {
        Self {
            panel,
            fail_open: false,
            opened: Vec::new(),
        }
    }

    /// Make every open fail
    pub fn fail_open(&mut self, fail: bool) {
        self.fail_open = fail;
    }

    /// Endpoints opened so far
    pub fn opened(&self) -> &[String] {
        &self.opened
    }
}

impl Connector for VirtualConnector {
    fn open(&mut self, endpoint: &str) -> Result<Box<dyn Transport>, EngineError> {
        if self.fail_open {
            return Err(EngineError::TransportOpen {
                endpoint: endpoint.to_string(),
                reason: "no such device".to_string(),
            });
        }
        self.opened.push(endpoint.to_string());
        Ok(Box::new(self.panel.transport()))
    }
}
