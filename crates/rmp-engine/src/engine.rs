//! Protocol engine
//!
//! Owns all per-session link state and runs one tick of work per call from
//! the host's scheduler.

use std::time::{Duration, Instant};

use rmp_protocol::{encode_heartbeat, InboundMessage, ProtocolCodec, RmpCodec};
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::sim::SimulatorStore;
use crate::state::RadioMirror;
use crate::transport::Transport;
use crate::trim::{TrimAction, TrimDebounce, TrimDirection};

/// Log target for debug text forwarded from the panel firmware
const PANEL_LOG_TARGET: &str = "rmp_panel";

/// The bridge's link state machine
pub struct ProtocolEngine {
    config: EngineConfig,
    transport: Option<Box<dyn Transport>>,
    codec: RmpCodec,
    mirror: RadioMirror,
    trim: TrimDebounce,
    /// Latched on any transport failure until the next `attach`
    faulted: bool,
    next_heartbeat: Option<Instant>,
    read_buf: Vec<u8>,
}

impl ProtocolEngine {
    /// Create an engine with no transport attached
    pub fn new(config: EngineConfig) -> Self {
        Self {
            codec: RmpCodec::with_line_capacity(config.line_capacity),
            trim: TrimDebounce::new(config.trim_reload_ticks),
            read_buf: vec![0; config.read_chunk.max(1)],
            transport: None,
            mirror: RadioMirror::new(),
            faulted: false,
            next_heartbeat: None,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a transport is attached
    pub fn is_attached(&self) -> bool {
        self.transport.is_some()
    }

    /// Whether the link has faulted this session
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Radio state last agreed with the panel
    pub fn mirror(&self) -> &RadioMirror {
        &self.mirror
    }

    /// Trim direction currently held
    pub fn trim_active(&self) -> Option<TrimDirection> {
        self.trim.active()
    }

    /// Start a new session on `transport`
    ///
    /// Clears the fault flag and all per-session state; the first tick after
    /// this always sends a heartbeat.
    pub fn attach(&mut self, transport: Box<dyn Transport>) {
        if let Some(mut old) = self.transport.replace(transport) {
            old.close();
        }
        self.faulted = false;
        self.codec.clear();
        self.mirror.reset();
        self.trim = TrimDebounce::new(self.config.trim_reload_ticks);
        self.next_heartbeat = None;
    }

    /// End the session, releasing any held trim command
    pub fn detach(&mut self, sim: &mut dyn SimulatorStore) {
        if let Some(action) = self.trim.release() {
            self.apply_trim(sim, action);
        }
        if let Some(mut transport) = self.transport.take() {
            transport.close();
        }
    }

    /// Latch the fault flag, stopping all further link I/O this session
    pub fn latch_fault(&mut self) {
        self.faulted = true;
    }

    /// Run one tick now
    pub fn tick(&mut self, sim: &mut dyn SimulatorStore) -> Duration {
        self.tick_at(sim, Instant::now())
    }

    /// Run one tick at `now`, returning the delay until the next one
    pub fn tick_at(&mut self, sim: &mut dyn SimulatorStore, now: Instant) -> Duration {
        // Runs even when faulted so a held trim command is always released
        if let Some(action) = self.trim.advance() {
            self.apply_trim(sim, action);
        }

        if self.faulted || self.transport.is_none() {
            return self.config.fault_backoff();
        }

        match self.exchange(sim, now) {
            Ok(()) => self.config.tick_interval(),
            Err(e) => {
                error!("{}, link disabled", e);
                self.faulted = true;
                self.config.fault_backoff()
            }
        }
    }

    fn exchange(&mut self, sim: &mut dyn SimulatorStore, now: Instant) -> Result<(), EngineError> {
        let bindings = &self.config.bindings;
        let active = sim.get_int(&bindings.active_frequency);
        let standby = sim.get_int(&bindings.standby_frequency);

        let heartbeat_due = self.next_heartbeat.map_or(true, |at| now > at);
        if heartbeat_due || self.mirror.differs(active, standby) {
            self.send_heartbeat(active, standby)?;
            self.mirror.record(active, standby);
            self.next_heartbeat = Some(now + self.config.heartbeat_interval());
        }

        let n = self.read_available()?;
        if n == 0 {
            return Ok(());
        }

        self.codec.push_bytes(&self.read_buf[..n]);
        while let Some(msg) = self.codec.next_command() {
            self.dispatch(sim, msg);
        }
        Ok(())
    }

    fn send_heartbeat(&mut self, active: i32, standby: i32) -> Result<(), EngineError> {
        let transport = self.transport.as_mut().ok_or(EngineError::NotEnabled)?;
        let line = encode_heartbeat(active, standby);

        let written = transport
            .write(&line)
            .map_err(EngineError::TransportWrite)?;
        if written != line.len() {
            return Err(EngineError::ShortWrite {
                written,
                expected: line.len(),
            });
        }

        debug!("Heartbeat {} / {}", active, standby);
        Ok(())
    }

    fn read_available(&mut self) -> Result<usize, EngineError> {
        let transport = self.transport.as_mut().ok_or(EngineError::NotEnabled)?;
        let n = transport
            .read(&mut self.read_buf)
            .map_err(EngineError::TransportRead)?;
        if n > 0 {
            debug!("Read {} bytes from panel", n);
        }
        Ok(n)
    }

    fn dispatch(&mut self, sim: &mut dyn SimulatorStore, msg: InboundMessage) {
        match msg {
            InboundMessage::DebugText(text) => {
                info!(target: PANEL_LOG_TARGET, "{}", text);
            }
            InboundMessage::SetStandbyFrequency(standby) => {
                debug!("Panel set standby {}", standby);
                sim.set_int(&self.config.bindings.standby_frequency, standby);
                self.mirror.record_standby(standby);
            }
            InboundMessage::SetActiveAndStandbyFrequency(active, standby) => {
                debug!("Panel set active {} standby {}", active, standby);
                let bindings = &self.config.bindings;
                sim.set_int(&bindings.active_frequency, active);
                sim.set_int(&bindings.standby_frequency, standby);
                self.mirror.record(active, standby);
            }
            InboundMessage::TrimTickDown => self.trim_tick(sim, TrimDirection::Down),
            InboundMessage::TrimTickUp => self.trim_tick(sim, TrimDirection::Up),
            InboundMessage::Invalid(raw) => {
                warn!("Invalid message ->{}<- discarded", raw);
            }
        }
    }

    fn trim_tick(&mut self, sim: &mut dyn SimulatorStore, direction: TrimDirection) {
        for action in self.trim.press(direction) {
            self.apply_trim(sim, action);
        }
    }

    fn apply_trim(&self, sim: &mut dyn SimulatorStore, action: TrimAction) {
        match action {
            TrimAction::Begin(direction) => {
                sim.begin_command(self.config.bindings.trim_command(direction));
            }
            TrimAction::End(direction) => {
                debug!("Trim {:?} released", direction);
                sim.end_command(self.config.bindings.trim_command(direction));
            }
        }
    }
}
