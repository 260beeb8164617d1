//! Host lifecycle adapter
//!
//! Wraps the engine in the start / enable / flight loop / disable / stop
//! lifecycle a simulator plugin host drives. The scheduler only ever sees
//! [`Plugin::flight_loop`] and the delay it returns.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::{read_endpoint, EngineConfig};
use crate::engine::ProtocolEngine;
use crate::error::EngineError;
use crate::sim::SimulatorStore;
use crate::transport::Connector;

/// Bridge version reported at startup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Delay before the first flight loop call after registration
pub const INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Lifecycle hooks a plugin host calls
pub trait Plugin {
    /// One-time startup; failure leaves the plugin disabled
    fn start(&mut self) -> Result<(), EngineError>;

    /// Open the link; failure means the flight loop must not be scheduled
    fn enable(&mut self) -> Result<(), EngineError>;

    /// One scheduler tick, returning the delay until the next call
    fn flight_loop(&mut self) -> Duration;

    /// Close the link
    fn disable(&mut self);

    /// Final shutdown
    fn stop(&mut self);
}

/// Where the transport endpoint comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointSource {
    /// First line of a text file, read on every enable
    File(PathBuf),
    /// Fixed endpoint name
    Fixed(String),
}

impl EndpointSource {
    fn resolve(&self) -> Result<String, EngineError> {
        match self {
            EndpointSource::File(path) => Ok(read_endpoint(path)?),
            EndpointSource::Fixed(endpoint) => Ok(endpoint.clone()),
        }
    }
}

/// The bridge as a plugin: engine, simulator store and transport connector
pub struct RmpHost<C, S> {
    engine: ProtocolEngine,
    connector: C,
    sim: S,
    endpoint: EndpointSource,
    started: bool,
}

impl<C: Connector, S: SimulatorStore> RmpHost<C, S> {
    pub fn new(config: EngineConfig, connector: C, sim: S, endpoint: EndpointSource) -> Self {
        Self {
            engine: ProtocolEngine::new(config),
            connector,
            sim,
            endpoint,
            started: false,
        }
    }

    /// Get the engine
    pub fn engine(&self) -> &ProtocolEngine {
        &self.engine
    }

    /// Get the simulator store
    pub fn sim(&self) -> &S {
        &self.sim
    }

    /// Get a mutable reference to the simulator store
    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    /// Get the connector
    pub fn connector_mut(&mut self) -> &mut C {
        &mut self.connector
    }

    /// Run one flight loop tick at `now`
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        self.engine.tick_at(&mut self.sim, now)
    }
}

impl<C: Connector, S: SimulatorStore> Plugin for RmpHost<C, S> {
    fn start(&mut self) -> Result<(), EngineError> {
        info!("startup {}", VERSION);

        if let Err(e) = self.engine.config().bindings.verify(&self.sim) {
            error!("{}, disabled", e);
            return Err(e);
        }

        self.started = true;
        Ok(())
    }

    fn enable(&mut self) -> Result<(), EngineError> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }

        let endpoint = self.endpoint.resolve().inspect_err(|e| error!("{}", e))?;
        info!("rmpif port is ->{}<-", endpoint);

        match self.connector.open(&endpoint) {
            Ok(transport) => {
                self.engine.attach(transport);
                info!("port opened");
                Ok(())
            }
            Err(e) => {
                error!("{}", e);
                self.engine.latch_fault();
                Err(e)
            }
        }
    }

    fn flight_loop(&mut self) -> Duration {
        self.engine.tick(&mut self.sim)
    }

    fn disable(&mut self) {
        if self.engine.is_attached() {
            info!("port closed");
        }
        self.engine.detach(&mut self.sim);
    }

    fn stop(&mut self) {
        self.disable();
        self.started = false;
    }
}
