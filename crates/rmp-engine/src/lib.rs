//! RMP Bridge Engine
//!
//! This crate drives the link between a radio management panel and the
//! flight simulator's radio and trim state.
//!
//! # Architecture
//!
//! The host calls [`ProtocolEngine::tick`] from its periodic scheduler. Each
//! tick runs to completion without blocking:
//!
//! 1. The trim debounce timer advances, releasing a held trim command once the
//!    wheel has been quiet long enough
//! 2. A heartbeat is written if one is due or the radios changed in the sim
//! 3. Whatever the panel sent is read, framed, decoded and applied
//!
//! Any transport failure latches the engine into a faulted state for the rest
//! of the session. The returned delay then switches to a long backoff so the
//! host polls a dead link rarely. Only re-enabling the session clears it.
//!
//! # Example
//!
//! ```rust,no_run
//! use rmp_engine::{EndpointSource, EngineConfig, Plugin, RmpHost, SerialConfig, SerialConnector};
//! use rmp_sim::MemoryStore;
//!
//! let config = EngineConfig::default();
//! let sim = MemoryStore::with_bindings(&config.bindings);
//! let mut host = RmpHost::new(
//!     config,
//!     SerialConnector::new(SerialConfig::default()),
//!     sim,
//!     EndpointSource::File("rmpif.cfg".into()),
//! );
//! host.start().unwrap();
//! host.enable().unwrap();
//!
//! let next_delay = host.flight_loop();
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod sim;
pub mod state;
pub mod transport;
pub mod trim;

pub use config::{read_endpoint, EngineConfig, SerialConfig};
pub use engine::ProtocolEngine;
pub use error::{ConfigError, EngineError};
pub use host::{EndpointSource, Plugin, RmpHost, INITIAL_DELAY, VERSION};
pub use sim::{SimBindings, SimulatorStore};
pub use state::RadioMirror;
pub use transport::{Connector, SerialConnector, SerialTransport, Transport};
pub use trim::{TrimAction, TrimDebounce, TrimDirection, DEFAULT_TRIM_RELOAD};
