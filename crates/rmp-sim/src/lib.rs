//! RMP Simulation Library
//!
//! This crate provides stand-ins for both ends of the bridge so the engine
//! can run without panel hardware or a flight simulator:
//!
//! - **MemoryStore**: an in-memory simulator variable store that records
//!   command begin/end activity
//! - **VirtualPanel**: a simulated RMP speaking the panel side of the line
//!   protocol, with injectable link failures
//!
//! # Example
//!
//! ```rust
//! use rmp_engine::{EndpointSource, EngineConfig, Plugin, RmpHost};
//! use rmp_sim::{MemoryStore, VirtualConnector, VirtualPanel};
//!
//! let config = EngineConfig::default();
//! let sim = MemoryStore::with_bindings(&config.bindings);
//! let panel = VirtualPanel::new();
//!
//! let mut host = RmpHost::new(
//!     config,
//!     VirtualConnector::new(panel.clone()),
//!     sim,
//!     EndpointSource::Fixed("virtual".into()),
//! );
//! host.start().unwrap();
//! host.enable().unwrap();
//!
//! panel.tune_standby(122_800);
//! host.flight_loop();
//!
//! assert_eq!(panel.heartbeats().len(), 1);
//! ```

pub mod panel;
pub mod store;

pub use panel::{VirtualConnector, VirtualPanel, VirtualPanelTransport};
pub use store::{CommandEvent, MemoryStore};
