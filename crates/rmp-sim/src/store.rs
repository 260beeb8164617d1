//! In-memory simulator variable store

use std::collections::{HashMap, HashSet};

use rmp_engine::{SimBindings, SimulatorStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A begin or end applied to a simulator command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandEvent {
    Begin(String),
    End(String),
}

/// Simulator state held in memory
///
/// Only registered names resolve, so binding checks behave like a real
/// simulator with missing variables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    ints: HashMap<String, i32>,
    commands: HashSet<String>,
    held: HashSet<String>,
    log: Vec<CommandEvent>,
}

impl MemoryStore {
    /// Create an empty store with nothing registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with every name in `bindings` registered
    pub fn with_bindings(bindings: &SimBindings) -> Self {
        let mut store = Self::new();
        store.register_int(&bindings.active_frequency, 0);
        store.register_int(&bindings.standby_frequency, 0);
        store.register_command(&bindings.trim_up);
        store.register_command(&bindings.trim_down);
        store
    }

    /// Register an integer variable with an initial value
    pub fn register_int(&mut self, name: &str, value: i32) {
        self.ints.insert(name.to_string(), value);
    }

    /// Register a command
    pub fn register_command(&mut self, name: &str) {
        self.commands.insert(name.to_string());
    }

    /// Whether a command is currently held
    pub fn is_held(&self, name: &str) -> bool {
        self.held.contains(name)
    }

    /// Command activity so far
    pub fn command_log(&self) -> &[CommandEvent] {
        &self.log
    }

    /// Take and clear the command activity log
    pub fn take_command_log(&mut self) -> Vec<CommandEvent> {
        std::mem::take(&mut self.log)
    }
}

impl SimulatorStore for MemoryStore {
    fn get_int(&self, name: &str) -> i32 {
        self.ints.get(name).copied().unwrap_or_default()
    }

    fn set_int(&mut self, name: &str, value: i32) {
        match self.ints.get_mut(name) {
            Some(slot) => {
                if *slot != value {
                    debug!("{} = {}", name, value);
                }
                *slot = value;
            }
            None => debug!("Ignoring write to unknown variable {}", name),
        }
    }

    fn begin_command(&mut self, name: &str) {
        if self.held.insert(name.to_string()) {
            info!("Begin {}", name);
        }
        self.log.push(CommandEvent::Begin(name.to_string()));
    }

    fn end_command(&mut self, name: &str) {
        if self.held.remove(name) {
            info!("End {}", name);
        }
        self.log.push(CommandEvent::End(name.to_string()));
    }

    fn has_variable(&self, name: &str) -> bool {
        self.ints.contains_key(name)
    }

    fn has_command(&self, name: &str) -> bool {
        self.commands.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use rmp_engine::{SimBindings, SimulatorStore};

    use super::{CommandEvent, MemoryStore};

    #[test]
    fn test_with_bindings_resolves_everything() {
        let bindings = SimBindings::default();
        let store = MemoryStore::with_bindings(&bindings);
        assert!(bindings.verify(&store).is_ok());
    }

    #[test]
    fn test_empty_store_fails_binding() {
        let bindings = SimBindings::default();
        assert!(bindings.verify(&MemoryStore::new()).is_err());
    }

    #[test]
    fn test_unknown_variable_write_ignored() {
        let mut store = MemoryStore::new();
        store.set_int("nope", 5);
        assert_eq!(store.get_int("nope"), 0);
        assert!(!store.has_variable("nope"));
    }

    #[test]
    fn test_command_hold_tracking() {
        let mut store = MemoryStore::new();
        store.register_command("trim");

        store.begin_command("trim");
        store.begin_command("trim");
        assert!(store.is_held("trim"));

        store.end_command("trim");
        assert!(!store.is_held("trim"));
        assert_eq!(
            store.take_command_log(),
            vec![
                CommandEvent::Begin("trim".into()),
                CommandEvent::Begin("trim".into()),
                CommandEvent::End("trim".into()),
            ]
        );
        assert!(store.command_log().is_empty());
    }
}
