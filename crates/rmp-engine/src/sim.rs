//! Simulator variable store
//!
//! The engine never talks to the simulator directly. The host hands it a
//! [`SimulatorStore`] for the duration of each tick, addressed by the names
//! in [`SimBindings`].

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::trim::TrimDirection;

/// Access to named simulator integers and commands
pub trait SimulatorStore {
    /// Current value of an integer variable
    fn get_int(&self, name: &str) -> i32;

    /// Write an integer variable
    fn set_int(&mut self, name: &str, value: i32);

    /// Start holding a command
    fn begin_command(&mut self, name: &str);

    /// Release a held command
    fn end_command(&mut self, name: &str);

    /// Whether the variable exists in this simulator
    fn has_variable(&self, name: &str) -> bool;

    /// Whether the command exists in this simulator
    fn has_command(&self, name: &str) -> bool;
}

/// Names of the simulator variables and commands the bridge drives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimBindings {
    /// COM1 active frequency
    pub active_frequency: String,
    /// COM1 standby frequency
    pub standby_frequency: String,
    /// Pitch trim nose up
    pub trim_up: String,
    /// Pitch trim nose down
    pub trim_down: String,
}

impl Default for SimBindings {
    fn default() -> Self {
        Self {
            active_frequency: "sim/cockpit2/radios/actuators/com1_frequency_hz_833".to_string(),
            standby_frequency: "sim/cockpit2/radios/actuators/com1_standby_frequency_hz_833"
                .to_string(),
            trim_up: "sim/flight_controls/pitch_trim_up".to_string(),
            trim_down: "sim/flight_controls/pitch_trim_down".to_string(),
        }
    }
}

impl SimBindings {
    /// Command name for a trim direction
    pub fn trim_command(&self, direction: TrimDirection) -> &str {
        match direction {
            TrimDirection::Up => &self.trim_up,
            TrimDirection::Down => &self.trim_down,
        }
    }

    /// Check that every bound name resolves in `sim`
    pub fn verify(&self, sim: &dyn SimulatorStore) -> Result<(), EngineError> {
        for name in [&self.active_frequency, &self.standby_frequency] {
            if !sim.has_variable(name) {
                return Err(EngineError::UnboundVariable(name.clone()));
            }
        }
        for name in [&self.trim_up, &self.trim_down] {
            if !sim.has_command(name) {
                return Err(EngineError::UnboundCommand(name.clone()));
            }
        }
        Ok(())
    }
}
