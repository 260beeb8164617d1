//! Trim wheel debounce
//!
//! The trim wheel reports one `TD_`/`TU_` per detent and nothing when it stops.
//! The simulator's trim commands want to be held instead, so each detent
//! (re)starts a short countdown and the command is released when it runs out.

use serde::{Deserialize, Serialize};

/// Ticks a trim command stays held after the last detent
pub const DEFAULT_TRIM_RELOAD: u8 = 3;

/// Direction of trim movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrimDirection {
    /// Nose up
    Up,
    /// Nose down
    Down,
}

/// Command to apply to the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimAction {
    /// Start (or keep) holding the trim command
    Begin(TrimDirection),
    /// Release the trim command
    End(TrimDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrimState {
    Idle,
    Active {
        direction: TrimDirection,
        ticks_remaining: u8,
    },
}

/// Converts trim detents into held begin/end commands
#[derive(Debug, Clone)]
pub struct TrimDebounce {
    state: TrimState,
    reload: u8,
}

impl TrimDebounce {
    /// Create a debouncer releasing `reload` ticks after the last detent
    ///
    /// A reload of zero is treated as one tick.
    pub fn new(reload: u8) -> Self {
        Self {
            state: TrimState::Idle,
            reload: reload.max(1),
        }
    }

    /// Direction currently held, if any
    pub fn active(&self) -> Option<TrimDirection> {
        match self.state {
            TrimState::Idle => None,
            TrimState::Active { direction, .. } => Some(direction),
        }
    }

    /// Ticks left before the held command is released
    pub fn ticks_remaining(&self) -> u8 {
        match self.state {
            TrimState::Idle => 0,
            TrimState::Active {
                ticks_remaining, ..
            } => ticks_remaining,
        }
    }

    /// Handle one detent in `direction`
    ///
    /// A change of direction releases the old command before beginning the
    /// new one. Repeating the held direction begins it again and reloads the
    /// countdown.
    pub fn press(&mut self, direction: TrimDirection) -> Vec<TrimAction> {
        let mut actions = Vec::with_capacity(2);
        if let Some(current) = self.active() {
            if current != direction {
                actions.push(TrimAction::End(current));
            }
        }
        actions.push(TrimAction::Begin(direction));
        self.state = TrimState::Active {
            direction,
            ticks_remaining: self.reload,
        };
        actions
    }

    /// Advance the countdown by one engine tick
    pub fn advance(&mut self) -> Option<TrimAction> {
        let TrimState::Active {
            direction,
            ticks_remaining,
        } = self.state
        else {
            return None;
        };

        if ticks_remaining <= 1 {
            self.state = TrimState::Idle;
            Some(TrimAction::End(direction))
        } else {
            self.state = TrimState::Active {
                direction,
                ticks_remaining: ticks_remaining - 1,
            };
            None
        }
    }

    /// Release the held command immediately
    pub fn release(&mut self) -> Option<TrimAction> {
        let direction = self.active()?;
        self.state = TrimState::Idle;
        Some(TrimAction::End(direction))
    }
}

impl Default for TrimDebounce {
    fn default() -> Self {
        Self::new(DEFAULT_TRIM_RELOAD)
    }
}
