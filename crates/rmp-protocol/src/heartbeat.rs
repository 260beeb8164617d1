//! Bridge → panel heartbeat
//!
//! `H<active:06><standby:06>a\n`. The panel treats a missing heartbeat as a
//! lost link, so it is sent periodically even when nothing changed.

use crate::EncodeCommand;

/// Sentinel closing the heartbeat payload
const HEARTBEAT_END: u8 = b'a';

/// Snapshot of the radio state reported to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heartbeat {
    /// Active frequency
    pub active: i32,
    /// Standby frequency
    pub standby: i32,
}

impl Heartbeat {
    pub fn new(active: i32, standby: i32) -> Self {
        Self { active, standby }
    }

    /// Parse a heartbeat line as the panel sees it
    ///
    /// Accepts the line with or without its trailing `\n` / `\r\n`.
    pub fn parse(line: &[u8]) -> Option<Self> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let body = line.strip_prefix(b"H")?.strip_suffix(&[HEARTBEAT_END])?;
        if body.len() != 12 || !body.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let field = |digits: &[u8]| {
            digits
                .iter()
                .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'))
        };
        Some(Self {
            active: field(&body[..6]),
            standby: field(&body[6..]),
        })
    }
}

impl EncodeCommand for Heartbeat {
    fn encode(&self) -> Vec<u8> {
        format!("H{:06}{:06}a\n", self.active, self.standby).into_bytes()
    }
}

/// Encode a heartbeat line for the given frequencies
pub fn encode_heartbeat(active: i32, standby: i32) -> Vec<u8> {
    Heartbeat::new(active, standby).encode()
}
