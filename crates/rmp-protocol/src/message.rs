//! Panel → bridge messages
//!
//! # Format
//! - `D...` - debug text, passed through unchanged
//! - `Sfffff_` - standby frequency, 1 to 6 digits
//! - `Xaaaaaasss_` - active frequency (6 digits) followed by standby (1 to 6)
//! - `TD_` / `TU_` - trim wheel tick down / up
//!
//! Frequencies are the simulator's integer representation (kHz for the
//! 8.33 kHz channel datarefs), never interpreted here.

use tracing::debug;

use crate::error::ParseError;
use crate::line::LineAssembler;
use crate::ProtocolCodec;

/// Maximum number of digits in a single frequency field
const FREQ_DIGITS: usize = 6;

/// Terminator closing the payload of `S` and `X` messages
const PAYLOAD_END: char = '_';

/// A message received from the panel
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InboundMessage {
    /// Debug output from the panel firmware: `D<text>`
    DebugText(String),
    /// Standby frequency was tuned on the panel: `S122800_`
    SetStandbyFrequency(i32),
    /// Active/standby transfer on the panel: `X118000122800_`
    SetActiveAndStandbyFrequency(i32, i32),
    /// Trim wheel moved one detent nose down: `TD_`
    TrimTickDown,
    /// Trim wheel moved one detent nose up: `TU_`
    TrimTickUp,
    /// Line that did not parse, kept for diagnostics
    Invalid(String),
}

/// Parse a complete line (terminator already stripped)
pub fn parse_line(line: &str) -> Result<InboundMessage, ParseError> {
    if line.starts_with('D') {
        return Ok(InboundMessage::DebugText(line.to_string()));
    }

    if let Some(payload) = framed_payload(line, 'S') {
        let freq = parse_frequency(payload).ok_or_else(|| ParseError::Malformed {
            line: line.to_string(),
            reason: "expected 1 to 6 digits",
        })?;
        return Ok(InboundMessage::SetStandbyFrequency(freq));
    }

    if let Some(payload) = framed_payload(line, 'X') {
        // The active field is always full width, the standby field takes the rest
        let malformed = || ParseError::Malformed {
            line: line.to_string(),
            reason: "expected 6 digits followed by 1 to 6 digits",
        };
        if payload.len() <= FREQ_DIGITS || !payload.is_ascii() {
            return Err(malformed());
        }
        let (active, standby) = payload.split_at(FREQ_DIGITS);
        let active = parse_frequency(active).ok_or_else(malformed)?;
        let standby = parse_frequency(standby).ok_or_else(malformed)?;
        return Ok(InboundMessage::SetActiveAndStandbyFrequency(active, standby));
    }

    match line {
        "TD_" => Ok(InboundMessage::TrimTickDown),
        "TU_" => Ok(InboundMessage::TrimTickUp),
        _ => Err(ParseError::Unrecognized(line.to_string())),
    }
}

/// Decode a line, folding parse failures into [`InboundMessage::Invalid`]
pub fn decode(line: &str) -> InboundMessage {
    match parse_line(line) {
        Ok(msg) => msg,
        Err(e) => {
            debug!("Failed to parse RMP line: {}", e);
            InboundMessage::Invalid(e.into_line())
        }
    }
}

/// Payload between the prefix and the trailing `_`, if the line is framed that way
fn framed_payload(line: &str, prefix: char) -> Option<&str> {
    line.strip_prefix(prefix)?.strip_suffix(PAYLOAD_END)
}

fn parse_frequency(digits: &str) -> Option<i32> {
    if digits.is_empty()
        || digits.len() > FREQ_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok()
}

/// Streaming codec for the panel → bridge direction
#[derive(Debug, Clone, Default)]
pub struct RmpCodec {
    lines: LineAssembler,
}

impl RmpCodec {
    /// Create a codec with the default line capacity
    pub fn new() -> Self {
        Self {
            lines: LineAssembler::new(),
        }
    }

    /// Create a codec whose lines never exceed `capacity` bytes
    pub fn with_line_capacity(capacity: usize) -> Self {
        Self {
            lines: LineAssembler::with_capacity(capacity),
        }
    }
}

impl ProtocolCodec for RmpCodec {
    type Command = InboundMessage;

    fn push_bytes(&mut self, data: &[u8]) {
        self.lines.push_bytes(data);
    }

    fn next_command(&mut self) -> Option<Self::Command> {
        self.next_command_with_bytes().map(|(msg, _)| msg)
    }

    fn next_command_with_bytes(&mut self) -> Option<(Self::Command, Vec<u8>)> {
        let line = self.lines.next_line()?;
        let msg = decode(&String::from_utf8_lossy(&line));
        Some((msg, line))
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, parse_line, InboundMessage, RmpCodec};
    use crate::{ParseError, ProtocolCodec};

    #[test]
    fn test_parse_standby() {
        assert_eq!(
            decode("S001234_"),
            InboundMessage::SetStandbyFrequency(1234)
        );
        assert_eq!(decode("S7_"), InboundMessage::SetStandbyFrequency(7));
    }

    #[test]
    fn test_parse_active_and_standby() {
        assert_eq!(
            decode("X001234005678_"),
            InboundMessage::SetActiveAndStandbyFrequency(1234, 5678)
        );
        assert_eq!(
            decode("X1180001228_"),
            InboundMessage::SetActiveAndStandbyFrequency(118_000, 1228)
        );
    }

    #[test]
    fn test_parse_trim() {
        assert_eq!(decode("TD_"), InboundMessage::TrimTickDown);
        assert_eq!(decode("TU_"), InboundMessage::TrimTickUp);
    }

    #[test]
    fn test_debug_text_verbatim() {
        assert_eq!(
            decode("Dencoder 2 ->  12_"),
            InboundMessage::DebugText("Dencoder 2 ->  12_".into())
        );
        assert_eq!(decode("D"), InboundMessage::DebugText("D".into()));
    }

    #[test]
    fn test_invalid_lines() {
        for line in ["S_", "Xabc_", "QQQ", "", "S", "S1234567_", "X123456_", "X-12345123_", "TD", "TD_ "] {
            assert_eq!(
                decode(line),
                InboundMessage::Invalid(line.to_string()),
                "line {line:?}"
            );
        }
    }

    #[test]
    fn test_malformed_vs_unrecognized() {
        assert!(matches!(
            parse_line("S12a_"),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_line("X1234567890123_"),
            Err(ParseError::Malformed { .. })
        ));
        assert_eq!(
            parse_line("S123"),
            Err(ParseError::Unrecognized("S123".into()))
        );
        assert_eq!(parse_line("QQQ").unwrap_err().line(), "QQQ");
    }

    #[test]
    fn test_codec_stream() {
        let mut codec = RmpCodec::new();
        codec.push_bytes(b"TU_\r\nS1228");
        assert_eq!(codec.next_command(), Some(InboundMessage::TrimTickUp));
        assert_eq!(codec.next_command(), None);

        codec.push_bytes(b"00_\n");
        let (msg, raw) = codec.next_command_with_bytes().unwrap();
        assert_eq!(msg, InboundMessage::SetStandbyFrequency(122_800));
        assert_eq!(raw, b"S122800_");
    }

    #[test]
    fn test_codec_non_utf8_is_invalid() {
        let mut codec = RmpCodec::new();
        codec.push_bytes(b"\xff\xfe\n");
        assert!(matches!(
            codec.next_command(),
            Some(InboundMessage::Invalid(_))
        ));
    }
}
