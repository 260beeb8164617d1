//! RMP Protocol Library
//!
//! This crate provides framing, parsing and encoding for the line protocol
//! spoken between an Arduino based radio management panel (RMP) and the
//! simulator bridge.
//!
//! # Wire Format
//!
//! Every message is a single ASCII line terminated by `\n`; `\r` bytes are
//! ignored wherever they appear.
//!
//! Panel → bridge:
//! - `D<text>` - free form debug output from the panel firmware
//! - `S<up to 6 digits>_` - set the standby frequency
//! - `X<6 digits><up to 6 digits>_` - set active and standby frequency
//! - `TD_` / `TU_` - one tick of the trim wheel (down / up)
//!
//! Bridge → panel:
//! - `H<6 digits><6 digits>a` - heartbeat carrying active and standby frequency
//!
//! # Example
//!
//! ```rust
//! use rmp_protocol::{InboundMessage, ProtocolCodec, RmpCodec};
//!
//! let mut codec = RmpCodec::new();
//! codec.push_bytes(b"S122800_\r\n");
//!
//! assert_eq!(
//!     codec.next_command(),
//!     Some(InboundMessage::SetStandbyFrequency(122_800))
//! );
//! ```

pub mod error;
pub mod heartbeat;
pub mod line;
pub mod message;

pub use error::ParseError;
pub use heartbeat::{encode_heartbeat, Heartbeat};
pub use line::{LineAssembler, DEFAULT_LINE_CAPACITY};
pub use message::{decode, parse_line, InboundMessage, RmpCodec};

/// Trait for codecs that turn a raw byte stream into typed messages
pub trait ProtocolCodec {
    /// The message type produced by this codec
    type Command;

    /// Push raw bytes into the codec's buffer
    fn push_bytes(&mut self, data: &[u8]);

    /// Try to extract the next complete message from the buffer
    fn next_command(&mut self) -> Option<Self::Command>;

    /// Try to extract the next complete message along with its raw line
    ///
    /// The raw bytes exclude the terminator and any carriage returns.
    fn next_command_with_bytes(&mut self) -> Option<(Self::Command, Vec<u8>)>;

    /// Clear the internal buffer
    fn clear(&mut self);
}

/// Trait for messages that can be encoded to bytes
pub trait EncodeCommand {
    /// Encode this message to its wire format, terminator included
    fn encode(&self) -> Vec<u8>;
}
