//! Line framing
//!
//! The panel sends newline-terminated ASCII lines. Carriage returns are
//! dropped wherever they appear, so both `\n` and `\r\n` endings work.
//!
//! The partial line is held in a bounded buffer. If a byte would push the
//! buffer past its capacity the partial line is thrown away and framing
//! restarts with the next byte; a garbled line is cheaper than an unbounded
//! buffer on a desynchronized link.

use std::collections::VecDeque;

use tracing::debug;

/// Default capacity of the partial-line buffer
pub const DEFAULT_LINE_CAPACITY: usize = 100;

/// Streaming assembler turning raw bytes into completed lines
#[derive(Debug, Clone)]
pub struct LineAssembler {
    /// Bytes pushed but not yet framed
    pending: VecDeque<u8>,
    /// Current partial line
    buffer: Vec<u8>,
    capacity: usize,
}

impl LineAssembler {
    /// Create an assembler with [`DEFAULT_LINE_CAPACITY`]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LINE_CAPACITY)
    }

    /// Create an assembler whose partial line never exceeds `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Maximum length of a partial (and therefore of a completed) line
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of the partial line currently buffered
    pub fn partial_len(&self) -> usize {
        self.buffer.len()
    }

    /// Queue raw bytes for framing
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.pending.extend(data);
    }

    /// Frame queued bytes until the next line completes
    ///
    /// Returns `None` once the queued bytes are exhausted; the partial line
    /// is kept for the next call.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        while let Some(byte) = self.pending.pop_front() {
            match byte {
                b'\r' => continue,
                b'\n' => {
                    let line =
                        std::mem::replace(&mut self.buffer, Vec::with_capacity(self.capacity));
                    return Some(line);
                }
                _ => {
                    if self.buffer.len() >= self.capacity {
                        debug!(
                            "Line buffer overflow, discarding {} bytes",
                            self.buffer.len()
                        );
                        self.buffer.clear();
                    } else {
                        self.buffer.push(byte);
                    }
                }
            }
        }
        None
    }

    /// Push `data` and iterate over the lines it completes
    ///
    /// The iterator is lazy. Dropping it early leaves the remaining bytes
    /// queued, so the lines are still produced by the next call.
    pub fn feed<'a>(&'a mut self, data: &[u8]) -> impl Iterator<Item = Vec<u8>> + 'a {
        self.push_bytes(data);
        std::iter::from_fn(move || self.next_line())
    }

    /// Discard the partial line and any queued bytes
    pub fn clear(&mut self) {
        self.pending.clear();
        self.buffer.clear();
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::LineAssembler;
    use proptest::prelude::*;

    #[test]
    fn test_single_line() {
        let mut lines = LineAssembler::new();
        let out: Vec<_> = lines.feed(b"TD_\n").collect();
        assert_eq!(out, vec![b"TD_".to_vec()]);
    }

    #[test]
    fn test_carriage_return_dropped() {
        let mut lines = LineAssembler::new();
        let out: Vec<_> = lines.feed(b"S1\r23_\r\n").collect();
        assert_eq!(out, vec![b"S123_".to_vec()]);
    }

    #[test]
    fn test_partial_line_survives_calls() {
        let mut lines = LineAssembler::new();
        assert_eq!(lines.feed(b"X00123").count(), 0);
        assert_eq!(lines.partial_len(), 6);

        let out: Vec<_> = lines.feed(b"4005678_\n").collect();
        assert_eq!(out, vec![b"X001234005678_".to_vec()]);
        assert_eq!(lines.partial_len(), 0);
    }

    #[test]
    fn test_empty_line() {
        let mut lines = LineAssembler::new();
        let out: Vec<_> = lines.feed(b"\n\r\n").collect();
        assert_eq!(out, vec![Vec::new(), Vec::new()]);
    }

    #[test]
    fn test_overflow_resets_buffer() {
        let mut lines = LineAssembler::with_capacity(4);
        // "ABCD" fills the buffer, "E" overflows and is dropped, "FG" restarts
        let out: Vec<_> = lines.feed(b"ABCDEFG\n").collect();
        assert_eq!(out, vec![b"FG".to_vec()]);
    }

    #[test]
    fn test_exact_capacity_line_kept() {
        let mut lines = LineAssembler::with_capacity(4);
        let out: Vec<_> = lines.feed(b"ABCD\n").collect();
        assert_eq!(out, vec![b"ABCD".to_vec()]);
    }

    #[test]
    fn test_dropped_iterator_keeps_remaining_lines() {
        let mut lines = LineAssembler::new();
        let first = lines.feed(b"TU_\nTD_\n").next();
        assert_eq!(first, Some(b"TU_".to_vec()));

        assert_eq!(lines.next_line(), Some(b"TD_".to_vec()));
        assert_eq!(lines.next_line(), None);
    }

    #[test]
    fn test_clear() {
        let mut lines = LineAssembler::new();
        lines.push_bytes(b"garbage\nmore");
        lines.clear();
        assert_eq!(lines.next_line(), None);
        assert_eq!(lines.partial_len(), 0);
    }

    proptest! {
        #[test]
        fn line_count_matches_newlines(
            data in prop::collection::vec(any::<u8>(), 0..600),
            capacity in 1usize..120,
        ) {
            let mut lines = LineAssembler::with_capacity(capacity);
            let out: Vec<_> = lines.feed(&data).collect();

            let newlines = data.iter().filter(|&&b| b == b'\n').count();
            prop_assert_eq!(out.len(), newlines);
            for line in &out {
                prop_assert!(line.len() <= capacity);
                prop_assert!(!line.contains(&b'\r'));
            }
            prop_assert!(lines.partial_len() <= capacity);
        }

        #[test]
        fn chunking_does_not_change_lines(
            data in prop::collection::vec(prop_oneof![Just(b'\n'), Just(b'\r'), 0x20u8..0x7f], 0..300),
            split in 0usize..300,
        ) {
            let split = split.min(data.len());

            let mut whole = LineAssembler::new();
            let expected: Vec<_> = whole.feed(&data).collect();

            let mut chunked = LineAssembler::new();
            let mut actual: Vec<_> = chunked.feed(&data[..split]).collect();
            actual.extend(chunked.feed(&data[split..]));

            prop_assert_eq!(actual, expected);
        }
    }
}
