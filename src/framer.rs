//! Splits a raw NMEA 0183 byte stream into candidate sentences.
//!
//! The framer is a three-state machine fed one byte at a time. It captures
//! the bytes between a `$` delimiter and the next `CR`/`NL`, exclusive of
//! both, and silently resynchronizes on anything malformed: noise on the
//! line is expected, not an error.

use arrayvec::ArrayVec;

use std::fmt;
use std::mem;
use std::ops::Deref;

/// Longest sentence the framer will capture, in bytes. A line that grows
/// past this is dropped wholesale and the framer waits for the next
/// terminator.
pub const MAX_SENTENCE_LEN: usize = 511;

type Buf = ArrayVec<[u8; 512]>;

/// The bytes of one framed sentence, between `$` and the line terminator,
/// exclusive of both.
///
/// Framing says nothing about validity; checksum and field checks happen
/// in [parser](../parser/index.html).
#[derive(Clone)]
pub struct Sentence {
    data: Buf,
}

impl Sentence {
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Deref for Sentence {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Sentence({:?})", String::from_utf8_lossy(&self.data))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Discarding bytes until a line terminator comes along. Entered at
    /// construction, after a rejected line, and after an overlong line.
    WaitLineEnd,
    /// Saw a terminator; only a `$` as the very next byte starts capture.
    WaitDelimiter,
    /// Accumulating sentence bytes.
    Capturing,
}

/// State machine that frames `$...<CR/NL>` sentences out of a byte stream.
///
/// One `Framer` per stream; all state lives in the value, so independent
/// streams get independent framers.
///
/// Note that a `$` is only recognized directly after a line terminator.
/// A `$` in the middle of a discarded line does not start capture until
/// the line it sits on has ended. This matches the serial framing
/// discipline this crate was ported from and is deliberate.
#[derive(Debug)]
pub struct Framer {
    state: State,
    buf: Buf,
}

impl Framer {
    pub fn new() -> Self {
        Framer {
            state: State::WaitLineEnd,
            buf: Buf::new(),
        }
    }

    /// Advance the state machine by one byte.
    ///
    /// Returns a complete [Sentence](struct.Sentence.html) when `byte`
    /// terminates a captured line. Pure state transition: never blocks,
    /// never fails.
    pub fn feed(&mut self, byte: u8) -> Option<Sentence> {
        if byte == b'\n' || byte == b'\r' {
            let done = if self.state == State::Capturing && !self.buf.is_empty() {
                Some(Sentence {
                    data: mem::replace(&mut self.buf, Buf::new()),
                })
            } else {
                None
            };
            self.state = State::WaitDelimiter;
            return done;
        }

        match self.state {
            State::WaitLineEnd => (),
            State::WaitDelimiter => {
                self.buf.clear();
                self.state = if byte == b'$' {
                    State::Capturing
                } else {
                    State::WaitLineEnd
                };
            }
            State::Capturing => {
                if self.buf.len() >= MAX_SENTENCE_LEN {
                    // Line is too long. Dump it.
                    self.buf.clear();
                    self.state = State::WaitLineEnd;
                } else {
                    self.buf.push(byte);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(framer: &mut Framer, bytes: &[u8]) -> Vec<Sentence> {
        bytes.iter().filter_map(|&b| framer.feed(b)).collect()
    }

    #[test]
    fn frames_single_sentence() {
        let mut framer = Framer::new();
        let out = feed_all(&mut framer, b"\r\n$GPRMC,123519,A*00\r\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_bytes(), b"GPRMC,123519,A*00");
    }

    #[test]
    fn needs_terminator_before_delimiter() {
        // A bare `$` while idle must not start capture.
        let mut framer = Framer::new();
        let out = feed_all(&mut framer, b"$GPRMC,123519,A*00\r\n");
        assert!(out.is_empty());
        // The terminator above re-arms the framer, so the next line frames.
        let out = feed_all(&mut framer, b"$GPRMC,123519,A*00\r\n");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn dollar_mid_line_does_not_start_capture() {
        let mut framer = Framer::new();
        let out = feed_all(&mut framer, b"\r\nnoise$GPRMC,1*00\r\n");
        assert!(out.is_empty());
    }

    #[test]
    fn empty_line_emits_nothing() {
        let mut framer = Framer::new();
        assert!(feed_all(&mut framer, b"\r\n$\r\n$\n\n\r").is_empty());
    }

    #[test]
    fn crlf_between_sentences() {
        let mut framer = Framer::new();
        let out = feed_all(&mut framer, b"\r\n$A,B*11\r\n$C,D*22\r\n");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_bytes(), b"A,B*11");
        assert_eq!(out[1].as_bytes(), b"C,D*22");
    }

    #[test]
    fn overlong_line_is_dumped() {
        let mut framer = Framer::new();
        let mut input = b"\r\n$".to_vec();
        input.extend(vec![b'X'; MAX_SENTENCE_LEN + 50]);
        input.extend_from_slice(b"\r\n");
        assert!(feed_all(&mut framer, &input).is_empty());
        // Buffer was reset; a following valid line still frames.
        let out = feed_all(&mut framer, b"$GPRMC,ok*00\r\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_bytes(), b"GPRMC,ok*00");
    }

    #[test]
    fn never_emits_longer_than_max() {
        let mut framer = Framer::new();
        let mut input = b"\n$".to_vec();
        input.extend(vec![b'Y'; MAX_SENTENCE_LEN]);
        input.extend_from_slice(b"\r\n");
        let out = feed_all(&mut framer, &input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), MAX_SENTENCE_LEN);
    }

    #[test]
    fn resynchronizes_after_garbage_and_truncation() {
        let mut framer = Framer::new();
        let mut input = Vec::new();
        input.extend_from_slice(b"\x00\xffgarbage\r\n");
        // Truncated sentence, no terminator, pushed up to the size cap.
        input.extend_from_slice(b"$GPRM");
        input.extend(vec![b'Z'; MAX_SENTENCE_LEN]);
        // Valid sentence after the line finally ends.
        input.extend_from_slice(b"\r\n$GPRMC,valid*00\r\n");
        let out = feed_all(&mut framer, &input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_bytes(), b"GPRMC,valid*00");
    }
}
