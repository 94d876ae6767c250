//! Newline-delimited reads.
//!
//! [`LineReader`] backs the record decoder: it strips the `\n` terminator,
//! returns an unterminated trailing line once, and then reports end-of-stream
//! on every later call without touching the underlying reader again. A read
//! error does not end the stream; whether to keep reading is up to the caller.
//!
//! [`read_lines`] is a standalone helper for tools that only need raw lines.

use crate::error::{StreamResult, StreamingError};
use std::io::{self, BufRead, BufReader, Read};
use tracing::warn;

/// Back-to-back read errors after which the stream is treated as ended.
pub const MAX_CONSECUTIVE_ERRORS: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    Open,
    Ended,
}

/// Reads raw lines from a buffered reader.
pub struct LineReader<R> {
    inner: R,
    state: ReadState,
    // bytes of a line interrupted by a read error
    partial: Vec<u8>,
    lines_read: u64,
    errors_in_a_row: u32,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            state: ReadState::Open,
            partial: Vec::new(),
            lines_read: 0,
            errors_in_a_row: 0,
        }
    }

    /// Read the next line without its `\n`.
    ///
    /// Returns `Ok(None)` at end-of-stream, and keeps returning it afterwards.
    /// An I/O error leaves the reader open: the next call reads the underlying
    /// stream again, continuing any line the error cut short. After
    /// [`MAX_CONSECUTIVE_ERRORS`] errors with no line in between the reader
    /// gives up and behaves as ended.
    pub fn read_line(&mut self) -> StreamResult<Option<Vec<u8>>> {
        if self.state == ReadState::Ended {
            return Ok(None);
        }
        match self.inner.read_until(b'\n', &mut self.partial) {
            Ok(0) if self.partial.is_empty() => {
                self.state = ReadState::Ended;
                Ok(None)
            }
            Ok(_) => {
                let mut buf = std::mem::take(&mut self.partial);
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                } else {
                    // unterminated final line
                    self.state = ReadState::Ended;
                }
                self.lines_read += 1;
                self.errors_in_a_row = 0;
                Ok(Some(buf))
            }
            Err(e) => {
                self.errors_in_a_row += 1;
                if self.errors_in_a_row >= MAX_CONSECUTIVE_ERRORS {
                    warn!(errors = self.errors_in_a_row, "input keeps failing, treating it as ended");
                    self.state = ReadState::Ended;
                }
                Err(StreamingError::io("reading input line", e))
            }
        }
    }

    /// `true` once end-of-stream has been seen, or the input failed
    /// [`MAX_CONSECUTIVE_ERRORS`] times in a row.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.state == ReadState::Ended
    }

    /// Number of lines returned so far, blank ones included.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

/// Call `callback` with every line of `reader`.
///
/// The `\n` terminator and a `\r` right before it are stripped. Iteration
/// stops when the callback returns `false`, at end of input, or after a read
/// error has been passed to the callback.
///
/// ```
/// use ironstream::io::read_lines;
///
/// let mut seen = Vec::new();
/// read_lines("a\r\nb\nc".as_bytes(), |line| {
///     seen.push(line.unwrap().to_vec());
///     true
/// });
/// assert_eq!(seen, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
/// ```
pub fn read_lines<R, F>(reader: R, mut callback: F)
where
    R: Read,
    F: FnMut(io::Result<&[u8]>) -> bool,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let terminated = buf.last() == Some(&b'\n');
                if terminated {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                if !callback(Ok(&buf)) || !terminated {
                    break;
                }
            }
            Err(e) => {
                callback(Err(e));
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn counts_lines_including_blank_ones() {
        let mut r = LineReader::new(Cursor::new(b"a\n\nb".to_vec()));
        while r.read_line().unwrap().is_some() {}
        assert_eq!(r.lines_read(), 3);
        assert!(r.is_ended());
    }
}
