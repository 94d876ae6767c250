//! Line and record I/O over the streaming wire format.
//!
//! - [`lines`]: raw newline-delimited reads with an idempotent end-of-stream
//! - [`record`]: key/value decoding and encoding on top of [`lines`]

pub mod lines;
pub mod record;

pub use lines::{read_lines, LineReader, MAX_CONSECUTIVE_ERRORS};
pub use record::{KeyIn, KeyOut, Record, RecordDecoder, RecordEncoder};
