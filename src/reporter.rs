//! Counter and status lines for the controlling framework.
//!
//! The framework scrapes these from the worker's stderr:
//! - `reporter:counter:<group>,<name>,<amount>`
//! - `reporter:status:<message>`
//!
//! Writes are fire-and-forget: a failing side channel is logged and ignored.

use std::fmt;
use std::io::{self, Write};
use tracing::warn;

/// Writes reporter lines to the side channel (stderr by default).
pub struct Reporter {
    sink: Box<dyn Write>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(io::stderr())
    }
}

impl Reporter {
    pub fn new(sink: impl Write + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Add `amount` to the counter `name` in `group`.
    pub fn increment_counter(&mut self, group: &str, name: &str, amount: i64) {
        self.emit(format_args!("reporter:counter:{group},{name},{amount}"));
    }

    /// Replace the task's status message.
    pub fn set_status(&mut self, message: &str) {
        self.emit(format_args!("reporter:status:{message}"));
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) {
        let res = writeln!(self.sink, "{line}").and_then(|()| self.sink.flush());
        if let Err(err) = res {
            warn!(error = %err, "failed to write reporter line");
        }
    }
}

/// Handle to one named counter.
///
/// ```
/// use ironstream::reporter::{Counter, Reporter};
///
/// let mut reporter = Reporter::new(Vec::<u8>::new());
/// let mut words = Counter::new(&mut reporter, "wordcount", "words");
/// words.increment(3);
/// ```
pub struct Counter<'a> {
    reporter: &'a mut Reporter,
    group: String,
    name: String,
}

impl<'a> Counter<'a> {
    pub fn new(reporter: &'a mut Reporter, group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            reporter,
            group: group.into(),
            name: name.into(),
        }
    }

    pub fn increment(&mut self, amount: i64) {
        self.reporter
            .increment_counter(&self.group, &self.name, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SharedBuffer;

    #[test]
    fn counter_and_status_lines() {
        let buf = SharedBuffer::new();
        let mut reporter = Reporter::new(buf.clone());
        Counter::new(&mut reporter, "g", "n").increment(2);
        reporter.set_status("half way");
        assert_eq!(
            buf.text(),
            "reporter:counter:g,n,2\nreporter:status:half way\n"
        );
    }
}
