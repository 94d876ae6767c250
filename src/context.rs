//! Output side of a running task, handed to every mapper and reducer hook.

use crate::error::StreamResult;
use crate::io::record::RecordEncoder;
use crate::reporter::{Counter, Reporter};

/// Writes output records and reporter lines.
///
/// The context exclusively owns the output stream. Records are buffered; the
/// execution loop flushes once after `cleanup`.
pub struct Context<KO, VO> {
    encoder: RecordEncoder<KO, VO>,
    reporter: Reporter,
    records_written: u64,
}

impl<KO, VO> Context<KO, VO> {
    pub fn new(encoder: RecordEncoder<KO, VO>, reporter: Reporter) -> Self {
        Self {
            encoder,
            reporter,
            records_written: 0,
        }
    }

    /// Write a key/value record.
    ///
    /// For keyless output only the value is written. Write errors are fatal;
    /// return them from the hook.
    pub fn write(&mut self, key: &KO, value: &VO) -> StreamResult<()> {
        self.encoder.write(Some(key), value)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write a value with no key.
    pub fn write_value(&mut self, value: &VO) -> StreamResult<()> {
        self.encoder.write(None, value)?;
        self.records_written += 1;
        Ok(())
    }

    /// Counter `name` in `group`.
    pub fn counter(&mut self, group: &str, name: &str) -> Counter<'_> {
        Counter::new(&mut self.reporter, group, name)
    }

    /// Add `amount` to counter `name` in `group`.
    pub fn increment_counter(&mut self, group: &str, name: &str, amount: i64) {
        self.reporter.increment_counter(group, name, amount);
    }

    /// Replace the task's status message.
    pub fn set_status(&mut self, message: &str) {
        self.reporter.set_status(message);
    }

    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    #[must_use]
    pub fn is_keyed(&self) -> bool {
        self.encoder.is_keyed()
    }

    pub(crate) fn flush(&mut self) -> StreamResult<()> {
        self.encoder.flush()
    }
}
