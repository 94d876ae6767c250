//! Grouping of a key-sorted record stream.
//!
//! [`GroupingEngine`] owns the record decoder and offers two ways to consume
//! it, both built on [`GroupingEngine::advance`]:
//!
//! - **map**: [`next_record`](GroupingEngine::next_record) yields records one
//!   by one with no grouping.
//! - **reduce**: [`next_group`](GroupingEngine::next_group) yields a key and a
//!   [`Values`] iterator over the maximal run of records sharing that key.
//!
//! The engine never buffers a group. While a [`Values`] iterator searches for
//! the end of its run it decodes one record ahead; a record with a different
//! key is handed back to the engine as the *pending* record and becomes the
//! first record of the next group. A decode failure during probing ends the
//! group and is reported by the next call to `advance`.
//!
//! Input must already be sorted by key. Keys that reappear after a different
//! key form a new group.

use crate::error::{StreamResult, StreamingError};
use crate::io::record::{Record, RecordDecoder};
use std::iter::FusedIterator;
use tracing::trace;

/// What the engine holds beyond the current record.
enum Lookahead<K, V> {
    Empty,
    /// First record of the next group, decoded while probing.
    Pending(Record<K, V>),
    /// Failure hit while probing; surfaced by the next `advance`.
    Failed(StreamingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupState {
    /// No record loaded.
    Idle,
    /// A record is loaded and no values iterator was requested yet.
    Fresh,
    /// A values iterator was handed out and has not hit the group end.
    Open,
    /// The current group's values are exhausted.
    Closed,
}

/// Map- and reduce-style consumption of a decoded record stream.
pub struct GroupingEngine<K, V> {
    decoder: RecordDecoder<K, V>,
    current_key: Option<K>,
    current_value: Option<V>,
    lookahead: Lookahead<K, V>,
    state: GroupState,
    groups: u64,
}

impl<K, V> GroupingEngine<K, V>
where
    K: PartialEq,
{
    pub fn new(decoder: RecordDecoder<K, V>) -> Self {
        Self {
            decoder,
            current_key: None,
            current_value: None,
            lookahead: Lookahead::Empty,
            state: GroupState::Idle,
            groups: 0,
        }
    }

    /// Move to the next record.
    ///
    /// Takes the pending record if there is one, otherwise decodes a new one.
    /// Returns `Ok(false)` at end-of-stream. If a values iterator of the
    /// current group was not drained, the rest of that group is skipped first.
    pub fn advance(&mut self) -> StreamResult<bool> {
        if self.state == GroupState::Open {
            self.skip_rest_of_group();
        }
        self.current_key = None;
        self.current_value = None;
        self.state = GroupState::Idle;

        let record = match std::mem::replace(&mut self.lookahead, Lookahead::Empty) {
            Lookahead::Failed(err) => return Err(err),
            Lookahead::Pending(record) => record,
            Lookahead::Empty => match self.decoder.decode()? {
                Some(record) => record,
                None => return Ok(false),
            },
        };
        self.current_key = Some(record.key);
        self.current_value = Some(record.value);
        self.state = GroupState::Fresh;
        Ok(true)
    }

    /// Advance and hand out the record (map mode).
    pub fn next_record(&mut self) -> StreamResult<Option<Record<K, V>>> {
        if !self.advance()? {
            return Ok(None);
        }
        let key = self.current_key.take();
        let value = self.current_value.take();
        self.state = GroupState::Closed;
        Ok(key.zip(value).map(|(key, value)| Record::new(key, value)))
    }

    /// Advance and hand out the next group's key and values (reduce mode).
    pub fn next_group(&mut self) -> StreamResult<Option<(K, Values<'_, K, V>)>>
    where
        K: Clone,
    {
        if !self.advance()? {
            return Ok(None);
        }
        let Some(key) = self.current_key.clone() else {
            return Ok(None);
        };
        self.groups += 1;
        Ok(Some((key, self.values())))
    }

    /// Values of the current group.
    ///
    /// The first call after [`advance`](Self::advance) receives the already
    /// loaded value; once the group is exhausted further iterators are empty.
    pub fn values(&mut self) -> Values<'_, K, V> {
        let finished = match self.state {
            GroupState::Fresh => {
                self.state = GroupState::Open;
                false
            }
            GroupState::Open => false,
            GroupState::Idle | GroupState::Closed => true,
        };
        let buffered = self.current_value.take();
        Values {
            engine: self,
            buffered,
            finished,
        }
    }

    /// Key of the current record or group.
    #[must_use]
    pub fn current_key(&self) -> Option<&K> {
        self.current_key.as_ref()
    }

    /// Drop the current record and any lookahead.
    ///
    /// Used after a recovered read error before reading on.
    pub fn reset(&mut self) {
        self.current_key = None;
        self.current_value = None;
        self.lookahead = Lookahead::Empty;
        self.state = GroupState::Idle;
    }

    /// Groups handed out through [`next_group`](Self::next_group).
    #[must_use]
    pub fn groups(&self) -> u64 {
        self.groups
    }

    /// Input lines consumed so far.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.decoder.lines_read()
    }

    fn skip_rest_of_group(&mut self) {
        let mut rest = Values {
            engine: self,
            buffered: None,
            finished: false,
        };
        let mut skipped = 0u64;
        while rest.has_next() {
            rest.buffered = None;
            skipped += 1;
        }
        if skipped > 0 {
            trace!(skipped, "skipped undrained values");
        }
    }
}

/// Lazy values of one group.
///
/// Holds at most one value; the engine holds at most one record of the next
/// group. Not restartable.
pub struct Values<'a, K, V> {
    engine: &'a mut GroupingEngine<K, V>,
    buffered: Option<V>,
    finished: bool,
}

impl<K: PartialEq, V> Values<'_, K, V> {
    /// `true` if another value of this group is available.
    ///
    /// May decode one record. A record with another key is kept by the engine
    /// for the next group; a decode failure ends the group and is kept for the
    /// next `advance`.
    pub fn has_next(&mut self) -> bool {
        if self.buffered.is_some() {
            return true;
        }
        if self.finished {
            return false;
        }
        match self.engine.decoder.decode() {
            Ok(Some(record)) => {
                if self.engine.current_key.as_ref() == Some(&record.key) {
                    self.buffered = Some(record.value);
                    return true;
                }
                trace!("group boundary");
                self.engine.lookahead = Lookahead::Pending(record);
            }
            Ok(None) => {}
            Err(err) => {
                self.engine.lookahead = Lookahead::Failed(err);
            }
        }
        self.finish();
        false
    }

    fn finish(&mut self) {
        self.finished = true;
        self.engine.state = GroupState::Closed;
    }
}

impl<K: PartialEq, V> Iterator for Values<'_, K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if self.has_next() {
            self.buffered.take()
        } else {
            None
        }
    }
}

impl<K: PartialEq, V> FusedIterator for Values<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{IntegerCodec, StringCodec};
    use crate::io::record::KeyIn;
    use std::io::Cursor;
    use std::sync::Arc;

    fn engine(input: &str) -> GroupingEngine<u32, String> {
        GroupingEngine::new(RecordDecoder::new(
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            KeyIn::Keyed(Arc::new(IntegerCodec::<u32>::new())),
            Arc::new(StringCodec),
        ))
    }

    #[test]
    fn failure_while_probing_surfaces_on_next_advance() {
        let mut e = engine("1\ta\nbad line\n2\tb\n");
        let (key, values) = e.next_group().unwrap().unwrap();
        assert_eq!(key, 1);
        assert_eq!(values.collect::<Vec<_>>(), vec!["a"]);
        let err = e.advance().unwrap_err();
        assert!(matches!(err, StreamingError::MissingDelimiter { .. }));
        e.reset();
        let (key, values) = e.next_group().unwrap().unwrap();
        assert_eq!(key, 2);
        assert_eq!(values.count(), 1);
        assert!(e.next_group().unwrap().is_none());
    }

    #[test]
    fn second_values_call_after_exhaustion_is_empty() {
        let mut e = engine("1\ta\n1\tb\n2\tc\n");
        assert!(e.advance().unwrap());
        assert_eq!(e.values().count(), 2);
        assert_eq!(e.values().count(), 0);
        let (key, _) = e.next_group().unwrap().unwrap();
        assert_eq!(key, 2);
    }
}
