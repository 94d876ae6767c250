//! Key/value records on the wire.
//!
//! A keyed line is `<key>\t<value>\n`, split on the first tab. A keyless line
//! is `<value>\n`. Blank input lines are skipped.

use super::lines::LineReader;
use crate::codec::SharedCodec;
use crate::error::{StreamResult, StreamingError};
use std::any::type_name;
use std::io::{BufRead, BufWriter, Write};

/// One decoded record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Record<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// How input keys are obtained.
pub enum KeyIn<K> {
    /// Lines carry a key decoded with this codec.
    Keyed(SharedCodec<K>),
    /// Lines carry only a value; every record gets the key produced here.
    Keyless(fn() -> K),
}

/// How output keys are written.
pub enum KeyOut<K> {
    /// Keys are encoded with this codec; an empty encoding omits the tab.
    Keyed(SharedCodec<K>),
    /// Only values are written.
    Keyless,
}

impl<K> KeyOut<K> {
    #[must_use]
    pub fn is_keyed(&self) -> bool {
        matches!(self, Self::Keyed(_))
    }
}

/// Decodes records from an input stream.
pub struct RecordDecoder<K, V> {
    lines: LineReader<Box<dyn BufRead>>,
    key: KeyIn<K>,
    value: SharedCodec<V>,
}

impl<K, V> RecordDecoder<K, V> {
    pub fn new(input: Box<dyn BufRead>, key: KeyIn<K>, value: SharedCodec<V>) -> Self {
        Self {
            lines: LineReader::new(input),
            key,
            value,
        }
    }

    /// Decode the next non-blank line.
    ///
    /// Returns `Ok(None)` at end-of-stream. A keyed line without a tab is a
    /// [`StreamingError::MissingDelimiter`]; codec failures propagate as is.
    pub fn decode(&mut self) -> StreamResult<Option<Record<K, V>>> {
        let line = loop {
            match self.lines.read_line()? {
                None => return Ok(None),
                Some(line) if line.is_empty() => continue,
                Some(line) => break line,
            }
        };
        self.decode_line(line).map(Some)
    }

    fn decode_line(&self, line: Vec<u8>) -> StreamResult<Record<K, V>> {
        match &self.key {
            KeyIn::Keyless(make_key) => {
                let value = self.value.decode(&line)?;
                Ok(Record::new(make_key(), value))
            }
            KeyIn::Keyed(key_codec) => {
                let Some(tab) = line.iter().position(|&b| b == b'\t') else {
                    return Err(StreamingError::MissingDelimiter { line });
                };
                let key = key_codec.decode(&line[..tab])?;
                let value = self.value.decode(&line[tab + 1..])?;
                Ok(Record::new(key, value))
            }
        }
    }

    /// Lines consumed so far, blank ones included.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.lines.lines_read()
    }
}

/// Encodes records into a buffered output stream.
///
/// Nothing reaches the underlying writer before the buffer fills or
/// [`flush`](Self::flush) is called.
pub struct RecordEncoder<K, V> {
    out: BufWriter<Box<dyn Write>>,
    key: KeyOut<K>,
    value: SharedCodec<V>,
}

impl<K, V> RecordEncoder<K, V> {
    pub fn new(output: Box<dyn Write>, key: KeyOut<K>, value: SharedCodec<V>) -> Self {
        Self {
            out: BufWriter::new(output),
            key,
            value,
        }
    }

    /// Render one record as a full wire line, terminator included.
    ///
    /// Fails if the encoded key contains a tab.
    pub fn encode_line(&self, key: Option<&K>, value: &V) -> StreamResult<Vec<u8>> {
        let key_bytes = match (&self.key, key) {
            (KeyOut::Keyed(codec), Some(key)) => codec.encode(key)?,
            _ => Vec::new(),
        };
        // a tab in the key would move the split point on the way back in
        if key_bytes.contains(&b'\t') {
            return Err(StreamingError::Encode {
                target: type_name::<K>(),
                reason: "key contains a tab".into(),
            });
        }
        let value_bytes = self.value.encode(value)?;

        let mut line = Vec::with_capacity(key_bytes.len() + value_bytes.len() + 2);
        if !key_bytes.is_empty() {
            line.extend_from_slice(&key_bytes);
            line.push(b'\t');
        }
        line.extend_from_slice(&value_bytes);
        line.push(b'\n');
        Ok(line)
    }

    /// Encode and write one record.
    pub fn write(&mut self, key: Option<&K>, value: &V) -> StreamResult<()> {
        let line = self.encode_line(key, value)?;
        self.out
            .write_all(&line)
            .map_err(|e| StreamingError::io("writing output record", e))
    }

    /// Push buffered bytes to the underlying writer.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.out
            .flush()
            .map_err(|e| StreamingError::io("flushing output", e))
    }

    #[must_use]
    pub fn is_keyed(&self) -> bool {
        self.key.is_keyed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{IntegerCodec, StringCodec};
    use std::io::Cursor;
    use std::sync::Arc;

    fn decoder(input: &str) -> RecordDecoder<i64, String> {
        RecordDecoder::new(
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            KeyIn::Keyed(Arc::new(IntegerCodec::<i64>::new())),
            Arc::new(StringCodec),
        )
    }

    #[test]
    fn splits_on_first_tab_only() {
        let mut d = decoder("7\ta\tb\n");
        let rec = d.decode().unwrap().unwrap();
        assert_eq!(rec, Record::new(7, "a\tb".to_string()));
        assert!(d.decode().unwrap().is_none());
    }

    #[test]
    fn blank_lines_are_not_records() {
        let mut d = decoder("\n\n1\tx\n\n");
        assert_eq!(d.decode().unwrap().unwrap().value, "x");
        assert!(d.decode().unwrap().is_none());
        assert_eq!(d.lines_read(), 4);
    }

    #[test]
    fn empty_key_encoding_omits_tab() {
        let enc: RecordEncoder<String, String> = RecordEncoder::new(
            Box::new(Vec::<u8>::new()),
            KeyOut::Keyed(Arc::new(StringCodec)),
            Arc::new(StringCodec),
        );
        let line = enc.encode_line(Some(&String::new()), &"v".to_string()).unwrap();
        assert_eq!(line, b"v\n");
        let line = enc.encode_line(Some(&"k".to_string()), &"v".to_string()).unwrap();
        assert_eq!(line, b"k\tv\n");
    }
}
