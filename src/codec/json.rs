use super::{Codec, WireValue};
use crate::error::{MalformedKind, StreamResult, StreamingError};
use std::any::type_name;
use std::marker::PhantomData;

/// Compact JSON, the fallback for structured types (maps, sequences, structs).
///
/// `serde_json` escapes control characters inside strings, so the encoded form
/// never contains a raw `\n` or `\t`.
///
/// ```
/// use ironstream::codec::{Codec, JsonCodec};
///
/// let codec = JsonCodec::<Vec<u32>>::new();
/// assert_eq!(codec.encode(&vec![1, 2]).unwrap(), b"[1,2]");
/// assert_eq!(codec.decode(b"[3]").unwrap(), vec![3]);
/// ```
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WireValue> Codec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> StreamResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| StreamingError::Encode {
            target: type_name::<T>(),
            reason: e.to_string(),
        })
    }

    fn decode(&self, raw: &[u8]) -> StreamResult<T> {
        serde_json::from_slice(raw).map_err(|e| {
            let kind = if std::str::from_utf8(raw).is_err() {
                MalformedKind::Encoding
            } else {
                MalformedKind::Syntax
            };
            StreamingError::malformed_with(raw, type_name::<T>(), kind, e)
        })
    }
}
