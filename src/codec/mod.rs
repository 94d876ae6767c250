//! Typed codecs between values and their wire text, and the registry that
//! picks one per type.
//!
//! ## Built-in table
//!
//! [`CodecRegistry::default`] knows, in priority order:
//! - `bool` via [`BoolCodec`]
//! - `f32`, `f64` via [`FloatCodec`]
//! - [`Complex32`](crate::utils::Complex32), [`Complex64`](crate::utils::Complex64) via [`ComplexCodec`]
//! - every signed and unsigned integer width via [`IntegerCodec`]
//! - `String` via [`StringCodec`]
//!
//! Any other `Serialize + DeserializeOwned` type falls back to [`JsonCodec`],
//! except the unit type `()`, which is denied: it is the key type of keyless
//! jobs and never has a wire form.
//!
//! ## Custom codecs
//! ```
//! use ironstream::codec::{Codec, CodecRegistry};
//! use ironstream::error::StreamResult;
//!
//! struct Upper;
//!
//! impl Codec<String> for Upper {
//!     fn encode(&self, value: &String) -> StreamResult<Vec<u8>> {
//!         Ok(value.to_uppercase().into_bytes())
//!     }
//!     fn decode(&self, raw: &[u8]) -> StreamResult<String> {
//!         Ok(String::from_utf8_lossy(raw).into_owned())
//!     }
//! }
//!
//! let mut registry = CodecRegistry::default();
//! registry.register::<String, _>(Upper);
//! let codec = registry.resolve::<String>().unwrap();
//! assert_eq!(codec.encode(&"abc".to_string()).unwrap(), b"ABC");
//! ```

mod json;
mod scalar;

pub use json::JsonCodec;
pub use scalar::{BoolCodec, ComplexCodec, FloatCodec, IntegerCodec, StringCodec, WireFloat, WireInt};

use crate::error::StreamResult;
use crate::type_token::TypeTag;
use crate::utils::{Complex32, Complex64};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Bound for every type that can travel as a key or value.
pub trait WireValue: 'static + Serialize + DeserializeOwned {}
impl<T> WireValue for T where T: 'static + Serialize + DeserializeOwned {}

/// Converts values of type `T` to and from wire bytes.
///
/// Codecs are pure: they hold no per-record state. The encoded form must not
/// contain `\n`; keys must additionally not contain `\t`.
pub trait Codec<T>: Send + Sync {
    /// Render `value` as wire bytes.
    fn encode(&self, value: &T) -> StreamResult<Vec<u8>>;

    /// Parse wire bytes (without line terminator) into a value.
    fn decode(&self, raw: &[u8]) -> StreamResult<T>;
}

/// Shared handle to a resolved codec.
pub type SharedCodec<T> = Arc<dyn Codec<T>>;

enum Entry {
    /// Boxed `SharedCodec<T>` for the tagged `T`.
    Codec(Box<dyn Any + Send + Sync>),
    Denied,
}

/// Maps value types to codecs.
///
/// Lookups happen once per job when the job is built. Types that are neither
/// registered nor denied resolve to a [`JsonCodec`].
pub struct CodecRegistry {
    entries: HashMap<TypeTag, Entry>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }
}

macro_rules! register_integers {
    ($registry:expr, $($t:ty),+ $(,)?) => {
        $( $registry.register::<$t, _>(IntegerCodec::<$t>::new()); )+
    };
}

impl CodecRegistry {
    /// A registry with no entries; every type except denied ones maps to JSON.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn register_builtins(&mut self) {
        self.register::<bool, _>(BoolCodec);
        self.register::<f32, _>(FloatCodec::<f32>::new());
        self.register::<f64, _>(FloatCodec::<f64>::new());
        self.register::<Complex32, _>(ComplexCodec::<f32>::new());
        self.register::<Complex64, _>(ComplexCodec::<f64>::new());
        register_integers!(self, i8, i16, i32, i64, i128, isize);
        register_integers!(self, u8, u16, u32, u64, u128, usize);
        self.register::<String, _>(StringCodec);
        self.deny::<()>();
    }

    /// Register (or replace) the codec for `T`.
    pub fn register<T, C>(&mut self, codec: C) -> &mut Self
    where
        T: WireValue,
        C: Codec<T> + 'static,
    {
        let shared: SharedCodec<T> = Arc::new(codec);
        self.entries
            .insert(TypeTag::of::<T>(), Entry::Codec(Box::new(shared)));
        self
    }

    /// Mark `T` as having no wire form; [`resolve`](Self::resolve) returns `None`.
    pub fn deny<T: 'static>(&mut self) -> &mut Self {
        self.entries.insert(TypeTag::of::<T>(), Entry::Denied);
        self
    }

    /// `true` if `T` has an explicit entry (codec or denial).
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeTag::of::<T>())
    }

    /// Resolve the codec for `T`.
    ///
    /// Returns `None` only for denied types.
    #[must_use]
    pub fn resolve<T: WireValue>(&self) -> Option<SharedCodec<T>> {
        match self.entries.get(&TypeTag::of::<T>()) {
            Some(Entry::Codec(boxed)) => boxed.downcast_ref::<SharedCodec<T>>().cloned(),
            Some(Entry::Denied) => None,
            None => Some(Arc::new(JsonCodec::<T>::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn unit_is_denied_by_default() {
        let registry = CodecRegistry::default();
        assert!(registry.contains::<()>());
        assert!(registry.resolve::<()>().is_none());
    }

    #[test]
    fn unregistered_types_fall_back_to_json() {
        let registry = CodecRegistry::default();
        assert!(!registry.contains::<Vec<u32>>());
        let codec = registry.resolve::<BTreeMap<String, u32>>().unwrap();
        let mut m = BTreeMap::new();
        m.insert("a".to_string(), 1);
        assert_eq!(codec.encode(&m).unwrap(), br#"{"a":1}"#);
    }

    #[test]
    fn empty_registry_uses_json_for_scalars() {
        let registry = CodecRegistry::empty();
        let codec = registry.resolve::<String>().unwrap();
        assert_eq!(codec.encode(&"x".to_string()).unwrap(), br#""x""#);
    }
}
