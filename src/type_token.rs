//! Type tags used to key the codec registry.
//!
//! A [`TypeTag`] pairs the `TypeId` of a value type with a readable name.
//! The registry resolves codecs by tag once, when a job is configured, so the
//! per-record path never inspects types.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A lightweight runtime type tag.
///
/// Equality and hashing only consider the `TypeId`; the name is carried for
/// error messages.
///
/// ```
/// use ironstream::type_token::TypeTag;
/// let tag = TypeTag::of::<u32>();
/// assert_eq!(tag.name, "u32");
/// assert_eq!(tag, TypeTag::of::<u32>());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TypeTag {
    /// Stable Rust type identifier.
    pub id: TypeId,
    /// Human-readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    /// Construct a tag for `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
