//! Error types shared by the codecs, the record layer and the execution loop.
//!
//! Two layers are used:
//! - [`StreamingError`] is the typed error produced by the library itself
//!   (configuration problems, malformed input lines, I/O failures).
//! - User hooks return [`anyhow::Result`]. Loop, cleanup and flush failures
//!   are folded into one outcome with [`merge_errors`], which produces a
//!   [`MultiError`] only when more than one failure happened.

use std::fmt;
use std::io;

use thiserror::Error;

/// Result alias for library operations that fail with a [`StreamingError`].
pub type StreamResult<T> = Result<T, StreamingError>;

/// Why a value could not be decoded from its wire text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// The text is not a valid spelling for the target type.
    Syntax,
    /// The text is well formed but outside the target type's range.
    Range,
    /// The bytes are not valid UTF-8.
    Encoding,
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Syntax => "invalid syntax",
            Self::Range => "value out of range",
            Self::Encoding => "invalid utf-8",
        };
        f.write_str(s)
    }
}

/// Errors raised by codecs, the record reader/writer and job validation.
#[derive(Debug, Error)]
pub enum StreamingError {
    /// A required codec is missing or a required hook was not provided.
    #[error("configuration error: {0}")]
    Config(String),

    /// A keyed input line had no tab separating key and value.
    #[error("malformed record: no key/value delimiter in line {:?}", String::from_utf8_lossy(.line))]
    MissingDelimiter { line: Vec<u8> },

    /// A key or value could not be decoded into its target type.
    #[error("malformed value {:?} for type {target}: {kind}{}", String::from_utf8_lossy(.raw), detail_suffix(.detail))]
    MalformedValue {
        raw: Vec<u8>,
        target: &'static str,
        kind: MalformedKind,
        detail: Option<String>,
    },

    /// A value could not be rendered as wire text.
    #[error("failed to encode value of type {target}: {reason}")]
    Encode { target: &'static str, reason: String },

    /// The input or output stream failed.
    #[error("i/o error while {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({d})"),
        None => String::new(),
    }
}

impl StreamingError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn malformed(raw: &[u8], target: &'static str, kind: MalformedKind) -> Self {
        Self::MalformedValue {
            raw: raw.to_vec(),
            target,
            kind,
            detail: None,
        }
    }

    pub(crate) fn malformed_with(
        raw: &[u8],
        target: &'static str,
        kind: MalformedKind,
        detail: impl fmt::Display,
    ) -> Self {
        Self::MalformedValue {
            raw: raw.to_vec(),
            target,
            kind,
            detail: Some(detail.to_string()),
        }
    }

    pub(crate) fn io(op: &'static str, source: io::Error) -> Self {
        Self::Io { op, source }
    }

    /// `true` for errors caused by the content of an input line.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MissingDelimiter { .. } | Self::MalformedValue { .. })
    }

    /// The decoding failure category, when this is a malformed value.
    #[must_use]
    pub fn malformed_kind(&self) -> Option<MalformedKind> {
        match self {
            Self::MalformedValue { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Several failures reported as one error.
///
/// Built through [`MultiError::push`] or [`merge_errors`]; nested composites
/// are flattened so a `MultiError` never contains another one.
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<anyhow::Error>,
}

impl MultiError {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error, splicing in the members of another composite.
    pub fn push(&mut self, err: anyhow::Error) {
        match err.downcast::<MultiError>() {
            Ok(other) => self.errors.extend(other.errors),
            Err(err) => self.errors.push(err),
        }
    }

    /// Add every present error.
    pub fn extend<I>(&mut self, errors: I)
    where
        I: IntoIterator<Item = Option<anyhow::Error>>,
    {
        for err in errors.into_iter().flatten() {
            self.push(err);
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collapse into a single outcome.
    ///
    /// No errors yields `Ok(())`, one error is returned as is, and two or
    /// more are returned as this composite.
    pub fn into_result(mut self) -> anyhow::Result<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(anyhow::Error::new(self)),
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("multiple errors occurred:")?;
        for err in &self.errors {
            write!(f, "\n - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiError {}

/// Merge optional errors into one outcome.
///
/// ```
/// use ironstream::error::merge_errors;
///
/// assert!(merge_errors([None, None]).is_ok());
/// let err = merge_errors([Some(anyhow::anyhow!("boom")), None]).unwrap_err();
/// assert_eq!(err.to_string(), "boom");
/// ```
pub fn merge_errors<I>(errors: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = Option<anyhow::Error>>,
{
    let mut multi = MultiError::new();
    multi.extend(errors);
    multi.into_result()
}
