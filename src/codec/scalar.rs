//! Codecs for scalar types: booleans, floats, complex numbers, integers and
//! strings.

use super::Codec;
use crate::error::{MalformedKind, StreamResult, StreamingError};
use crate::utils::Complex;
use std::any::type_name;
use std::fmt::Display;
use std::marker::PhantomData;
use std::num::{IntErrorKind, ParseFloatError, ParseIntError};
use std::str::FromStr;

fn as_text<'a>(raw: &'a [u8], target: &'static str) -> StreamResult<&'a str> {
    std::str::from_utf8(raw)
        .map_err(|e| StreamingError::malformed_with(raw, target, MalformedKind::Encoding, e))
}

/// `true` / `false`.
///
/// Decoding also accepts `t`/`f` and `1`/`0`; letters are case-insensitive.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolCodec;

impl Codec<bool> for BoolCodec {
    fn encode(&self, value: &bool) -> StreamResult<Vec<u8>> {
        let s: &[u8] = if *value { b"true" } else { b"false" };
        Ok(s.to_vec())
    }

    fn decode(&self, raw: &[u8]) -> StreamResult<bool> {
        let text = as_text(raw, "bool")?;
        if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("t") || text == "1" {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") || text.eq_ignore_ascii_case("f") || text == "0"
        {
            Ok(false)
        } else {
            Err(StreamingError::malformed(raw, "bool", MalformedKind::Syntax))
        }
    }
}

/// Integer types the integer codec accepts.
pub trait WireInt: FromStr<Err = ParseIntError> + Display + 'static {
    const SIGNED: bool;
}

macro_rules! impl_wire_int {
    ($signed:literal: $($t:ty),+) => {
        $(
            impl WireInt for $t {
                const SIGNED: bool = $signed;
            }
        )+
    };
}

impl_wire_int!(true: i8, i16, i32, i64, i128, isize);
impl_wire_int!(false: u8, u16, u32, u64, u128, usize);

/// Base-10 integers of any width, signed or unsigned.
///
/// Out-of-range text (including a negative number for an unsigned type) is a
/// [`MalformedKind::Range`] error; the value is never wrapped. Only signed
/// types accept a leading `+`.
pub struct IntegerCodec<T>(PhantomData<fn() -> T>);

impl<T> IntegerCodec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for IntegerCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WireInt> Codec<T> for IntegerCodec<T> {
    fn encode(&self, value: &T) -> StreamResult<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn decode(&self, raw: &[u8]) -> StreamResult<T> {
        let target = type_name::<T>();
        let text = as_text(raw, target)?;
        if !T::SIGNED && text.starts_with('+') {
            return Err(StreamingError::malformed(raw, target, MalformedKind::Syntax));
        }
        text.parse::<T>().map_err(|e| {
            let kind = match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => MalformedKind::Range,
                IntErrorKind::InvalidDigit if is_negative_integer(text) => MalformedKind::Range,
                _ => MalformedKind::Syntax,
            };
            StreamingError::malformed_with(raw, target, kind, e)
        })
    }
}

// A well-formed negative number only fails with InvalidDigit for unsigned targets.
fn is_negative_integer(text: &str) -> bool {
    text.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Floating point types the float and complex codecs accept.
pub trait WireFloat: Copy + Display + FromStr<Err = ParseFloatError> + 'static {
    fn is_infinite(self) -> bool;
    fn is_nan(self) -> bool;
    fn is_sign_negative(self) -> bool;
    fn zero() -> Self;
}

macro_rules! impl_wire_float {
    ($($t:ty),+) => {
        $(
            impl WireFloat for $t {
                #[inline]
                fn is_infinite(self) -> bool { <$t>::is_infinite(self) }
                #[inline]
                fn is_nan(self) -> bool { <$t>::is_nan(self) }
                #[inline]
                fn is_sign_negative(self) -> bool { <$t>::is_sign_negative(self) }
                #[inline]
                fn zero() -> Self { 0.0 }
            }
        )+
    };
}

impl_wire_float!(f32, f64);

fn parse_float<T: WireFloat>(raw: &[u8], text: &str, target: &'static str) -> StreamResult<T> {
    let value = text
        .parse::<T>()
        .map_err(|e| StreamingError::malformed_with(raw, target, MalformedKind::Syntax, e))?;
    if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
        return Err(StreamingError::malformed(raw, target, MalformedKind::Range));
    }
    Ok(value)
}

/// Plain decimal notation with the fewest digits that round-trip at the
/// value's width. `inf`, `-inf` and `NaN` are written as such.
pub struct FloatCodec<T>(PhantomData<fn() -> T>);

impl<T> FloatCodec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FloatCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WireFloat> Codec<T> for FloatCodec<T> {
    fn encode(&self, value: &T) -> StreamResult<Vec<u8>> {
        Ok(value.to_string().into_bytes())
    }

    fn decode(&self, raw: &[u8]) -> StreamResult<T> {
        let target = type_name::<T>();
        let text = as_text(raw, target)?;
        parse_float(raw, text, target)
    }
}

/// `(re+imi)`, each part written like [`FloatCodec`].
///
/// Decoding accepts the parentheses as optional, and pure real (`3`) or pure
/// imaginary (`2i`) forms.
pub struct ComplexCodec<T>(PhantomData<fn() -> T>);

impl<T> ComplexCodec<T> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ComplexCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WireFloat> Codec<Complex<T>> for ComplexCodec<T> {
    fn encode(&self, value: &Complex<T>) -> StreamResult<Vec<u8>> {
        let sign = if value.im.is_nan() || !value.im.is_sign_negative() {
            "+"
        } else {
            ""
        };
        Ok(format!("({}{}{}i)", value.re, sign, value.im).into_bytes())
    }

    fn decode(&self, raw: &[u8]) -> StreamResult<Complex<T>> {
        let target = type_name::<Complex<T>>();
        let text = as_text(raw, target)?;
        let body = match text.strip_prefix('(') {
            Some(inner) => inner
                .strip_suffix(')')
                .ok_or_else(|| StreamingError::malformed(raw, target, MalformedKind::Syntax))?,
            None => text,
        };
        if body.is_empty() {
            return Err(StreamingError::malformed(raw, target, MalformedKind::Syntax));
        }

        let Some(imag) = body.strip_suffix('i') else {
            let re = parse_float(raw, body, target)?;
            return Ok(Complex::new(re, T::zero()));
        };
        match split_point(imag) {
            Some(at) => {
                let re = parse_float(raw, &imag[..at], target)?;
                let im = parse_float(raw, &imag[at..], target)?;
                Ok(Complex::new(re, im))
            }
            None => {
                let im = parse_float(raw, imag, target)?;
                Ok(Complex::new(T::zero(), im))
            }
        }
    }
}

// Index of the sign that starts the imaginary part, skipping a leading sign
// and exponent signs.
fn split_point(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (1..bytes.len()).find(|&i| {
        matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E')
    })
}

/// UTF-8 text, written verbatim.
///
/// Encoding rejects strings containing `\n`, which would split the record.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringCodec;

impl Codec<String> for StringCodec {
    fn encode(&self, value: &String) -> StreamResult<Vec<u8>> {
        if value.contains('\n') {
            return Err(StreamingError::Encode {
                target: type_name::<String>(),
                reason: "value contains a line terminator".into(),
            });
        }
        Ok(value.as_bytes().to_vec())
    }

    fn decode(&self, raw: &[u8]) -> StreamResult<String> {
        as_text(raw, type_name::<String>()).map(str::to_owned)
    }
}
