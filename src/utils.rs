//! Utility types for Ironstream.

use serde::{Deserialize, Serialize};

/// A complex number with real and imaginary parts of type `T`.
///
/// Used as the value type for complex-valued records; the wire form is
/// `(re+imi)`, see [`ComplexCodec`](crate::codec::ComplexCodec).
///
/// # Examples
///
/// ```
/// use ironstream::utils::Complex64;
///
/// let z = Complex64::new(1.5, -2.0);
/// assert_eq!(z.re, 1.5);
/// assert_eq!(z.im, -2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

/// Complex number with `f32` parts.
pub type Complex32 = Complex<f32>;

/// Complex number with `f64` parts.
pub type Complex64 = Complex<f64>;

impl<T> Complex<T> {
    #[inline]
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}
