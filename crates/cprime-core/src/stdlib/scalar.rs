//! Strict full-match scalar parsing shared by the interactive reader and the
//! file tokenizer.
//!
//! A text parses only if the whole of it is consumed: no leading whitespace,
//! no trailing bytes, no range error. Floats must be finite and written in
//! plain decimal (any of `xXeEpP` rejects the text). The maximum value of each
//! type is reserved as its [`Scalar::SENTINEL`] and is never produced by a
//! successful parse, so a sentinel can only mean "missing".

use crate::ctype::{is_float_marker, is_space};
use crate::stdlib::conversion::{ConversionStatus, strtod, strtof, strtol};

/// A value the readers can produce from one line or token.
pub trait Scalar: Copy + Sized {
    /// Stand-in for "no value": end of input or a malformed text.
    const SENTINEL: Self;

    /// Parses `text` in full, or returns `None`.
    fn parse_strict(text: &[u8]) -> Option<Self>;
}

/// Extension for collapsing an optional scalar into its sentinel.
pub trait OrSentinel<T: Scalar> {
    fn or_sentinel(self) -> T;
}

impl<T: Scalar> OrSentinel<T> for Option<T> {
    #[inline]
    fn or_sentinel(self) -> T {
        self.unwrap_or(T::SENTINEL)
    }
}

#[inline]
fn starts_cleanly(text: &[u8]) -> bool {
    text.first().is_some_and(|&c| !is_space(c))
}

fn parse_i64(text: &[u8]) -> Option<i64> {
    if !starts_cleanly(text) {
        return None;
    }
    let (val, consumed, status) = strtol(text);
    (status == ConversionStatus::Success && consumed == text.len()).then_some(val)
}

impl Scalar for i32 {
    const SENTINEL: Self = i32::MAX;

    fn parse_strict(text: &[u8]) -> Option<Self> {
        let n = parse_i64(text)?;
        if n >= i64::from(i32::MIN) && n < i64::from(i32::MAX) {
            Some(n as i32)
        } else {
            None
        }
    }
}

impl Scalar for i64 {
    const SENTINEL: Self = i64::MAX;

    fn parse_strict(text: &[u8]) -> Option<Self> {
        parse_i64(text).filter(|&n| n < i64::MAX)
    }
}

macro_rules! float_scalar {
    ($ty:ty, $conv:ident) => {
        impl Scalar for $ty {
            const SENTINEL: Self = <$ty>::MAX;

            fn parse_strict(text: &[u8]) -> Option<Self> {
                if !starts_cleanly(text) || text.iter().any(|&c| is_float_marker(c)) {
                    return None;
                }
                let (val, consumed, status) = $conv(text);
                if status != ConversionStatus::Success || consumed != text.len() {
                    return None;
                }
                (val.is_finite() && val < <$ty>::MAX).then_some(val)
            }
        }
    };
}

float_scalar!(f32, strtof);
float_scalar!(f64, strtod);

impl Scalar for char {
    const SENTINEL: Self = '\u{7f}';

    /// Exactly one byte.
    fn parse_strict(text: &[u8]) -> Option<Self> {
        match text {
            [c] => Some(char::from(*c)),
            _ => None,
        }
    }
}
