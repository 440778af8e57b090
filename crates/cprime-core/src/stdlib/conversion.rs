//! Numeric conversion functions (strtol, strtod, strtof), base 10 only.
//!
//! Each conversion returns `(value, consumed_bytes, status)` the way the C
//! functions report `endptr` and `errno`. A conversion that finds no digits
//! consumes nothing.

use crate::ctype::{is_digit, is_space};

/// Result of a string-to-number conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Success,
    Overflow,
    Underflow,
}

/// Decimal `strtol`: returns (value, consumed_bytes, status).
///
/// Leading whitespace is skipped and an optional sign accepted. Out of range
/// values saturate to `i64::MIN`/`i64::MAX` with a non-success status.
pub fn strtol(s: &[u8]) -> (i64, usize, ConversionStatus) {
    let mut i = 0;
    let len = s.len();

    while i < len && is_space(s[i]) {
        i += 1;
    }

    let mut negative = false;
    if i < len && s[i] == b'-' {
        negative = true;
        i += 1;
    } else if i < len && s[i] == b'+' {
        i += 1;
    }

    let abs_max = if negative {
        9_223_372_036_854_775_808u64
    } else {
        9_223_372_036_854_775_807u64
    };
    let cutoff = abs_max / 10;
    let cutlim = abs_max % 10;

    let mut acc: u64 = 0;
    let mut any_digits = false;
    let mut overflow = false;

    while i < len && is_digit(s[i]) {
        let digit = u64::from(s[i] - b'0');
        any_digits = true;
        if !overflow {
            if acc > cutoff || (acc == cutoff && digit > cutlim) {
                overflow = true;
            } else {
                acc = acc * 10 + digit;
            }
        }
        i += 1;
    }

    if !any_digits {
        return (0, 0, ConversionStatus::Success);
    }

    if overflow {
        return if negative {
            (i64::MIN, i, ConversionStatus::Underflow)
        } else {
            (i64::MAX, i, ConversionStatus::Overflow)
        };
    }

    let val = if negative {
        (acc as i64).wrapping_neg()
    } else {
        acc as i64
    };

    (val, i, ConversionStatus::Success)
}

/// Byte range of a float literal recognised by [`scan_float`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FloatSpan {
    start: usize,
    end: usize,
    /// A digit other than `0` appeared in the mantissa.
    nonzero_mantissa: bool,
}

fn eq_ignore_case(s: &[u8], at: usize, word: &[u8]) -> bool {
    s.len() >= at + word.len() && s[at..at + word.len()].eq_ignore_ascii_case(word)
}

/// Recognises `[ws][sign](digits[.digits]|.digits)[(e|E)[sign]digits]`
/// and `[ws][sign](inf|infinity|nan)`.
fn scan_float(s: &[u8]) -> Option<FloatSpan> {
    let len = s.len();
    let mut i = 0;
    while i < len && is_space(s[i]) {
        i += 1;
    }
    let start = i;
    if i < len && (s[i] == b'-' || s[i] == b'+') {
        i += 1;
    }

    if eq_ignore_case(s, i, b"infinity") {
        return Some(FloatSpan { start, end: i + 8, nonzero_mantissa: true });
    }
    if eq_ignore_case(s, i, b"inf") || eq_ignore_case(s, i, b"nan") {
        return Some(FloatSpan { start, end: i + 3, nonzero_mantissa: true });
    }

    let mut digits = 0usize;
    let mut nonzero_mantissa = false;
    while i < len && is_digit(s[i]) {
        nonzero_mantissa |= s[i] != b'0';
        digits += 1;
        i += 1;
    }
    if i < len && s[i] == b'.' {
        let mut j = i + 1;
        let mut frac = 0usize;
        while j < len && is_digit(s[j]) {
            nonzero_mantissa |= s[j] != b'0';
            frac += 1;
            j += 1;
        }
        if digits + frac > 0 {
            digits += frac;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if i < len && (s[i] == b'e' || s[i] == b'E') {
        let mut j = i + 1;
        if j < len && (s[j] == b'-' || s[j] == b'+') {
            j += 1;
        }
        let exp_start = j;
        while j < len && is_digit(s[j]) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    Some(FloatSpan { start, end: i, nonzero_mantissa })
}

macro_rules! float_conversion {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Decimal `", stringify!($name), "`: returns (value, consumed_bytes, status).")]
        ///
        /// Overflow yields an infinity with [`ConversionStatus::Overflow`];
        /// a non-zero literal that rounds to zero or a subnormal reports
        /// [`ConversionStatus::Underflow`].
        pub fn $name(s: &[u8]) -> ($ty, usize, ConversionStatus) {
            let Some(span) = scan_float(s) else {
                return (0.0, 0, ConversionStatus::Success);
            };
            let text = match std::str::from_utf8(&s[span.start..span.end]) {
                Ok(text) => text,
                Err(_) => return (0.0, 0, ConversionStatus::Success),
            };
            let Ok(val) = text.parse::<$ty>() else {
                return (0.0, 0, ConversionStatus::Success);
            };
            let literal_finite = !text
                .bytes()
                .any(|c| matches!(c, b'i' | b'I' | b'n' | b'N'));
            let status = if literal_finite && val.is_infinite() {
                ConversionStatus::Overflow
            } else if span.nonzero_mantissa && literal_finite && (val == 0.0 || val.is_subnormal()) {
                ConversionStatus::Underflow
            } else {
                ConversionStatus::Success
            };
            (val, span.end, status)
        }
    };
}

float_conversion!(strtod, f64);
float_conversion!(strtof, f32);
