//! Numeric text conversion.
//!
//! [`conversion`] mirrors the C `strto*` family (prefix parse, consumed
//! length, range status); [`scalar`] layers the strict whole-text rules the
//! readers apply on top of it.

pub mod conversion;
pub mod scalar;

pub use scalar::{OrSentinel, Scalar};
