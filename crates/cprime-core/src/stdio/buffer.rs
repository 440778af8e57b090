//! Growable byte buffer backing every reader.
//!
//! Growth is amortized: by default capacity doubles starting from
//! [`INITIAL_CAPACITY`]. Allocation failure and an exceeded byte limit are
//! both reported as [`ExceptionCode::MemoryAllocation`] without touching the
//! bytes already accumulated.

use crate::except::{Exception, ExceptionCode};

/// Capacity reserved by the first append.
pub const INITIAL_CAPACITY: usize = 16;

/// How capacity grows when the buffer is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowthPolicy {
    /// Double the capacity.
    #[default]
    Doubling,
    /// Add a fixed number of bytes (at least one).
    Increment(usize),
}

impl GrowthPolicy {
    fn next_capacity(self, current: usize) -> Option<usize> {
        match self {
            Self::Doubling => current.max(INITIAL_CAPACITY / 2).checked_mul(2),
            Self::Increment(step) => current.checked_add(step.max(1)),
        }
    }
}

/// Owned, growable byte accumulator.
///
/// Invariants:
/// - `len() <= capacity()`
/// - `len() <= limit` when a limit is set
/// - capacity only grows between two `finalize` calls
#[derive(Debug, Default)]
pub struct GrowBuf {
    data: Vec<u8>,
    policy: GrowthPolicy,
    limit: Option<usize>,
}

impl GrowBuf {
    /// Doubling buffer without a limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Caps how many bytes one read may accumulate.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Appends one byte, growing per policy when full.
    pub fn append(&mut self, byte: u8) -> Result<(), Exception> {
        if self.limit.is_some_and(|limit| self.data.len() >= limit) {
            return Err(Exception::with_detail(
                ExceptionCode::MemoryAllocation,
                format!("buffer limit of {} bytes reached", self.data.len()),
            ));
        }
        if self.data.len() == self.data.capacity() {
            self.grow()?;
        }
        self.data.push(byte);
        Ok(())
    }

    fn grow(&mut self) -> Result<(), Exception> {
        let current = self.data.capacity();
        let mut target = self.policy.next_capacity(current).ok_or_else(|| {
            Exception::with_detail(ExceptionCode::MemoryAllocation, "capacity overflow")
        })?;
        if let Some(limit) = self.limit {
            target = target.min(limit.max(current + 1));
        }
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|err| Exception::with_detail(ExceptionCode::MemoryAllocation, err.to_string()))
    }

    /// Hands the accumulated text out, leaving the buffer empty.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD.
    pub fn finalize(&mut self) -> String {
        match String::from_utf8(self.finalize_bytes()) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }

    /// Hands the accumulated bytes out, shrunk to fit.
    pub fn finalize_bytes(&mut self) -> Vec<u8> {
        let mut bytes = std::mem::take(&mut self.data);
        bytes.shrink_to_fit();
        bytes
    }

    /// Drops the contents without handing them out.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}
