//! The closed set of exception codes.

use std::fmt;

/// Exception codes carried by a raise.
///
/// Discriminants are stable for the lifetime of the process and double as
/// the integer resumption value of a scope. No two variants share a value.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExceptionCode {
    Success = 0,
    Failure = 1,
    Error = 2,
    Exception = 3,
    MemoryAllocation = 10,
    FileNotFound = 11,
    FloatingPoint = 12,
    NullPointer = 13,
    OutOfBounds = 14,
    IllegalArgument = 15,
    NetworkError = 16,
    Timeout = 17,
    DatabaseConnection = 18,
    InvalidFileFormat = 19,
    ParsingError = 20,
    InvalidInput = 21,
    InvalidOperation = 22,
    InvalidState = 23,
    InvalidFormat = 24,
    InvalidKey = 25,
    InvalidValue = 26,
    InvalidIndex = 27,
    InvalidSize = 28,
    InvalidLength = 29,
    InvalidRange = 30,
    InvalidArgument = 31,
    InvalidExpression = 32,
    PipeError = 33,
    BusError = 34,
    Quit = 35,
    Hangup = 36,
    IoError = 37,
    Eof = 38,
    NotFound = 39,
}

impl ExceptionCode {
    /// Every code, in ascending numeric order.
    pub const ALL: [ExceptionCode; 34] = [
        Self::Success,
        Self::Failure,
        Self::Error,
        Self::Exception,
        Self::MemoryAllocation,
        Self::FileNotFound,
        Self::FloatingPoint,
        Self::NullPointer,
        Self::OutOfBounds,
        Self::IllegalArgument,
        Self::NetworkError,
        Self::Timeout,
        Self::DatabaseConnection,
        Self::InvalidFileFormat,
        Self::ParsingError,
        Self::InvalidInput,
        Self::InvalidOperation,
        Self::InvalidState,
        Self::InvalidFormat,
        Self::InvalidKey,
        Self::InvalidValue,
        Self::InvalidIndex,
        Self::InvalidSize,
        Self::InvalidLength,
        Self::InvalidRange,
        Self::InvalidArgument,
        Self::InvalidExpression,
        Self::PipeError,
        Self::BusError,
        Self::Quit,
        Self::Hangup,
        Self::IoError,
        Self::Eof,
        Self::NotFound,
    ];

    /// Integer value of the code.
    #[inline]
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Looks up a code by integer value.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.as_raw() == raw)
    }

    /// The code a scope actually resumes with when `self` is raised.
    ///
    /// A restore point cannot tell a zero resumption value from its own first
    /// return, so raising [`Success`](Self::Success) resumes as
    /// [`Failure`](Self::Failure).
    #[inline]
    #[must_use]
    pub const fn resumption(self) -> Self {
        match self {
            Self::Success => Self::Failure,
            other => other,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Exception => "exception",
            Self::MemoryAllocation => "memory allocation failure",
            Self::FileNotFound => "file not found",
            Self::FloatingPoint => "floating point exception",
            Self::NullPointer => "null pointer",
            Self::OutOfBounds => "out of bounds",
            Self::IllegalArgument => "illegal argument",
            Self::NetworkError => "network error",
            Self::Timeout => "timeout",
            Self::DatabaseConnection => "database connection failure",
            Self::InvalidFileFormat => "invalid file format",
            Self::ParsingError => "parsing error",
            Self::InvalidInput => "invalid input",
            Self::InvalidOperation => "invalid operation",
            Self::InvalidState => "invalid state",
            Self::InvalidFormat => "invalid format",
            Self::InvalidKey => "invalid key",
            Self::InvalidValue => "invalid value",
            Self::InvalidIndex => "invalid index",
            Self::InvalidSize => "invalid size",
            Self::InvalidLength => "invalid length",
            Self::InvalidRange => "invalid range",
            Self::InvalidArgument => "invalid argument",
            Self::InvalidExpression => "invalid expression",
            Self::PipeError => "broken pipe",
            Self::BusError => "bus error",
            Self::Quit => "quit",
            Self::Hangup => "hangup",
            Self::IoError => "i/o error",
            Self::Eof => "end of file",
            Self::NotFound => "not found",
        }
    }
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl From<ExceptionCode> for i32 {
    #[inline]
    fn from(code: ExceptionCode) -> Self {
        code.as_raw()
    }
}
