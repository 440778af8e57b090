use std::io;

use crate::except::ExceptionCode;
use crate::except::scope::raise_exception;

/// A raised exception: a code plus an optional out-of-band detail.
///
/// Dispatch only ever looks at the code; the detail exists for diagnostics.
///
/// # Display Format
///
/// `{code}` or `{code}: {detail}`, e.g. `file not found: data.txt`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}{}", render_detail(.detail))]
pub struct Exception {
    code: ExceptionCode,
    detail: Option<String>,
}

fn render_detail(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {detail}"),
        None => String::new(),
    }
}

impl Exception {
    #[must_use]
    pub const fn new(code: ExceptionCode) -> Self {
        Self { code, detail: None }
    }

    /// Creates an exception carrying a human-readable detail.
    #[must_use]
    pub fn with_detail(code: ExceptionCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: Some(detail.into()),
        }
    }

    #[inline]
    #[must_use]
    pub const fn code(&self) -> ExceptionCode {
        self.code
    }

    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The same exception with the code a scope resumes with.
    #[must_use]
    pub(crate) fn into_resumption(mut self) -> Self {
        self.code = self.code.resumption();
        self
    }
}

impl From<ExceptionCode> for Exception {
    #[inline]
    fn from(code: ExceptionCode) -> Self {
        Self::new(code)
    }
}

/// Exception code an I/O failure of `kind` surfaces as.
#[must_use]
pub fn code_for_io_kind(kind: io::ErrorKind) -> ExceptionCode {
    match kind {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => ExceptionCode::FileNotFound,
        io::ErrorKind::InvalidInput => ExceptionCode::IllegalArgument,
        io::ErrorKind::OutOfMemory => ExceptionCode::MemoryAllocation,
        io::ErrorKind::BrokenPipe => ExceptionCode::PipeError,
        io::ErrorKind::TimedOut => ExceptionCode::Timeout,
        io::ErrorKind::UnexpectedEof => ExceptionCode::Eof,
        _ => ExceptionCode::IoError,
    }
}

impl From<io::Error> for Exception {
    fn from(err: io::Error) -> Self {
        Self::with_detail(code_for_io_kind(err.kind()), err.to_string())
    }
}

/// Bridges return-based errors into the non-local channel.
pub trait ResultExt<T> {
    /// Returns the value, or raises the error at the innermost active scope.
    fn or_raise(self) -> T;
}

impl<T, E: Into<Exception>> ResultExt<T> for Result<T, E> {
    #[track_caller]
    fn or_raise(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => raise_exception(err.into()),
        }
    }
}
