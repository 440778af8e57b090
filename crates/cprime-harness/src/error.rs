//! Harness error type.

use cprime_core::except::{Exception, ExceptionCode, code_for_io_kind};

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Exception(#[from] Exception),
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
}

impl HarnessError {
    /// Exception code this error would surface as.
    #[must_use]
    pub fn code(&self) -> ExceptionCode {
        match self {
            Self::Io(err) => code_for_io_kind(err.kind()),
            Self::Json(_) => ExceptionCode::ParsingError,
            Self::Exception(e) => e.code(),
            Self::UnknownScenario(_) => ExceptionCode::NotFound,
        }
    }
}

impl From<HarnessError> for Exception {
    fn from(err: HarnessError) -> Self {
        match err {
            HarnessError::Exception(e) => e,
            other => Exception::with_detail(other.code(), other.to_string()),
        }
    }
}
