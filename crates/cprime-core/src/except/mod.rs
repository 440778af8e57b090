//! Exception channel: codes, scopes and fault translation.
//!
//! ```
//! use cprime_core::except::{ExceptionCode, ScopeExit, try_scope};
//! use cprime_core::throw;
//!
//! let exit = try_scope(|| {
//!     throw!(ExceptionCode::FileNotFound, "{}", "missing.txt");
//! })
//! .catch(ExceptionCode::FileNotFound, |e| e.to_string())
//! .run();
//! assert_eq!(
//!     exit,
//!     ScopeExit::Caught {
//!         code: ExceptionCode::FileNotFound,
//!         value: "file not found: missing.txt".to_string(),
//!     }
//! );
//! ```

pub mod code;
pub mod exception;
pub mod fault;
pub mod scope;

pub use code::ExceptionCode;
pub use exception::{Exception, ResultExt, code_for_io_kind};
pub use fault::{Signal, checkpoint};
pub use scope::{ScopeExit, Try, Uncaught, depth, raise, raise_exception, root_scope, try_scope};

/// Returns `Err` from the enclosing function or scope body.
///
/// `throw!(code)` or `throw!(code, "format", args...)` for a detail.
#[macro_export]
macro_rules! throw {
    ($code:expr $(,)?) => {
        return ::core::result::Result::Err(
            $crate::except::Exception::new($code).into(),
        )
    };
    ($code:expr, $($arg:tt)+) => {
        return ::core::result::Result::Err(
            $crate::except::Exception::with_detail($code, ::std::format!($($arg)+)).into(),
        )
    };
}

/// Raises non-locally to the innermost scope on this thread.
#[macro_export]
macro_rules! raise {
    ($code:expr $(,)?) => {
        $crate::except::raise($code)
    };
    ($code:expr, $($arg:tt)+) => {
        $crate::except::raise_exception($crate::except::Exception::with_detail(
            $code,
            ::std::format!($($arg)+),
        ))
    };
}
