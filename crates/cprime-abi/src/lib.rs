//! # cprime-abi
//!
//! OS boundary for `cprime-core`.
//!
//! Everything that needs `unsafe` lives here: `sigaction` handlers that
//! translate faults into exception codes, the `atexit` hook that tears down
//! the process-wide allocation tracker, and the bootstrap that wires both up
//! before a program's main body runs.
//!
//! ```no_run
//! use cprime_core::except::ExceptionCode;
//! use cprime_core::throw;
//!
//! fn main() -> std::process::ExitCode {
//!     cprime_abi::main(|| {
//!         throw!(ExceptionCode::InvalidState, "nothing to do");
//!     })
//! }
//! ```

pub mod signal_abi;
pub mod startup_abi;

pub use signal_abi::{install_fault_handlers, signal_from_number, signal_number};
pub use startup_abi::{StartupReport, init, main};
