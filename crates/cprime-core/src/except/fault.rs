//! Fault taxonomy: which OS signals and which language-level panics map onto
//! which exception codes, and the pending slot through which asynchronous
//! signals reach a checkpoint.
//!
//! Nothing here installs handlers. The OS boundary lives in `cprime-abi`,
//! which calls [`note_signal`] from inside its signal handler and consults
//! [`Signal::kind`] to decide between deferring and terminating.

use std::any::Any;
use std::panic;
use std::sync::Once;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::config;
use crate::except::scope::{Raised, active_scopes, depth};
use crate::except::{Exception, ExceptionCode};

/// How a signal may be delivered to a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Raised by the faulting instruction itself; resuming would re-execute
    /// it, so the process terminates with a diagnostic.
    Synchronous,
    /// Sent from outside; recorded and delivered at the next checkpoint.
    Asynchronous,
}

/// Signals covered by the fault translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Fpe,
    Segv,
    Abrt,
    Ill,
    Term,
    Int,
    Bus,
    Pipe,
    Hup,
    Quit,
}

impl Signal {
    pub const ALL: [Signal; 10] = [
        Self::Fpe,
        Self::Segv,
        Self::Abrt,
        Self::Ill,
        Self::Term,
        Self::Int,
        Self::Bus,
        Self::Pipe,
        Self::Hup,
        Self::Quit,
    ];

    /// Exception code the signal translates to.
    ///
    /// TERM and INT map to [`ExceptionCode::Timeout`]. That is an
    /// approximation: neither signal says anything about elapsed time.
    #[must_use]
    pub const fn code(self) -> ExceptionCode {
        match self {
            Self::Fpe => ExceptionCode::FloatingPoint,
            Self::Segv => ExceptionCode::NullPointer,
            Self::Abrt => ExceptionCode::MemoryAllocation,
            Self::Ill => ExceptionCode::IllegalArgument,
            Self::Term | Self::Int => ExceptionCode::Timeout,
            Self::Bus => ExceptionCode::BusError,
            Self::Pipe => ExceptionCode::PipeError,
            Self::Hup => ExceptionCode::Hangup,
            Self::Quit => ExceptionCode::Quit,
        }
    }

    #[must_use]
    pub const fn kind(self) -> FaultKind {
        match self {
            Self::Fpe | Self::Segv | Self::Abrt | Self::Ill | Self::Bus => FaultKind::Synchronous,
            Self::Term | Self::Int | Self::Pipe | Self::Hup | Self::Quit => {
                FaultKind::Asynchronous
            }
        }
    }

    /// Conventional upper-case name (`SIGFPE`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fpe => "SIGFPE",
            Self::Segv => "SIGSEGV",
            Self::Abrt => "SIGABRT",
            Self::Ill => "SIGILL",
            Self::Term => "SIGTERM",
            Self::Int => "SIGINT",
            Self::Bus => "SIGBUS",
            Self::Pipe => "SIGPIPE",
            Self::Hup => "SIGHUP",
            Self::Quit => "SIGQUIT",
        }
    }

    const fn slot(self) -> u8 {
        self as u8 + 1
    }

    fn from_slot(slot: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.slot() == slot)
    }
}

/// What the signal handler must do after [`note_signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDisposition {
    /// Recorded; the next checkpoint raises it.
    Deferred,
    /// Nobody can take it. Restore the default action and re-raise.
    Terminate,
}

/// Pending asynchronous signal, `0` when empty.
static PENDING: AtomicU8 = AtomicU8::new(0);

/// Records an asynchronous signal for later delivery.
///
/// Async-signal-safe: touches only atomics. A synchronous fault, a signal
/// arriving while no scope is active anywhere, or a second signal while one
/// is still pending all yield [`SignalDisposition::Terminate`].
pub fn note_signal(signal: Signal) -> SignalDisposition {
    if signal.kind() == FaultKind::Synchronous || active_scopes() == 0 {
        return SignalDisposition::Terminate;
    }
    match PENDING.compare_exchange(0, signal.slot(), Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => SignalDisposition::Deferred,
        Err(_) => SignalDisposition::Terminate,
    }
}

/// Takes the pending signal, leaving the slot empty.
pub fn take_pending() -> Option<Signal> {
    Signal::from_slot(PENDING.swap(0, Ordering::AcqRel))
}

/// Returns `true` if a signal is waiting for a checkpoint.
#[must_use]
pub fn is_pending() -> bool {
    PENDING.load(Ordering::Acquire) != 0
}

/// Delivers a pending asynchronous fault as an error.
///
/// Long-running bodies and blocking reads call this at points where it is
/// safe to abandon the current operation.
pub fn checkpoint() -> Result<(), Exception> {
    match take_pending() {
        Some(signal) => Err(Exception::with_detail(signal.code(), signal.name())),
        None => Ok(()),
    }
}

/// Panic message prefixes and the hardware fault each one stands in for.
/// `MIN / -1` traps like a division by zero on the hosts C runs on.
const PANIC_TABLE: [(&str, ExceptionCode); 10] = [
    ("attempt to divide by zero", ExceptionCode::FloatingPoint),
    ("attempt to calculate the remainder with a divisor of zero", ExceptionCode::FloatingPoint),
    ("attempt to divide with overflow", ExceptionCode::FloatingPoint),
    ("attempt to calculate the remainder with overflow", ExceptionCode::FloatingPoint),
    ("index out of bounds", ExceptionCode::OutOfBounds),
    ("range end index", ExceptionCode::OutOfBounds),
    ("range start index", ExceptionCode::OutOfBounds),
    ("slice index starts at", ExceptionCode::OutOfBounds),
    ("called `Option::unwrap()` on a `None` value", ExceptionCode::NullPointer),
    ("capacity overflow", ExceptionCode::MemoryAllocation),
];

fn payload_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}

/// Maps a panic message onto the exception it stands for, if any.
#[must_use]
pub fn classify_panic(message: &str) -> Option<ExceptionCode> {
    PANIC_TABLE
        .iter()
        .find(|(prefix, _)| message.starts_with(prefix))
        .map(|&(_, code)| code)
}

/// Turns an unwinding payload caught by a scope into an exception.
///
/// Raises always translate. Panics translate only when fault translation is
/// enabled and the message is in the table; anything else is handed back so
/// the scope can resume unwinding.
pub(crate) fn translate_payload(
    payload: Box<dyn Any + Send>,
) -> Result<Exception, Box<dyn Any + Send>> {
    let payload = match payload.downcast::<Raised>() {
        Ok(raised) => return Ok(raised.0),
        Err(payload) => payload,
    };
    if !config::fault_policy().translates() {
        return Err(payload);
    }
    let translated = payload_message(payload.as_ref())
        .and_then(|msg| classify_panic(msg).map(|code| Exception::with_detail(code, msg)));
    translated.ok_or(payload)
}

/// Silences the default panic report for panics a scope will translate.
///
/// Chains to the previously installed hook for everything else. Idempotent.
pub fn install_panic_filter() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let translated = depth() > 0
                && config::fault_policy().translates()
                && payload_message(info.payload()).is_some_and(|m| classify_panic(m).is_some());
            if !translated {
                previous(info);
            }
        }));
    });
}
