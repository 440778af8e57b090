//! Fault translator: `sigaction` handlers feeding the exception channel.
//!
//! The handler itself only touches atomics (through
//! [`cprime_core::except::fault::note_signal`]) and `write(2)`. Asynchronous
//! signals are parked in the pending slot for the next checkpoint; synchronous
//! faults print a diagnostic and die with the default action.

use std::ffi::c_int;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use cprime_core::except::fault::{FaultKind, SignalDisposition, note_signal};
use cprime_core::except::Signal;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Host signal number for `signal`.
#[must_use]
pub fn signal_number(signal: Signal) -> c_int {
    match signal {
        Signal::Fpe => libc::SIGFPE,
        Signal::Segv => libc::SIGSEGV,
        Signal::Abrt => libc::SIGABRT,
        Signal::Ill => libc::SIGILL,
        Signal::Term => libc::SIGTERM,
        Signal::Int => libc::SIGINT,
        Signal::Bus => libc::SIGBUS,
        Signal::Pipe => libc::SIGPIPE,
        Signal::Hup => libc::SIGHUP,
        Signal::Quit => libc::SIGQUIT,
    }
}

/// Translated signal for a host signal number.
#[must_use]
pub fn signal_from_number(signum: c_int) -> Option<Signal> {
    Signal::ALL.iter().copied().find(|&s| signal_number(s) == signum)
}

#[inline]
fn write_stderr(bytes: &[u8]) {
    // SAFETY: write(2) is async-signal-safe; the slice is valid for reads.
    unsafe {
        libc::write(libc::STDERR_FILENO, bytes.as_ptr().cast(), bytes.len());
    }
}

/// `fatal fault: SIGSEGV -> null pointer`, written piecewise without
/// allocating.
fn write_fatal_diagnostic(signal: Signal) {
    write_stderr(b"fatal fault: ");
    write_stderr(signal.name().as_bytes());
    write_stderr(b" -> ");
    write_stderr(signal.code().describe().as_bytes());
    write_stderr(b"\n");
}

/// Puts back the default action and delivers `signum` again.
unsafe fn die_with_default(signum: c_int) {
    // SAFETY: zeroed sigaction is a valid SIG_DFL disposition with empty mask.
    let mut act = unsafe { std::mem::zeroed::<libc::sigaction>() };
    act.sa_sigaction = libc::SIG_DFL;
    unsafe {
        libc::sigaction(signum, &act, std::ptr::null_mut());
        libc::raise(signum);
    }
}

extern "C" fn fault_handler(signum: c_int) {
    let Some(signal) = signal_from_number(signum) else {
        return;
    };
    if note_signal(signal) == SignalDisposition::Deferred {
        return;
    }
    if signal.kind() == FaultKind::Synchronous {
        write_fatal_diagnostic(signal);
    }
    // SAFETY: sigaction and raise are async-signal-safe.
    unsafe { die_with_default(signum) };
}

/// Installs the translator for every signal in the table.
///
/// `SA_RESTART` is left out: blocking reads must return
/// `EINTR` and reach a checkpoint. Idempotent: later calls return `Ok(0)`.
pub fn install_fault_handlers() -> io::Result<usize> {
    if INSTALLED.swap(true, Ordering::AcqRel) {
        return Ok(0);
    }
    let mut installed = 0;
    for signal in Signal::ALL {
        // SAFETY: zeroed sigaction, then filled with a valid handler and mask.
        let mut act = unsafe { std::mem::zeroed::<libc::sigaction>() };
        act.sa_sigaction = fault_handler as extern "C" fn(c_int) as libc::sighandler_t;
        act.sa_flags = 0;
        let rc = unsafe {
            libc::sigemptyset(&mut act.sa_mask);
            libc::sigaction(signal_number(signal), &act, std::ptr::null_mut())
        };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        installed += 1;
    }
    Ok(installed)
}

/// Whether [`install_fault_handlers`] has run.
#[must_use]
pub fn handlers_installed() -> bool {
    INSTALLED.load(Ordering::Acquire)
}
