//! Try scopes: restore points, dispatch and `finally`.
//!
//! Every thread owns a stack of scope frames. A frame is pushed while a body
//! runs and popped before any handler or `finally` executes, so a raise from
//! inside a handler lands in the enclosing scope.
//!
//! A body reports a failure either by returning `Err(Exception)` or by a
//! non-local [`raise`]. Both reach the same dispatch.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::except::fault::{self, checkpoint};
use crate::except::{Exception, ExceptionCode};

thread_local! {
    /// Height of this thread's scope stack.
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Frames active across all threads. Read by the signal handler.
static ACTIVE_SCOPES: AtomicUsize = AtomicUsize::new(0);

/// Unwinding payload of a raise. Only scope frames catch it.
pub(crate) struct Raised(pub(crate) Exception);

/// Unwinding payload of a raise made with no scope on the thread.
///
/// Scopes never translate it, so it ends the raising thread. `join` on that
/// thread returns it as the error payload.
#[derive(Debug)]
pub struct Uncaught(pub Exception);

/// Number of scopes active on the calling thread.
#[must_use]
pub fn depth() -> usize {
    DEPTH.with(Cell::get)
}

/// Number of scopes active anywhere in the process.
#[must_use]
pub fn active_scopes() -> usize {
    ACTIVE_SCOPES.load(Ordering::Acquire)
}

struct Frame;

impl Frame {
    fn push() -> Self {
        DEPTH.with(|d| d.set(d.get() + 1));
        ACTIVE_SCOPES.fetch_add(1, Ordering::AcqRel);
        Frame
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
        ACTIVE_SCOPES.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Transfers control to the innermost scope on this thread.
///
/// With no scope active on this thread, a diagnostic naming the code goes to
/// standard error and the thread unwinds with an [`Uncaught`] payload. Other
/// threads keep running; on the main thread the process exits.
#[track_caller]
pub fn raise_exception(exception: Exception) -> ! {
    if depth() == 0 {
        let location = panic::Location::caller();
        eprintln!(
            "uncaught exception: {} (code {}) at {location}",
            exception,
            exception.code().resumption().as_raw()
        );
        panic::resume_unwind(Box::new(Uncaught(exception)));
    }
    panic::resume_unwind(Box::new(Raised(exception)))
}

/// [`raise_exception`] with a bare code.
#[track_caller]
pub fn raise(code: ExceptionCode) -> ! {
    raise_exception(Exception::new(code))
}

/// How a scope was left.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeExit<T> {
    /// The body returned normally.
    Completed(T),
    /// A handler registered for `code` ran and produced `value`.
    Caught { code: ExceptionCode, value: T },
    /// Nothing matched; the exception was discarded.
    Swallowed(Exception),
}

impl<T> ScopeExit<T> {
    /// The value from the body or the handler.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Completed(value) | Self::Caught { value, .. } => Some(value),
            Self::Swallowed(_) => None,
        }
    }

    /// The code that was dispatched, if any.
    #[must_use]
    pub fn code(&self) -> Option<ExceptionCode> {
        match self {
            Self::Completed(_) => None,
            Self::Caught { code, .. } => Some(*code),
            Self::Swallowed(e) => Some(e.code()),
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

type Handler<'a, T> = Box<dyn FnOnce(&Exception) -> T + 'a>;

/// A try construct under construction. Built by [`try_scope`].
#[must_use = "a scope does nothing until `run` is called"]
pub struct Try<'a, T, B> {
    body: B,
    handlers: Vec<(ExceptionCode, Handler<'a, T>)>,
    finally: Option<Box<dyn FnOnce() + 'a>>,
}

/// Starts a try construct around `body`.
pub fn try_scope<'a, T, B>(body: B) -> Try<'a, T, B>
where
    B: FnOnce() -> Result<T, Exception>,
{
    Try {
        body,
        handlers: Vec::new(),
        finally: None,
    }
}

impl<'a, T, B> Try<'a, T, B>
where
    B: FnOnce() -> Result<T, Exception>,
{
    /// Registers a handler. Handlers are tried in registration order and
    /// only the first match runs.
    pub fn catch(mut self, code: ExceptionCode, handler: impl FnOnce(&Exception) -> T + 'a) -> Self {
        self.handlers.push((code, Box::new(handler)));
        self
    }

    /// Sets the block that runs exactly once when the scope is left.
    pub fn finally(mut self, block: impl FnOnce() + 'a) -> Self {
        self.finally = Some(Box::new(block));
        self
    }

    /// Runs the body and dispatches whatever it raised.
    ///
    /// Panics that are not translated still run `finally` and then continue
    /// unwinding; so does a panic or raise from inside a handler.
    pub fn run(self) -> ScopeExit<T> {
        let Try {
            body,
            handlers,
            finally,
        } = self;

        let outcome = {
            let _frame = Frame::push();
            panic::catch_unwind(AssertUnwindSafe(body))
        };

        let failure = match outcome {
            Ok(Ok(value)) => match checkpoint() {
                Ok(()) => {
                    run_finally(finally);
                    return ScopeExit::Completed(value);
                }
                Err(pending) => pending,
            },
            Ok(Err(exception)) => exception,
            Err(payload) => match fault::translate_payload(payload) {
                Ok(exception) => exception,
                Err(payload) => {
                    run_finally(finally);
                    panic::resume_unwind(payload)
                }
            },
        };
        let exception = failure.into_resumption();

        let exit = match handlers.into_iter().find(|(code, _)| *code == exception.code()) {
            Some((code, handler)) => {
                match panic::catch_unwind(AssertUnwindSafe(|| handler(&exception))) {
                    Ok(value) => ScopeExit::Caught { code, value },
                    Err(payload) => {
                        run_finally(finally);
                        panic::resume_unwind(payload)
                    }
                }
            }
            None => ScopeExit::Swallowed(exception),
        };
        run_finally(finally);
        exit
    }
}

fn run_finally(finally: Option<Box<dyn FnOnce() + '_>>) {
    if let Some(block) = finally {
        block();
    }
}

/// Baseline scope for a program's main body.
///
/// Returns the process exit status: `0` on completion, otherwise the
/// uncaught code's value after a diagnostic on standard error.
pub fn root_scope(body: impl FnOnce() -> Result<(), Exception>) -> i32 {
    match try_scope(body).run() {
        ScopeExit::Completed(()) | ScopeExit::Caught { .. } => 0,
        ScopeExit::Swallowed(exception) => {
            eprintln!("uncaught exception: {exception}");
            exception.code().as_raw()
        }
    }
}
