//! Process bootstrap: configuration, fault translation, exit-time teardown
//! and the root runner for `main`.

use std::io;
use std::process::ExitCode;
use std::sync::Once;
use std::sync::atomic::{AtomicUsize, Ordering};

use cprime_core::config::{self, RuntimeConfig};
use cprime_core::except::fault::install_panic_filter;
use cprime_core::except::{Exception, root_scope};
use cprime_core::stdio::global_tracker;

use crate::signal_abi::install_fault_handlers;

static TEARDOWN_RELEASED: AtomicUsize = AtomicUsize::new(0);

/// What [`init`] set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    /// The configuration now in force (the earlier one if already pinned).
    pub config: RuntimeConfig,
    /// Signal handlers installed by this call.
    pub handlers_installed: usize,
    /// Whether this call registered the exit hook.
    pub exit_hook_registered: bool,
}

extern "C" fn teardown_at_exit() {
    let released = global_tracker().teardown();
    TEARDOWN_RELEASED.store(released, Ordering::Relaxed);
}

/// Registers the global tracker teardown with `atexit(3)`. Runs once.
pub fn register_exit_teardown() -> io::Result<bool> {
    static REGISTER: Once = Once::new();
    let mut result = Ok(false);
    REGISTER.call_once(|| {
        // SAFETY: `teardown_at_exit` is a plain `extern "C" fn()` with no
        // captured state; registering it is always sound.
        let rc = unsafe { libc::atexit(teardown_at_exit) };
        result = if rc == 0 {
            Ok(true)
        } else {
            Err(io::Error::other("atexit registration failed"))
        };
    });
    result
}

/// Strings the exit hook released (zero until it has run).
#[must_use]
pub fn released_at_exit() -> usize {
    TEARDOWN_RELEASED.load(Ordering::Relaxed)
}

/// Brings the runtime up. Call once at the top of `main`, before any scope.
///
/// With faults set to `off` no signal handler and no panic filter is
/// installed.
pub fn init(config: RuntimeConfig) -> io::Result<StartupReport> {
    config::set_runtime_config(config);
    let config = config::runtime_config();
    let mut handlers_installed = 0;
    if config.faults.translates() {
        install_panic_filter();
        handlers_installed = install_fault_handlers()?;
    }
    let exit_hook_registered = register_exit_teardown()?;
    Ok(StartupReport {
        config,
        handlers_installed,
        exit_hook_registered,
    })
}

/// Runs `body` as a program's main: environment config, [`init`], then a
/// root scope. An uncaught code becomes the exit status.
pub fn main(body: impl FnOnce() -> Result<(), Exception>) -> ExitCode {
    if let Err(err) = init(RuntimeConfig::from_env()) {
        eprintln!("cprime: startup failed: {err}");
        return ExitCode::FAILURE;
    }
    let status = root_scope(body);
    ExitCode::from(u8::try_from(status).unwrap_or(u8::MAX))
}
