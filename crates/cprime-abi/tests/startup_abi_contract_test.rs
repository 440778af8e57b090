//! Integration tests for process bootstrap and live signal translation.
//!
//! One test function: handlers and the pending slot are process-wide.

use cprime_abi::signal_abi::handlers_installed;
use cprime_abi::startup_abi::released_at_exit;
use cprime_abi::{init, signal_number};
use cprime_core::config::{FaultPolicy, RuntimeConfig};
use cprime_core::except::{Exception, ExceptionCode, Signal, checkpoint, try_scope};
use cprime_core::stdio::global_tracker;

#[test]
fn startup_contract() {
    let report = init(RuntimeConfig {
        faults: FaultPolicy::Translate,
        buffer_limit: None,
    })
    .expect("init");
    assert!(report.config.faults.translates());
    assert_eq!(report.handlers_installed, Signal::ALL.len());
    assert!(report.exit_hook_registered);
    assert!(handlers_installed());

    let again = init(RuntimeConfig::default()).expect("second init");
    assert_eq!(again.handlers_installed, 0);
    assert!(!again.exit_hook_registered);

    // A hangup delivered while a scope is active is parked, then raised at
    // the checkpoint.
    let exit = try_scope(|| -> Result<Option<String>, Exception> {
        // SAFETY: raise(3) on the current thread with an installed handler.
        let rc = unsafe { libc::raise(signal_number(Signal::Hup)) };
        assert_eq!(rc, 0);
        checkpoint()?;
        Ok(None)
    })
    .catch(ExceptionCode::Hangup, |e| e.detail().map(str::to_owned))
    .run();
    assert_eq!(exit.value(), Some(Some("SIGHUP".to_string())));

    // Broken pipe on a write becomes PipeError instead of killing the
    // process.
    let exit = try_scope(|| -> Result<(), Exception> {
        // SAFETY: raise(3) on the current thread with an installed handler.
        unsafe { libc::raise(signal_number(Signal::Pipe)) };
        Ok(())
    })
    .catch(ExceptionCode::PipeError, |_| ())
    .run();
    assert_eq!(exit.code(), Some(ExceptionCode::PipeError));

    // Translated panics stay quiet and still dispatch.
    let divisor = std::hint::black_box(0u32);
    let exit = try_scope(|| Ok(7 / divisor))
        .catch(ExceptionCode::FloatingPoint, |_| 0)
        .run();
    assert_eq!(exit.code(), Some(ExceptionCode::FloatingPoint));

    global_tracker().track("kept until exit".to_string());
    assert_eq!(released_at_exit(), 0);
}
