//! Asynchronous signal delivery through the pending slot.
//!
//! Kept in its own test binary: the slot is process-wide and any scope
//! ending on another test thread would take the signal.

use cprime_core::except::fault::{SignalDisposition, is_pending, note_signal};
use cprime_core::except::{Exception, ExceptionCode, Signal, checkpoint, try_scope};

#[test]
fn pending_signal_lifecycle() {
    // No scope anywhere: the handler must fall back to the default action.
    assert_eq!(note_signal(Signal::Term), SignalDisposition::Terminate);
    assert!(!is_pending());

    // Delivered at an explicit checkpoint.
    let exit = try_scope(|| -> Result<Option<String>, Exception> {
        assert_eq!(note_signal(Signal::Hup), SignalDisposition::Deferred);
        assert_eq!(note_signal(Signal::Quit), SignalDisposition::Terminate);
        checkpoint()?;
        unreachable!("checkpoint must deliver the pending hangup")
    })
    .catch(ExceptionCode::Hangup, |e| e.detail().map(str::to_owned))
    .run();
    assert_eq!(exit.value(), Some(Some("SIGHUP".to_string())));
    assert!(!is_pending());

    // A body that never checks still sees it when the scope ends.
    let exit = try_scope(|| {
        assert_eq!(note_signal(Signal::Int), SignalDisposition::Deferred);
        Ok("finished")
    })
    .catch(ExceptionCode::Timeout, |_| "interrupted")
    .run();
    assert_eq!(exit.value(), Some("interrupted"));

    assert!(checkpoint().is_ok());
}
