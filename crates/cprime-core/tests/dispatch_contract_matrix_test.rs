use std::cell::{Cell, RefCell};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use cprime_core::except::{Exception, ExceptionCode, ScopeExit, raise, try_scope};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Completed,
    Returned,
    Raised,
}

#[derive(Clone, Copy)]
struct Case {
    delivery: Delivery,
    code: ExceptionCode,
    labels: &'static [ExceptionCode],
    /// Index into `labels` of the handler that must run.
    expected_handler: Option<usize>,
    expected_code: Option<ExceptionCode>,
}

fn workspace_root() -> PathBuf {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest.parent().unwrap().parent().unwrap().to_path_buf()
}

fn delivery_name(delivery: Delivery) -> &'static str {
    match delivery {
        Delivery::Completed => "completed",
        Delivery::Returned => "returned",
        Delivery::Raised => "raised",
    }
}

fn matrix_cases() -> Vec<Case> {
    use ExceptionCode::*;
    let mut cases = Vec::new();
    for delivery in [Delivery::Returned, Delivery::Raised] {
        cases.extend([
            Case {
                delivery,
                code: FileNotFound,
                labels: &[FileNotFound],
                expected_handler: Some(0),
                expected_code: Some(FileNotFound),
            },
            Case {
                delivery,
                code: Timeout,
                labels: &[FileNotFound, Timeout, Timeout],
                expected_handler: Some(1),
                expected_code: Some(Timeout),
            },
            Case {
                delivery,
                code: InvalidRange,
                labels: &[InvalidKey, InvalidValue],
                expected_handler: None,
                expected_code: Some(InvalidRange),
            },
            Case {
                delivery,
                code: MemoryAllocation,
                labels: &[],
                expected_handler: None,
                expected_code: Some(MemoryAllocation),
            },
            Case {
                delivery,
                code: Success,
                labels: &[Success, Failure],
                expected_handler: Some(1),
                expected_code: Some(Failure),
            },
            Case {
                delivery,
                code: Failure,
                labels: &[Failure],
                expected_handler: Some(0),
                expected_code: Some(Failure),
            },
        ]);
    }
    cases.push(Case {
        delivery: Delivery::Completed,
        code: Success,
        labels: &[Success, Failure],
        expected_handler: None,
        expected_code: None,
    });
    cases
}

fn run_case(case: Case) -> (Option<usize>, Option<ExceptionCode>, usize) {
    let ran = Cell::new(None);
    let finally_runs = Cell::new(0usize);
    let mut scope = try_scope(|| -> Result<(), Exception> {
        match case.delivery {
            Delivery::Completed => Ok(()),
            Delivery::Returned => Err(case.code.into()),
            Delivery::Raised => raise(case.code),
        }
    });
    for (index, &label) in case.labels.iter().enumerate() {
        let ran = &ran;
        scope = scope.catch(label, move |_| ran.set(Some(index)));
    }
    let exit = scope.finally(|| finally_runs.set(finally_runs.get() + 1)).run();
    let code = exit.code();
    if case.expected_handler.is_none() && case.delivery != Delivery::Completed {
        assert!(matches!(exit, ScopeExit::Swallowed(_)));
    }
    (ran.get(), code, finally_runs.get())
}

#[test]
fn dispatch_contract_matrix() {
    let root = workspace_root();
    let out_dir = root.join("target/conformance");
    fs::create_dir_all(&out_dir).expect("create target/conformance");
    let log_path = out_dir.join("dispatch_contract_matrix.log.jsonl");

    let mut log_lines = Vec::new();
    let mut mismatches = Vec::new();
    let cases = matrix_cases();

    for case in &cases {
        let t0 = Instant::now();
        let (handler, code, finally_runs) = run_case(*case);
        let timing_ns = t0.elapsed().as_nanos();

        let ok = handler == case.expected_handler
            && code == case.expected_code
            && finally_runs == 1;
        if !ok {
            mismatches.push(format!(
                "{}:{:?} expected(handler={:?}, code={:?}, finally=1) got(handler={:?}, code={:?}, finally={})",
                delivery_name(case.delivery),
                case.code,
                case.expected_handler,
                case.expected_code,
                handler,
                code,
                finally_runs
            ));
        }

        log_lines.push(format!(
            "{{\"trace_id\":\"dispatch-contract:{}:{}\",\"handler\":{},\"code\":{},\"finally_runs\":{},\"timing_ns\":{},\"status\":\"{}\"}}",
            delivery_name(case.delivery),
            case.code.as_raw(),
            handler.map_or("null".to_string(), |h| h.to_string()),
            code.map_or("null".to_string(), |c| c.as_raw().to_string()),
            finally_runs,
            timing_ns,
            if ok { "ok" } else { "mismatch" }
        ));
    }

    fs::write(&log_path, format!("{}\n", log_lines.join("\n"))).expect("write jsonl log");

    assert!(
        mismatches.is_empty(),
        "dispatch contract mismatch(es): {:?}",
        mismatches
    );
}

#[test]
fn nested_scopes_unwind_innermost_first() {
    let trail = RefCell::new(Vec::new());
    let exit = try_scope(|| {
        let inner = try_scope(|| -> Result<u8, Exception> { raise(ExceptionCode::InvalidIndex) })
            .catch(ExceptionCode::InvalidIndex, |_| {
                trail.borrow_mut().push("inner");
                1
            })
            .finally(|| trail.borrow_mut().push("inner finally"))
            .run();
        trail.borrow_mut().push("after inner");
        inner.value().ok_or(Exception::new(ExceptionCode::InvalidState))
    })
    .catch(ExceptionCode::InvalidIndex, |_| {
        trail.borrow_mut().push("outer");
        0
    })
    .finally(|| trail.borrow_mut().push("outer finally"))
    .run();

    assert_eq!(exit, ScopeExit::Completed(1));
    assert_eq!(
        *trail.borrow(),
        ["inner", "inner finally", "after inner", "outer finally"]
    );
}

#[test]
fn raise_skips_intermediate_frames() {
    fn deep(n: u32) -> u32 {
        if n == 0 {
            raise(ExceptionCode::NetworkError);
        }
        deep(n - 1) + 1
    }
    let exit = try_scope(|| Ok(deep(64)))
        .catch(ExceptionCode::NetworkError, |e| e.code().as_raw() as u32)
        .run();
    assert_eq!(
        exit,
        ScopeExit::Caught {
            code: ExceptionCode::NetworkError,
            value: 16
        }
    );
}

#[test]
fn scopes_are_per_thread() {
    let handle = std::thread::spawn(|| {
        try_scope(|| -> Result<usize, Exception> { raise(ExceptionCode::Quit) })
            .catch(ExceptionCode::Quit, |_| cprime_core::except::depth())
            .run()
            .value()
    });
    let outer = try_scope(|| Ok(cprime_core::except::depth())).run();
    assert_eq!(handle.join().unwrap(), Some(0));
    assert_eq!(outer, ScopeExit::Completed(1));
}
