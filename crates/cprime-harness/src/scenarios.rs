//! Built-in scenarios exercising the exception channel and the readers
//! end to end.

use std::cell::Cell;
use std::fs;
use std::hint::black_box;
use std::path::PathBuf;

use cprime_core::except::{Exception, ExceptionCode, ResultExt, ScopeExit, raise, try_scope};
use cprime_core::stdio::{FileTokenizer, GrowBuf};

use crate::structured_log::Outcome;

/// What one scenario observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub outcome: Outcome,
    /// Code the scope dispatched, if any.
    pub code: Option<ExceptionCode>,
    /// Lines the scenario would have printed, in order.
    pub transcript: Vec<String>,
}

impl ScenarioReport {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            outcome: Outcome::Fail,
            code: None,
            transcript: Vec::new(),
        }
    }

    fn pass_if(mut self, ok: bool) -> Self {
        self.outcome = if ok { Outcome::Pass } else { Outcome::Fail };
        self
    }
}

/// A named, self-checking run.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    run: fn() -> ScenarioReport,
}

impl Scenario {
    #[must_use]
    pub fn run(&self) -> ScenarioReport {
        (self.run)()
    }
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "division_by_zero",
        description: "integer division by zero is caught as a floating point exception",
        run: division_by_zero,
    },
    Scenario {
        name: "file_not_found",
        description: "opening a missing file is caught and execution continues",
        run: file_not_found,
    },
    Scenario {
        name: "allocation_failure",
        description: "a buffer over its byte limit raises memory allocation; finally runs",
        run: allocation_failure,
    },
    Scenario {
        name: "multiple_catch",
        description: "the first matching catch runs and later statements are skipped",
        run: multiple_catch,
    },
    Scenario {
        name: "nested_propagation",
        description: "a raise inside a handler reaches the enclosing scope",
        run: nested_propagation,
    },
    Scenario {
        name: "success_resumption",
        description: "raising success resumes the scope as failure",
        run: success_resumption,
    },
    Scenario {
        name: "file_reader",
        description: "lines, tokens, scalars and chars read from one file",
        run: file_reader,
    },
];

/// Looks a scenario up by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name == name)
}

fn division_by_zero() -> ScenarioReport {
    let mut report = ScenarioReport::new("division_by_zero");
    let x = black_box(3);
    let y = black_box(0);
    let exit = try_scope(|| Ok(format!("{}", x / y)))
        .catch(ExceptionCode::FloatingPoint, |_| "Division by zero exception".to_string())
        .run();
    report.code = exit.code();
    let caught = exit.code() == Some(ExceptionCode::FloatingPoint);
    report.transcript.extend(exit.value());
    report.pass_if(caught)
}

fn file_not_found() -> ScenarioReport {
    let mut report = ScenarioReport::new("file_not_found");
    let path = std::env::temp_dir().join("cprime-scenario-missing/file.txt");
    let exit = try_scope(|| {
        FileTokenizer::open(&path)?.close();
        Ok("File opened successfully")
    })
    .catch(ExceptionCode::FileNotFound, |_| "File not found exception")
    .run();
    report.code = exit.code();
    let caught = matches!(exit, ScopeExit::Caught { code: ExceptionCode::FileNotFound, .. });
    report.transcript.extend(exit.value().map(str::to_owned));
    report.transcript.push("continued".to_string());
    report.pass_if(caught)
}

fn allocation_failure() -> ScenarioReport {
    let mut report = ScenarioReport::new("allocation_failure");
    let finally_ran = Cell::new(false);
    let exit = try_scope(|| {
        let mut buf = GrowBuf::new().with_limit(Some(64));
        for byte in std::iter::repeat_n(b'x', 1 << 20) {
            buf.append(byte).or_raise();
        }
        Ok("Memory allocated successfully")
    })
    .catch(ExceptionCode::MemoryAllocation, |_| "Memory allocation exception")
    .finally(|| finally_ran.set(true))
    .run();
    report.code = exit.code();
    let caught = exit.code() == Some(ExceptionCode::MemoryAllocation);
    report.transcript.extend(exit.value().map(str::to_owned));
    if finally_ran.get() {
        report.transcript.push("Finally block in memory test".to_string());
    }
    report.pass_if(caught && finally_ran.get())
}

fn multiple_catch() -> ScenarioReport {
    let mut report = ScenarioReport::new("multiple_catch");
    let reached_second = Cell::new(false);
    let exit = try_scope(|| -> Result<&'static str, Exception> {
        if black_box(true) {
            raise(ExceptionCode::FileNotFound);
        }
        reached_second.set(true);
        raise(ExceptionCode::FloatingPoint)
    })
    .catch(ExceptionCode::FileNotFound, |_| "File not found exception")
    .catch(ExceptionCode::FloatingPoint, |_| "Division by zero exception")
    .catch(ExceptionCode::FileNotFound, |_| "shadowed handler")
    .run();
    report.code = exit.code();
    let value = exit.value();
    report.transcript.extend(value.map(str::to_owned));
    report.pass_if(value == Some("File not found exception") && !reached_second.get())
}

fn nested_propagation() -> ScenarioReport {
    let mut report = ScenarioReport::new("nested_propagation");
    let exit = try_scope(|| {
        try_scope(|| -> Result<(), Exception> { raise(ExceptionCode::ParsingError) })
            .catch(ExceptionCode::ParsingError, |_| raise(ExceptionCode::InvalidFormat))
            .run();
        Ok("inner scope swallowed the raise")
    })
    .catch(ExceptionCode::InvalidFormat, |e| {
        if e.code() == ExceptionCode::InvalidFormat {
            "outer scope caught invalid format"
        } else {
            "wrong code"
        }
    })
    .run();
    report.code = exit.code();
    let value = exit.value();
    report.transcript.extend(value.map(str::to_owned));
    report.pass_if(value == Some("outer scope caught invalid format"))
}

fn success_resumption() -> ScenarioReport {
    let mut report = ScenarioReport::new("success_resumption");
    let exit = try_scope(|| -> Result<(), Exception> { raise(ExceptionCode::Success) })
        .catch(ExceptionCode::Failure, |_| ())
        .run();
    report.code = exit.code();
    report
        .transcript
        .push(format!("resumed with {:?}", exit.code()));
    report.pass_if(exit.code() == Some(ExceptionCode::Failure))
}

const READER_FIXTURE: &str =
    "first line\n42\n3.25\nalpha beta gamma delta\nrest of line\n1234567890\n2.5\nx yz";

fn reader_fixture() -> Result<PathBuf, Exception> {
    let path = std::env::temp_dir().join(format!("cprime-reader-{}.txt", std::process::id()));
    fs::write(&path, READER_FIXTURE)?;
    Ok(path)
}

fn file_reader() -> ScenarioReport {
    let mut report = ScenarioReport::new("file_reader");
    let exit = try_scope(|| {
        let path = reader_fixture()?;
        let mut lines = Vec::new();
        let mut reader = FileTokenizer::open(&path)?;
        while reader.has_next()? {
            lines.extend(reader.next_line()?);
        }
        reader.close();

        let mut reader = FileTokenizer::open(&path)?;
        let first = reader.next_line()?.unwrap_or_default();
        let second = reader.next_int()?;
        let third = reader.next_float()?;
        let mut words = Vec::new();
        for _ in 0..4 {
            words.extend(reader.next_token()?);
        }
        let rest = reader.next_line()?.unwrap_or_default();
        let long = reader.next_long()?;
        let double = reader.next_double()?;
        let chars = [reader.next_char()?, reader.next_char()?, reader.next_char()?];
        let exhausted = !reader.has_next()?;
        reader.close();
        fs::remove_file(&path).ok();

        let ok = lines.len() == 8
            && first == "first line"
            && second == Some(42)
            && third == Some(3.25)
            && words == ["alpha", "beta", "gamma", "delta"]
            && rest == "rest of line"
            && long == Some(1_234_567_890)
            && double == Some(2.5)
            && chars == [Some('x'), Some('y'), Some('z')]
            && exhausted;
        let mut transcript = lines;
        transcript.push(format!("{first} {second:?} {third:?}"));
        transcript.push(words.join(" "));
        transcript.push(rest);
        transcript.push(format!("{long:?} {double:?} {chars:?}"));
        Ok((ok, transcript))
    })
    .catch(ExceptionCode::FileNotFound, |e| {
        (false, vec![format!("File not found exception in file reader: {e}")])
    })
    .run();
    report.code = exit.code();
    let (ok, transcript) = exit.value().unwrap_or_default();
    report.transcript = transcript;
    report.pass_if(ok)
}
