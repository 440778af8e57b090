use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use cprime_core::except::{ExceptionCode, ResultExt, ScopeExit, try_scope};
use cprime_core::stdio::{AllocationTracker, FileTokenizer, InteractiveReader, Tokenizer};

fn fixture(name: &str, contents: &[u8]) -> PathBuf {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let path = std::env::temp_dir().join(format!(
        "cprime-{}-{}-{}",
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed),
        name
    ));
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn scenario_mixed_scalars_and_tokens() {
    let path = fixture("mixed.txt", b"42\n3.5\nhello world\n");
    let mut reader = FileTokenizer::open(&path).unwrap();
    assert_eq!(reader.next_int().unwrap(), Some(42));
    assert_eq!(reader.next_double().unwrap(), Some(3.5));
    assert_eq!(reader.next_token().unwrap().as_deref(), Some("hello"));
    assert_eq!(reader.next_token().unwrap().as_deref(), Some("world"));
    assert!(!reader.has_next().unwrap());
    reader.close();
    fs::remove_file(path).ok();
}

#[test]
fn scenario_missing_file_is_caught_and_execution_continues() {
    let missing = std::env::temp_dir().join("cprime-does-not-exist.txt");
    let after = AtomicUsize::new(0);
    let exit = try_scope(|| {
        let reader = FileTokenizer::open(&missing)?;
        reader.close();
        Ok("opened")
    })
    .catch(ExceptionCode::FileNotFound, |_| "caught")
    .finally(|| {
        after.fetch_add(1, Ordering::Relaxed);
    })
    .run();
    assert_eq!(
        exit,
        ScopeExit::Caught {
            code: ExceptionCode::FileNotFound,
            value: "caught"
        }
    );
    assert_eq!(after.load(Ordering::Relaxed), 1);
}

#[test]
fn scenario_missing_file_via_or_raise() {
    let exit = try_scope(|| {
        let reader = FileTokenizer::open("").or_raise();
        reader.close();
        Ok(())
    })
    .catch(ExceptionCode::IllegalArgument, |_| ())
    .run();
    assert_eq!(exit.code(), Some(ExceptionCode::IllegalArgument));
}

#[test]
fn scenario_carriage_return_tokens() {
    let path = fixture("cr.txt", b"A B\rC");
    let mut reader = FileTokenizer::open(&path).unwrap();
    let mut tokens = Vec::new();
    while let Some(token) = reader.next_token().unwrap() {
        tokens.push(token);
    }
    assert_eq!(tokens, ["A", "B", "C"]);
    fs::remove_file(path).ok();
}

#[test]
fn lines_match_under_every_terminator() {
    let lines = ["alpha", "", "beta gamma", "\tdelta"];
    for terminator in ["\n", "\r", "\r\n"] {
        let joined = lines.join(terminator);
        let mut reader = Tokenizer::new(joined.as_bytes());
        let mut got = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            got.push(line);
        }
        assert_eq!(got, lines, "terminator {terminator:?}");
    }
}

#[test]
fn tokens_rejoin_to_the_normalized_text() {
    let text = "  one two\r\nthree\rfour   five\n\n six";
    let mut reader = Tokenizer::new(text.as_bytes());
    let mut tokens = Vec::new();
    while let Some(token) = reader.next_token().unwrap() {
        assert!(!token.is_empty());
        assert!(!token.contains([' ', '\r', '\n']));
        tokens.push(token);
    }
    let normalized = text.split([' ', '\r', '\n']).filter(|s| !s.is_empty()).collect::<Vec<_>>();
    assert_eq!(tokens, normalized);
}

#[test]
fn scalar_round_trip_through_a_file() {
    let ints = [0i32, -1, 77, i32::MIN, i32::MAX - 1];
    let longs = [i64::MIN, -5, 1 << 40, i64::MAX - 1];
    let doubles = [0.5f64, -1024.25, 3.0];
    let floats = [1.5f32, -0.75];
    let mut text = String::new();
    for n in ints {
        text.push_str(&format!("{n} "));
    }
    for n in longs {
        text.push_str(&format!("{n}\n"));
    }
    for x in doubles {
        text.push_str(&format!("{x}\r\n"));
    }
    for x in floats {
        text.push_str(&format!("{x}\r"));
    }
    let path = fixture("scalars.txt", text.as_bytes());
    let mut reader = FileTokenizer::open(&path).unwrap();
    for n in ints {
        assert_eq!(reader.next_int().unwrap(), Some(n));
    }
    for n in longs {
        assert_eq!(reader.next_long().unwrap(), Some(n));
    }
    for x in doubles {
        assert_eq!(reader.next_double().unwrap(), Some(x));
    }
    for x in floats {
        assert_eq!(reader.next_float().unwrap(), Some(x));
    }
    assert!(!reader.has_next().unwrap());
    fs::remove_file(path).ok();
}

#[test]
fn interactive_reader_registers_every_line() {
    let tracker = AllocationTracker::new();
    let mut out = Vec::new();
    {
        let mut reader = InteractiveReader::new(&b"Ada\n36\n"[..], &mut out, &tracker);
        let name = reader.read_line(Some(format_args!("name: "))).unwrap();
        let age = reader.read_typed::<i32>(Some(format_args!("age: "))).unwrap();
        assert_eq!(name.as_deref(), Some("Ada"));
        assert_eq!(age, Some(36));
    }
    assert_eq!(out, b"name: age: ");
    assert_eq!(tracker.len(), 1);
    assert_eq!(tracker.teardown(), 1);
    assert_eq!(tracker.teardown(), 0);
}
