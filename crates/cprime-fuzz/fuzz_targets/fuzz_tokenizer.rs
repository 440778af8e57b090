#![no_main]
use libfuzzer_sys::fuzz_target;

use cprime_core::stdio::{GrowBuf, Tokenizer};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, input)) = data.split_first() else {
        return;
    };
    let limit = usize::from(selector % 32) + 1;
    let mut t = Tokenizer::new(input).with_buffer(GrowBuf::new().with_limit(Some(limit)));

    // Interleaved reads must terminate and never yield data past the end.
    for step in 0..=input.len() {
        let Ok(more) = t.has_next() else {
            return;
        };
        if !more {
            break;
        }
        match (step + usize::from(selector)) % 5 {
            0 => {
                if let Ok(Some(line)) = t.next_line() {
                    assert!(!line.contains('\n'));
                }
            }
            1 => {
                if let Ok(Some(token)) = t.next_token() {
                    assert!(!token.contains([' ', '\r', '\n']));
                }
            }
            2 => {
                if let Ok(Some(c)) = t.next_char() {
                    assert!(!c.is_ascii_whitespace());
                }
            }
            3 => {
                let _ = t.next_int();
            }
            _ => {
                let _ = t.next_double();
            }
        }
    }
    assert_eq!(t.next_char().ok().flatten(), None);
});
