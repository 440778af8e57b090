#![no_main]
use libfuzzer_sys::fuzz_target;

use cprime_core::stdio::{GrowBuf, GrowthPolicy};

fuzz_target!(|data: &[u8]| {
    let Some((&knob, bytes)) = data.split_first() else {
        return;
    };
    let policy = if knob & 1 == 0 {
        GrowthPolicy::Doubling
    } else {
        GrowthPolicy::Increment(usize::from(knob >> 1))
    };
    let limit = (knob & 0x80 != 0).then_some(usize::from(knob & 0x3f));
    let mut buf = GrowBuf::with_policy(policy).with_limit(limit);

    let mut accepted = Vec::new();
    for &b in bytes {
        if buf.append(b).is_ok() {
            accepted.push(b);
        }
        assert!(buf.len() <= buf.capacity());
        if let Some(limit) = limit {
            assert!(buf.len() <= limit);
        }
    }
    assert_eq!(buf.finalize_bytes(), accepted);
    assert!(buf.is_empty());
});
