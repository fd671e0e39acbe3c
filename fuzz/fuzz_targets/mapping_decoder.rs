#![no_main]

use libfuzzer_sys::fuzz_target;
use zkpoll_reconciler::services::codec::{decode_mapping, decode_poll_record};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let _ = decode_mapping(&raw);
    let _ = decode_poll_record(0, &raw);
});
