#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use ydis_disasm::{ScanConfig, Scanner, TextListing};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the start offset and padding mode
    let config = ScanConfig {
        start_offset: u64::from(data[0] >> 1),
        skip_padding: data[0] & 1 == 0,
    };
    let code = &data[1..];

    let mut sink = TextListing::new(Vec::new());
    let summary = Scanner::new(config)
        .run(&mut Cursor::new(code), &mut sink)
        .expect("in-memory scan cannot fail");
    assert_eq!(summary.end_address, config.start_offset.max(code.len() as u64));

    let text = String::from_utf8(sink.into_inner()).expect("listing is ASCII");
    assert!(text.lines().all(|line| line.len() >= 40));
});
