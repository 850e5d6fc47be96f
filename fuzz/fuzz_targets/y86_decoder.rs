#![no_main]

use libfuzzer_sys::fuzz_target;
use ydis_disasm::{Disassembler, Y86Disassembler, RECOVERY_WINDOW};

fuzz_target!(|data: &[u8]| {
    let disasm = Y86Disassembler::new();

    // Decode a single instruction
    if let Ok(inst) = disasm.decode_instruction(data, 0x1000) {
        assert_eq!(inst.encode().as_bytes(), &data[..inst.size()]);
    }

    // Decode every instruction, recovering from rejected bytes
    let mut address = 0u64;
    while let Some(decoded) = disasm.decode_at(data, address) {
        let size = decoded.size();
        assert!((1..=10).contains(&size));
        if !decoded.is_valid() {
            assert!(size <= RECOVERY_WINDOW);
        }
        address += size as u64;
    }
    assert_eq!(address, data.len() as u64);
});
