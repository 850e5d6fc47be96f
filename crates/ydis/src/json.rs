//! JSON-lines listing: one object per listing line.

use std::io::{self, Write};

use serde::Serialize;
use ydis_core::Instruction;
use ydis_disasm::{format_operands, InvalidSpan, ListingSink};

#[derive(Debug, Serialize)]
struct Line<'a> {
    address: u64,
    bytes: String,
    mnemonic: &'a str,
    operands: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    instruction: Option<&'a Instruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault: Option<String>,
}

/// Writes each listing line as a JSON object followed by a newline.
pub struct JsonListing<W> {
    out: W,
}

impl<W: Write> JsonListing<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_line(&mut self, line: &Line<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> ListingSink for JsonListing<W> {
    fn instruction(&mut self, inst: &Instruction, address: u64) -> io::Result<()> {
        self.write_line(&Line {
            address,
            bytes: inst.encode().to_hex(),
            mnemonic: inst.mnemonic(),
            operands: format_operands(inst),
            instruction: Some(inst),
            fault: None,
        })
    }

    fn invalid(&mut self, span: &InvalidSpan) -> io::Result<()> {
        let fault = span.fault().to_string();
        for directive in span.directives() {
            self.write_line(&Line {
                address: directive.address,
                bytes: directive.hex,
                mnemonic: directive.kind.name(),
                operands: format!("{:#x}", directive.value),
                instruction: None,
                fault: Some(fault.clone()),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use ydis_core::Register;
    use ydis_disasm::DecodeError;

    fn lines(out: Vec<u8>) -> Vec<Value> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_instruction_line() {
        let mut out = Vec::new();
        let inst = Instruction::Irmovq {
            rb: Register::Rdx,
            imm: 16,
        };
        JsonListing::new(&mut out).instruction(&inst, 0x1021).unwrap();

        let lines = lines(out);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["address"], 0x1021);
        assert_eq!(lines[0]["bytes"], "30f21000000000000000");
        assert_eq!(lines[0]["mnemonic"], "irmovq");
        assert_eq!(lines[0]["operands"], "$0x10, %rdx");
        assert_eq!(lines[0]["instruction"]["class"], "irmovq");
        assert!(lines[0].get("fault").is_none());
    }

    #[test]
    fn test_invalid_span_lines_carry_fault() {
        let mut out = Vec::new();
        let span = InvalidSpan::new(0x49, &[0x05, 0x06], DecodeError::unknown_opcode(0x49, 0x05));
        JsonListing::new(&mut out).invalid(&span).unwrap();

        let lines = lines(out);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["address"], 0x4a);
        assert_eq!(lines[1]["mnemonic"], ".byte");
        assert_eq!(lines[1]["operands"], "0x6");
        assert_eq!(lines[0]["fault"], "unknown opcode 0x05 at 0x49");
        assert!(lines[0].get("instruction").is_none());
    }
}
