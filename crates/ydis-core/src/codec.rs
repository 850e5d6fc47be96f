//! Byte-level encoding of Y86-64 instructions.
//!
//! Immediates, displacements and targets are stored least-significant byte
//! first. Encoding is a pure function of the instruction fields, so a
//! listing never echoes input bytes it did not understand.

use std::fmt;

use crate::register::{join_reg_pair, NO_REGISTER};
use crate::Instruction;

/// Longest encoding (`irmovq`, `rmmovq`, `mrmovq`).
pub const MAX_INSTRUCTION_SIZE: usize = 10;

/// Base opcode bytes; the low nibble carries the function code.
pub mod opcode {
    pub const HALT: u8 = 0x00;
    pub const NOP: u8 = 0x10;
    pub const CMOVXX: u8 = 0x20;
    pub const IRMOVQ: u8 = 0x30;
    pub const RMMOVQ: u8 = 0x40;
    pub const MRMOVQ: u8 = 0x50;
    pub const OPQ: u8 = 0x60;
    pub const JXX: u8 = 0x70;
    pub const CALL: u8 = 0x80;
    pub const RET: u8 = 0x90;
    pub const PUSHQ: u8 = 0xA0;
    pub const POPQ: u8 = 0xB0;
}

/// Reads eight bytes as a word with byte 0 least significant.
pub fn bytes_to_word_little_endian(bytes: [u8; 8]) -> u64 {
    u64::from_le_bytes(bytes)
}

/// Reads eight bytes as a word with byte 0 most significant.
pub fn bytes_to_word_big_endian(bytes: [u8; 8]) -> u64 {
    u64::from_be_bytes(bytes)
}

/// Writes the encoding of `inst` into `buf` and returns its length.
pub fn encode_into(inst: &Instruction, buf: &mut [u8; MAX_INSTRUCTION_SIZE]) -> usize {
    buf[0] = inst.opcode();

    let mut len = 1;
    if inst.class().has_reg_pair() {
        let ra = inst.ra().map_or(NO_REGISTER, |r| r.id());
        let rb = inst.rb().map_or(NO_REGISTER, |r| r.id());
        buf[1] = join_reg_pair(ra, rb);
        len = 2;
    }

    if let Some(value) = inst.immediate() {
        buf[len..len + 8].copy_from_slice(&value.to_le_bytes());
        len += 8;
    }

    debug_assert_eq!(len, inst.size());
    len
}

/// An encoded instruction.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Encoded {
    buf: [u8; MAX_INSTRUCTION_SIZE],
    len: usize,
}

impl Encoded {
    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Returns the encoded length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; every instruction has an opcode byte.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bytes as lowercase hex, two digits per byte.
    pub fn to_hex(&self) -> String {
        hex_string(self.as_bytes())
    }
}

impl fmt::Debug for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Encoded({:02x?})", self.as_bytes())
    }
}

impl Instruction {
    /// Re-derives the encoding from the instruction fields.
    pub fn encode(&self) -> Encoded {
        let mut buf = [0u8; MAX_INSTRUCTION_SIZE];
        let len = encode_into(self, &mut buf);
        Encoded { buf, len }
    }
}

/// Formats bytes as lowercase hex with no separators.
pub fn hex_string(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
