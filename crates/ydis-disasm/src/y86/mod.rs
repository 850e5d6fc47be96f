//! Y86-64 instruction decoder.
//!
//! Y86-64 is a small x86-64 flavoured teaching ISA: one opcode byte whose
//! high nibble selects the class and low nibble the function, an optional
//! reg-pair byte, and an optional 8-byte little-endian constant. Encodings
//! are 1, 2, 9 or 10 bytes long.

mod decoder;

pub use decoder::Y86Disassembler;
