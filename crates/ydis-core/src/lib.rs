//! # ydis-core
//!
//! Core types for the ydis Y86-64 disassembler. This crate defines the
//! register file, the instruction classes with their condition and
//! operation sub-types, and the byte codec shared by the decoder and the
//! listing renderer.

pub mod codec;
pub mod error;
pub mod instruction;
pub mod register;

pub use codec::{
    bytes_to_word_big_endian, bytes_to_word_little_endian, encode_into, hex_string, Encoded,
    MAX_INSTRUCTION_SIZE,
};
pub use error::Error;
pub use instruction::{ArithOp, Condition, Instruction, InstructionClass};
pub use register::{join_reg_pair, split_reg_pair, Register, NO_REGISTER};
