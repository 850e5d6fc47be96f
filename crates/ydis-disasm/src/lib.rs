//! # ydis-disasm
//!
//! Y86-64 instruction decoding for ydis.
//!
//! The crate turns a seekable byte stream into a listing:
//! - [`Y86Disassembler`] classifies and validates one instruction at a time
//! - rejected bytes are recovered as an [`InvalidSpan`] of at most eight bytes
//! - [`TextListing`] renders the fixed-column text format
//! - [`Scanner`] walks a whole stream, skipping zero padding

pub mod decoded;
pub mod error;
pub mod render;
pub mod scan;
pub mod source;
pub mod traits;
pub mod y86;

pub use decoded::{DecodedInstruction, Directive, DirectiveKind, InvalidSpan, RECOVERY_WINDOW};
pub use error::DecodeError;
pub use render::{
    format_directive, format_instruction, format_operands, render, render_invalid, ListingSink,
    TextListing,
};
pub use scan::{next_non_zero, ScanConfig, ScanSummary, Scanner};
pub use source::ByteSource;
pub use traits::Disassembler;
pub use y86::Y86Disassembler;
