//! Fetch results: valid instructions and recovered invalid spans.

use ydis_core::{
    bytes_to_word_big_endian, bytes_to_word_little_endian, Instruction, InstructionClass,
};

use crate::DecodeError;

/// Most bytes a single invalid span covers.
pub const RECOVERY_WINDOW: usize = 8;

/// Result of fetching one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedInstruction {
    /// A well-formed instruction.
    Valid(Instruction),
    /// Bytes that failed classification or validation.
    Invalid(InvalidSpan),
}

impl DecodedInstruction {
    /// Number of bytes consumed by this fetch.
    pub fn size(&self) -> usize {
        match self {
            Self::Valid(inst) => inst.size(),
            Self::Invalid(span) => span.len(),
        }
    }

    /// Returns the instruction class; `Invalid` for recovered spans.
    pub fn class(&self) -> InstructionClass {
        match self {
            Self::Valid(inst) => inst.class(),
            Self::Invalid(_) => InstructionClass::Invalid,
        }
    }

    /// Returns the instruction if it decoded validly.
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            Self::Valid(inst) => Some(inst),
            Self::Invalid(_) => None,
        }
    }

    /// Returns the invalid span if decoding failed.
    pub fn invalid_span(&self) -> Option<&InvalidSpan> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(span) => Some(span),
        }
    }

    /// Returns true for a valid instruction.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns true for a valid `halt`.
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::Valid(Instruction::Halt))
    }
}

/// Raw bytes re-read from the start of a rejected instruction.
///
/// A full window becomes one `.quad`; a window cut short by end of stream
/// becomes one `.byte` per remaining byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSpan {
    address: u64,
    bytes: [u8; RECOVERY_WINDOW],
    len: usize,
    fault: DecodeError,
}

impl InvalidSpan {
    /// Creates a span from the bytes read at `address`. At most
    /// [`RECOVERY_WINDOW`] bytes are kept.
    pub fn new(address: u64, raw: &[u8], fault: DecodeError) -> Self {
        let len = raw.len().min(RECOVERY_WINDOW);
        let mut bytes = [0u8; RECOVERY_WINDOW];
        bytes[..len].copy_from_slice(&raw[..len]);
        Self {
            address,
            bytes,
            len,
            fault,
        }
    }

    /// Address of the first byte.
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no bytes could be read.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The raw bytes, in stream order.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Why the bytes were rejected.
    pub fn fault(&self) -> &DecodeError {
        &self.fault
    }

    /// Returns true if the span fills the whole recovery window.
    pub fn is_quad(&self) -> bool {
        self.len == RECOVERY_WINDOW
    }

    /// The span as a little-endian word, when it fills the window.
    pub fn quad_value(&self) -> Option<u64> {
        self.is_quad()
            .then(|| bytes_to_word_little_endian(self.bytes))
    }

    /// Returns the directive lines that represent this span.
    pub fn directives(&self) -> Vec<Directive> {
        if let Some(value) = self.quad_value() {
            return vec![Directive {
                address: self.address,
                kind: DirectiveKind::Quad,
                hex: format!("{:016x}", bytes_to_word_big_endian(self.bytes)),
                value,
            }];
        }

        self.bytes()
            .iter()
            .zip(self.address..)
            .map(|(&byte, address)| Directive {
                address,
                kind: DirectiveKind::Byte,
                hex: format!("{byte:02x}"),
                value: u64::from(byte),
            })
            .collect()
    }
}

/// Data directive used for bytes that are not instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Quad,
    Byte,
}

impl DirectiveKind {
    /// Assembler spelling, e.g. `.quad`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Quad => ".quad",
            Self::Byte => ".byte",
        }
    }
}

/// One directive line of an invalid span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub address: u64,
    pub kind: DirectiveKind,
    /// The covered bytes as hex, in stream order.
    pub hex: String,
    pub value: u64,
}
