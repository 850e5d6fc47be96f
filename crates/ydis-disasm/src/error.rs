//! Disassembly error types.

use thiserror::Error;
use ydis_core::InstructionClass;

/// Reason an instruction could not be decoded.
///
/// None of these are fatal: the decoder turns each one into an invalid span
/// and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Opcode byte not in the encoding table.
    #[error("unknown opcode {opcode:#04x} at {address:#x}")]
    UnknownOpcode { address: u64, opcode: u8 },

    /// Instruction was truncated (not enough bytes).
    #[error("truncated instruction at {address:#x}: need {needed} bytes, have {available}")]
    Truncated {
        address: u64,
        needed: usize,
        available: usize,
    },

    /// Register field outside what the class allows.
    #[error("invalid register byte {reg_pair:#04x} for {} at {address:#x}", .class.name())]
    InvalidOperand {
        address: u64,
        class: InstructionClass,
        reg_pair: u8,
    },
}

impl DecodeError {
    /// Creates a new UnknownOpcode error.
    pub fn unknown_opcode(address: u64, opcode: u8) -> Self {
        Self::UnknownOpcode { address, opcode }
    }

    /// Creates a new Truncated error.
    pub fn truncated(address: u64, needed: usize, available: usize) -> Self {
        Self::Truncated {
            address,
            needed,
            available,
        }
    }

    /// Creates a new InvalidOperand error.
    pub fn invalid_operand(address: u64, class: InstructionClass, reg_pair: u8) -> Self {
        Self::InvalidOperand {
            address,
            class,
            reg_pair,
        }
    }

    /// Returns the address of the rejected instruction.
    pub fn address(&self) -> u64 {
        match *self {
            Self::UnknownOpcode { address, .. }
            | Self::Truncated { address, .. }
            | Self::InvalidOperand { address, .. } => address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DecodeError::unknown_opcode(0x40, 0xff).to_string(),
            "unknown opcode 0xff at 0x40"
        );
        assert_eq!(
            DecodeError::truncated(0x10, 10, 4).to_string(),
            "truncated instruction at 0x10: need 10 bytes, have 4"
        );
        assert_eq!(
            DecodeError::invalid_operand(0x2, InstructionClass::Push, 0x00).to_string(),
            "invalid register byte 0x00 for pushq at 0x2"
        );
    }

    #[test]
    fn test_address() {
        assert_eq!(DecodeError::truncated(0x99, 2, 1).address(), 0x99);
        assert_eq!(
            DecodeError::invalid_operand(7, InstructionClass::OpQ, 0xff).address(),
            7
        );
    }
}
