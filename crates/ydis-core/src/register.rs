//! Y86-64 general purpose registers and reg-pair byte handling.

use std::fmt;

use crate::Error;

/// Register nibble meaning "no register" (`F` in a reg-pair byte).
pub const NO_REGISTER: u8 = 0xF;

/// One of the fifteen Y86-64 program registers.
///
/// The discriminant is the 4-bit register id used in the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Register {
    Rax = 0x0,
    Rcx = 0x1,
    Rdx = 0x2,
    Rbx = 0x3,
    Rsp = 0x4,
    Rbp = 0x5,
    Rsi = 0x6,
    Rdi = 0x7,
    R8 = 0x8,
    R9 = 0x9,
    R10 = 0xA,
    R11 = 0xB,
    R12 = 0xC,
    R13 = 0xD,
    R14 = 0xE,
}

impl Register {
    /// All registers, indexed by id.
    pub const ALL: [Register; 15] = [
        Self::Rax,
        Self::Rcx,
        Self::Rdx,
        Self::Rbx,
        Self::Rsp,
        Self::Rbp,
        Self::Rsi,
        Self::Rdi,
        Self::R8,
        Self::R9,
        Self::R10,
        Self::R11,
        Self::R12,
        Self::R13,
        Self::R14,
    ];

    /// Returns the register with the given 4-bit id, or `None` for
    /// [`NO_REGISTER`] and anything wider than a nibble.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Returns the 4-bit id used in the encoding.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Returns the assembler name, including the `%` sigil.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rax => "%rax",
            Self::Rcx => "%rcx",
            Self::Rdx => "%rdx",
            Self::Rbx => "%rbx",
            Self::Rsp => "%rsp",
            Self::Rbp => "%rbp",
            Self::Rsi => "%rsi",
            Self::Rdi => "%rdi",
            Self::R8 => "%r8",
            Self::R9 => "%r9",
            Self::R10 => "%r10",
            Self::R11 => "%r11",
            Self::R12 => "%r12",
            Self::R13 => "%r13",
            Self::R14 => "%r14",
        }
    }
}

impl TryFrom<u8> for Register {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(Error::InvalidRegister(id))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits a reg-pair byte into its `(rA, rB)` nibbles.
pub fn split_reg_pair(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

/// Packs two register nibbles into a reg-pair byte, `rA` in the high nibble.
pub fn join_reg_pair(ra: u8, rb: u8) -> u8 {
    (ra & 0x0F) << 4 | (rb & 0x0F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_ids_round_trip() {
        for (id, reg) in Register::ALL.iter().enumerate() {
            assert_eq!(usize::from(reg.id()), id);
            assert_eq!(Register::from_id(reg.id()), Some(*reg));
        }
    }

    #[test]
    fn test_no_register_is_not_a_register() {
        assert_eq!(Register::from_id(NO_REGISTER), None);
        assert!(matches!(
            Register::try_from(NO_REGISTER),
            Err(Error::InvalidRegister(0xF))
        ));
        assert_eq!(Register::from_id(0x10), None);
    }

    #[test]
    fn test_register_names() {
        assert_eq!(Register::Rax.name(), "%rax");
        assert_eq!(Register::Rsp.to_string(), "%rsp");
        assert_eq!(Register::R8.name(), "%r8");
        assert_eq!(Register::R14.name(), "%r14");
    }

    #[test]
    fn test_reg_pair_nibbles() {
        assert_eq!(split_reg_pair(0x12), (0x1, 0x2));
        assert_eq!(split_reg_pair(0xF2), (NO_REGISTER, 0x2));
        assert_eq!(join_reg_pair(0x0, NO_REGISTER), 0x0F);
        assert_eq!(join_reg_pair(0x3, 0xF), 0x3F);
    }
}
