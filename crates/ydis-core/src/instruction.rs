//! Y86-64 instruction classes and decoded instruction values.

use crate::codec::opcode;
use crate::Register;

/// Instruction class, selected by the opcode byte.
///
/// Every class except [`InstructionClass::Invalid`] has a fixed encoded
/// length and field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstructionClass {
    Halt,
    Nop,
    Ret,
    /// `rrmovq` and the `cmovXX` family.
    CondMove,
    Irmovq,
    Rmmovq,
    Mrmovq,
    /// `addq`, `subq`, `andq`, `xorq`.
    OpQ,
    /// `jmp` and the `jXX` family.
    Jump,
    Call,
    Push,
    Pop,
    /// Opcode byte not in the encoding table, or a rejected encoding.
    Invalid,
}

impl InstructionClass {
    /// Classifies an opcode byte.
    pub fn from_opcode(byte: u8) -> Self {
        match byte {
            opcode::HALT => Self::Halt,
            opcode::NOP => Self::Nop,
            0x20..=0x26 => Self::CondMove,
            opcode::IRMOVQ => Self::Irmovq,
            opcode::RMMOVQ => Self::Rmmovq,
            opcode::MRMOVQ => Self::Mrmovq,
            0x60..=0x63 => Self::OpQ,
            0x70..=0x76 => Self::Jump,
            opcode::CALL => Self::Call,
            opcode::RET => Self::Ret,
            opcode::PUSHQ => Self::Push,
            opcode::POPQ => Self::Pop,
            _ => Self::Invalid,
        }
    }

    /// Returns the encoded length in bytes, opcode included.
    ///
    /// `None` for [`InstructionClass::Invalid`], whose length depends on how
    /// many bytes recovery could read.
    pub fn size(self) -> Option<usize> {
        match self {
            Self::Halt | Self::Nop | Self::Ret => Some(1),
            Self::CondMove | Self::OpQ | Self::Push | Self::Pop => Some(2),
            Self::Jump | Self::Call => Some(9),
            Self::Irmovq | Self::Rmmovq | Self::Mrmovq => Some(10),
            Self::Invalid => None,
        }
    }

    /// Returns true if the second byte is a reg-pair byte.
    pub fn has_reg_pair(self) -> bool {
        matches!(
            self,
            Self::CondMove
                | Self::Irmovq
                | Self::Rmmovq
                | Self::Mrmovq
                | Self::OpQ
                | Self::Push
                | Self::Pop
        )
    }

    /// Returns the byte offset of the 8-byte immediate, if the class has one.
    pub fn immediate_offset(self) -> Option<usize> {
        match self {
            Self::Irmovq | Self::Rmmovq | Self::Mrmovq => Some(2),
            Self::Jump | Self::Call => Some(1),
            _ => None,
        }
    }

    /// Returns the class name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Halt => "halt",
            Self::Nop => "nop",
            Self::Ret => "ret",
            Self::CondMove => "cmovXX",
            Self::Irmovq => "irmovq",
            Self::Rmmovq => "rmmovq",
            Self::Mrmovq => "mrmovq",
            Self::OpQ => "OPq",
            Self::Jump => "jXX",
            Self::Call => "call",
            Self::Push => "pushq",
            Self::Pop => "popq",
            Self::Invalid => "invalid",
        }
    }
}

/// Branch/move condition, the function code of `cmovXX` and `jXX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Condition {
    /// Unconditional (`rrmovq`, `jmp`).
    Always,
    Le,
    L,
    E,
    Ne,
    Ge,
    G,
}

impl Condition {
    /// Conditions in function-code order.
    pub const ALL: [Condition; 7] = [
        Self::Always,
        Self::Le,
        Self::L,
        Self::E,
        Self::Ne,
        Self::Ge,
        Self::G,
    ];

    /// Returns the condition for a function code (low opcode nibble).
    pub fn from_ifun(ifun: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ifun)).copied()
    }

    /// Returns the function code.
    pub fn ifun(self) -> u8 {
        self as u8
    }

    /// Returns the mnemonic suffix (`"le"`, `"ne"`, ...); empty for `Always`.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Always => "",
            Self::Le => "le",
            Self::L => "l",
            Self::E => "e",
            Self::Ne => "ne",
            Self::Ge => "ge",
            Self::G => "g",
        }
    }
}

/// Integer operation performed by `OPq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArithOp {
    Add,
    Sub,
    And,
    Xor,
}

impl ArithOp {
    /// Operations in function-code order.
    pub const ALL: [ArithOp; 4] = [Self::Add, Self::Sub, Self::And, Self::Xor];

    /// Returns the operation for a function code.
    pub fn from_ifun(ifun: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ifun)).copied()
    }

    /// Returns the function code.
    pub fn ifun(self) -> u8 {
        self as u8
    }

    /// Returns the mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "addq",
            Self::Sub => "subq",
            Self::And => "andq",
            Self::Xor => "xorq",
        }
    }
}

/// A validly decoded Y86-64 instruction.
///
/// Each variant carries exactly the fields of its class, so register slots
/// that must be empty (`rA` of `irmovq`, `rB` of `pushq`/`popq`) are not
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "class", rename_all = "lowercase"))]
pub enum Instruction {
    Halt,
    Nop,
    Ret,
    /// `rrmovq`/`cmovXX rA, rB`
    CondMove {
        cond: Condition,
        ra: Register,
        rb: Register,
    },
    /// `irmovq $imm, rB`
    Irmovq { rb: Register, imm: u64 },
    /// `rmmovq rA, disp(rB)`
    Rmmovq { ra: Register, rb: Register, disp: u64 },
    /// `mrmovq disp(rB), rA`
    Mrmovq { ra: Register, rb: Register, disp: u64 },
    /// `OPq rA, rB`
    OpQ {
        op: ArithOp,
        ra: Register,
        rb: Register,
    },
    /// `jmp`/`jXX target`
    Jump { cond: Condition, target: u64 },
    /// `call target`
    Call { target: u64 },
    /// `pushq rA`
    Push { ra: Register },
    /// `popq rA`
    Pop { ra: Register },
}

impl Instruction {
    /// Returns the instruction class.
    pub fn class(&self) -> InstructionClass {
        match self {
            Self::Halt => InstructionClass::Halt,
            Self::Nop => InstructionClass::Nop,
            Self::Ret => InstructionClass::Ret,
            Self::CondMove { .. } => InstructionClass::CondMove,
            Self::Irmovq { .. } => InstructionClass::Irmovq,
            Self::Rmmovq { .. } => InstructionClass::Rmmovq,
            Self::Mrmovq { .. } => InstructionClass::Mrmovq,
            Self::OpQ { .. } => InstructionClass::OpQ,
            Self::Jump { .. } => InstructionClass::Jump,
            Self::Call { .. } => InstructionClass::Call,
            Self::Push { .. } => InstructionClass::Push,
            Self::Pop { .. } => InstructionClass::Pop,
        }
    }

    /// Returns the opcode byte (class code in the high nibble, function code
    /// in the low nibble).
    pub fn opcode(&self) -> u8 {
        match self {
            Self::Halt => opcode::HALT,
            Self::Nop => opcode::NOP,
            Self::Ret => opcode::RET,
            Self::CondMove { cond, .. } => opcode::CMOVXX | cond.ifun(),
            Self::Irmovq { .. } => opcode::IRMOVQ,
            Self::Rmmovq { .. } => opcode::RMMOVQ,
            Self::Mrmovq { .. } => opcode::MRMOVQ,
            Self::OpQ { op, .. } => opcode::OPQ | op.ifun(),
            Self::Jump { cond, .. } => opcode::JXX | cond.ifun(),
            Self::Call { .. } => opcode::CALL,
            Self::Push { .. } => opcode::PUSHQ,
            Self::Pop { .. } => opcode::POPQ,
        }
    }

    /// Returns the encoded length in bytes. Fixed per class.
    pub fn size(&self) -> usize {
        match self {
            Self::Halt | Self::Nop | Self::Ret => 1,
            Self::CondMove { .. } | Self::OpQ { .. } | Self::Push { .. } | Self::Pop { .. } => 2,
            Self::Jump { .. } | Self::Call { .. } => 9,
            Self::Irmovq { .. } | Self::Rmmovq { .. } | Self::Mrmovq { .. } => 10,
        }
    }

    /// Returns the lowercase mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Halt => "halt",
            Self::Nop => "nop",
            Self::Ret => "ret",
            Self::CondMove { cond, .. } => match cond {
                Condition::Always => "rrmovq",
                Condition::Le => "cmovle",
                Condition::L => "cmovl",
                Condition::E => "cmove",
                Condition::Ne => "cmovne",
                Condition::Ge => "cmovge",
                Condition::G => "cmovg",
            },
            Self::Irmovq { .. } => "irmovq",
            Self::Rmmovq { .. } => "rmmovq",
            Self::Mrmovq { .. } => "mrmovq",
            Self::OpQ { op, .. } => op.mnemonic(),
            Self::Jump { cond, .. } => match cond {
                Condition::Always => "jmp",
                Condition::Le => "jle",
                Condition::L => "jl",
                Condition::E => "je",
                Condition::Ne => "jne",
                Condition::Ge => "jge",
                Condition::G => "jg",
            },
            Self::Call { .. } => "call",
            Self::Push { .. } => "pushq",
            Self::Pop { .. } => "popq",
        }
    }

    /// Returns the `rA` register, if the instruction names one.
    pub fn ra(&self) -> Option<Register> {
        match *self {
            Self::CondMove { ra, .. }
            | Self::Rmmovq { ra, .. }
            | Self::Mrmovq { ra, .. }
            | Self::OpQ { ra, .. }
            | Self::Push { ra }
            | Self::Pop { ra } => Some(ra),
            _ => None,
        }
    }

    /// Returns the `rB` register, if the instruction names one.
    pub fn rb(&self) -> Option<Register> {
        match *self {
            Self::CondMove { rb, .. }
            | Self::Irmovq { rb, .. }
            | Self::Rmmovq { rb, .. }
            | Self::Mrmovq { rb, .. }
            | Self::OpQ { rb, .. } => Some(rb),
            _ => None,
        }
    }

    /// Returns the 64-bit immediate, displacement, or target address.
    pub fn immediate(&self) -> Option<u64> {
        match *self {
            Self::Irmovq { imm, .. } => Some(imm),
            Self::Rmmovq { disp, .. } | Self::Mrmovq { disp, .. } => Some(disp),
            Self::Jump { target, .. } | Self::Call { target } => Some(target),
            _ => None,
        }
    }

    /// Returns the condition of `cmovXX`/`jXX`.
    pub fn condition(&self) -> Option<Condition> {
        match *self {
            Self::CondMove { cond, .. } | Self::Jump { cond, .. } => Some(cond),
            _ => None,
        }
    }

    /// Returns the operation of `OPq`.
    pub fn arith_op(&self) -> Option<ArithOp> {
        match *self {
            Self::OpQ { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Returns true for `halt`, after which the scanner skips zero padding.
    pub fn is_halt(&self) -> bool {
        matches!(self, Self::Halt)
    }
}
