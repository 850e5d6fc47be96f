//! Y86-64 decoder implementation.

use crate::{DecodeError, Disassembler};
use ydis_core::{
    bytes_to_word_little_endian, split_reg_pair, ArithOp, Condition, Instruction,
    InstructionClass, Register, MAX_INSTRUCTION_SIZE, NO_REGISTER,
};

/// Y86-64 disassembler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Y86Disassembler;

impl Y86Disassembler {
    /// Creates a new Y86-64 disassembler.
    pub fn new() -> Self {
        Self
    }

    /// Decode a single instruction.
    fn decode(&self, bytes: &[u8], address: u64) -> Result<Instruction, DecodeError> {
        let &opcode = bytes
            .first()
            .ok_or_else(|| DecodeError::truncated(address, 1, 0))?;
        let class = InstructionClass::from_opcode(opcode);
        let size = class
            .size()
            .ok_or_else(|| DecodeError::unknown_opcode(address, opcode))?;
        if bytes.len() < size {
            return Err(DecodeError::truncated(address, size, bytes.len()));
        }

        let ifun = opcode & 0x0F;
        let inst = match class {
            InstructionClass::Halt => Instruction::Halt,
            InstructionClass::Nop => Instruction::Nop,
            InstructionClass::Ret => Instruction::Ret,
            InstructionClass::CondMove => {
                let (ra, rb) = Self::both_registers(bytes, address, class)?;
                let cond = Self::condition(ifun, address, opcode)?;
                Instruction::CondMove { cond, ra, rb }
            }
            InstructionClass::Irmovq => Instruction::Irmovq {
                rb: Self::rb_only(bytes, address, class)?,
                imm: Self::immediate(bytes, class),
            },
            InstructionClass::Rmmovq => {
                let (ra, rb) = Self::both_registers(bytes, address, class)?;
                Instruction::Rmmovq {
                    ra,
                    rb,
                    disp: Self::immediate(bytes, class),
                }
            }
            InstructionClass::Mrmovq => {
                let (ra, rb) = Self::both_registers(bytes, address, class)?;
                Instruction::Mrmovq {
                    ra,
                    rb,
                    disp: Self::immediate(bytes, class),
                }
            }
            InstructionClass::OpQ => {
                let (ra, rb) = Self::both_registers(bytes, address, class)?;
                let op = ArithOp::from_ifun(ifun)
                    .ok_or_else(|| DecodeError::unknown_opcode(address, opcode))?;
                Instruction::OpQ { op, ra, rb }
            }
            InstructionClass::Jump => Instruction::Jump {
                cond: Self::condition(ifun, address, opcode)?,
                target: Self::immediate(bytes, class),
            },
            InstructionClass::Call => Instruction::Call {
                target: Self::immediate(bytes, class),
            },
            InstructionClass::Push => Instruction::Push {
                ra: Self::ra_only(bytes, address, class)?,
            },
            InstructionClass::Pop => Instruction::Pop {
                ra: Self::ra_only(bytes, address, class)?,
            },
            InstructionClass::Invalid => {
                return Err(DecodeError::unknown_opcode(address, opcode))
            }
        };

        Ok(inst)
    }

    fn condition(ifun: u8, address: u64, opcode: u8) -> Result<Condition, DecodeError> {
        Condition::from_ifun(ifun).ok_or_else(|| DecodeError::unknown_opcode(address, opcode))
    }

    /// Both nibbles of the reg-pair byte must name registers.
    fn both_registers(
        bytes: &[u8],
        address: u64,
        class: InstructionClass,
    ) -> Result<(Register, Register), DecodeError> {
        let (ra, rb) = split_reg_pair(bytes[1]);
        match (Register::from_id(ra), Register::from_id(rb)) {
            (Some(ra), Some(rb)) => Ok((ra, rb)),
            _ => Err(DecodeError::invalid_operand(address, class, bytes[1])),
        }
    }

    /// `rA` must be exactly `F`, `rB` must name a register.
    fn rb_only(
        bytes: &[u8],
        address: u64,
        class: InstructionClass,
    ) -> Result<Register, DecodeError> {
        match split_reg_pair(bytes[1]) {
            (NO_REGISTER, rb) => Register::from_id(rb),
            _ => None,
        }
        .ok_or_else(|| DecodeError::invalid_operand(address, class, bytes[1]))
    }

    /// `rA` must name a register, `rB` must be exactly `F`.
    fn ra_only(
        bytes: &[u8],
        address: u64,
        class: InstructionClass,
    ) -> Result<Register, DecodeError> {
        match split_reg_pair(bytes[1]) {
            (ra, NO_REGISTER) => Register::from_id(ra),
            _ => None,
        }
        .ok_or_else(|| DecodeError::invalid_operand(address, class, bytes[1]))
    }

    /// Reads the class's 8-byte constant, stored least-significant byte first.
    fn immediate(bytes: &[u8], class: InstructionClass) -> u64 {
        class.immediate_offset().map_or(0, |at| {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[at..at + 8]);
            bytes_to_word_little_endian(word)
        })
    }
}

impl Disassembler for Y86Disassembler {
    fn decode_instruction(&self, bytes: &[u8], address: u64) -> Result<Instruction, DecodeError> {
        self.decode(bytes, address)
    }

    fn min_instruction_size(&self) -> usize {
        1
    }

    fn max_instruction_size(&self) -> usize {
        MAX_INSTRUCTION_SIZE
    }

    fn is_fixed_width(&self) -> bool {
        false
    }
}
