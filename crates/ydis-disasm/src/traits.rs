//! Disassembler traits.

use std::io::{self, ErrorKind};

use log::{debug, trace};
use ydis_core::{Instruction, InstructionClass, MAX_INSTRUCTION_SIZE};

use crate::decoded::RECOVERY_WINDOW;
use crate::{ByteSource, DecodeError, DecodedInstruction, InvalidSpan, ListingSink};

/// Trait for instruction decoders.
pub trait Disassembler {
    /// Decode a single instruction from the start of `bytes`.
    ///
    /// Pure: no recovery is attempted, the error says why the bytes were
    /// rejected.
    fn decode_instruction(&self, bytes: &[u8], address: u64) -> Result<Instruction, DecodeError>;

    /// Returns the minimum instruction size.
    fn min_instruction_size(&self) -> usize;

    /// Returns the maximum instruction size.
    fn max_instruction_size(&self) -> usize;

    /// Returns whether instructions are fixed-width.
    fn is_fixed_width(&self) -> bool;

    /// Fetch the instruction at `address` of a slice, recovering from
    /// rejected bytes.
    ///
    /// Returns `None` once `address` is at or past the end of `bytes`.
    fn decode_at(&self, bytes: &[u8], address: u64) -> Option<DecodedInstruction> {
        let start = usize::try_from(address).ok().filter(|&s| s < bytes.len())?;
        let tail = &bytes[start..];

        Some(match self.decode_instruction(tail, address) {
            Ok(inst) => DecodedInstruction::Valid(inst),
            Err(fault) => {
                let window = &tail[..tail.len().min(RECOVERY_WINDOW)];
                DecodedInstruction::Invalid(InvalidSpan::new(address, window, fault))
            }
        })
    }

    /// Disassemble a whole slice, treating offsets as addresses.
    fn disassemble_block(&self, bytes: &[u8]) -> Vec<(u64, DecodedInstruction)> {
        let mut instructions = Vec::new();
        let mut address = 0u64;

        while let Some(decoded) = self.decode_at(bytes, address) {
            let size = decoded.size() as u64;
            instructions.push((address, decoded));
            address += size;
        }

        instructions
    }

    /// Fetch the instruction starting at `address` of a byte source.
    ///
    /// Reads the opcode byte, then the rest of the class in one read. On a
    /// short read or a rejected encoding the source is re-seeked to
    /// `address` and up to eight raw bytes are re-read as an invalid span.
    /// Leaves the source positioned just past the consumed bytes.
    fn fetch<S: ByteSource + ?Sized>(
        &self,
        stream: &mut S,
        address: u64,
    ) -> io::Result<DecodedInstruction>
    where
        Self: Sized,
    {
        let mut buf = [0u8; MAX_INSTRUCTION_SIZE];

        stream.seek_to(address)?;
        if stream.read_bytes(&mut buf[..1])? == 0 {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("no instruction at {address:#x}: end of stream"),
            ));
        }

        let opcode = buf[0];
        let result = match InstructionClass::from_opcode(opcode).size() {
            None => Err(DecodeError::unknown_opcode(address, opcode)),
            Some(size) => {
                let got = stream.read_bytes(&mut buf[1..size])?;
                if got + 1 < size {
                    Err(DecodeError::truncated(address, size, got + 1))
                } else {
                    self.decode_instruction(&buf[..size], address)
                }
            }
        };

        match result {
            Ok(inst) => {
                trace!("{address:#x}: {}", inst.mnemonic());
                Ok(DecodedInstruction::Valid(inst))
            }
            Err(fault) => {
                debug!("{fault}; recovering");
                stream.seek_to(address)?;
                let mut raw = [0u8; RECOVERY_WINDOW];
                let got = stream.read_bytes(&mut raw)?;
                Ok(DecodedInstruction::Invalid(InvalidSpan::new(
                    address,
                    &raw[..got],
                    fault,
                )))
            }
        }
    }

    /// Like [`Disassembler::fetch`], but writes an invalid span to `sink`
    /// as soon as it is recovered. Valid instructions are left for the
    /// caller to render.
    fn fetch_and_report<S, K>(
        &self,
        stream: &mut S,
        address: u64,
        sink: &mut K,
    ) -> io::Result<DecodedInstruction>
    where
        Self: Sized,
        S: ByteSource + ?Sized,
        K: ListingSink + ?Sized,
    {
        let decoded = self.fetch(stream, address)?;
        if let DecodedInstruction::Invalid(span) = &decoded {
            sink.invalid(span)?;
        }
        Ok(decoded)
    }
}
