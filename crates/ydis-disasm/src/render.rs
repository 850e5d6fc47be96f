//! Fixed-column listing output.
//!
//! Every line is
//!
//! ```text
//! 0000000000000000: 30f21000000000000000  irmovq  $0x10, %rdx
//! ```
//!
//! a 16-digit address and `": "`, the encoded bytes left-justified in 22
//! columns, the mnemonic left-justified in 8 columns, then the operands.
//! The layout is what the Y86-64 assembler accepts once the address
//! column is stripped, so it must not drift.

use std::io::{self, Write};

use ydis_core::Instruction;

use crate::decoded::Directive;
use crate::InvalidSpan;

/// Formats an instruction's operands, registers with `%` and numbers as
/// `0x`-prefixed hex without leading zeros.
pub fn format_operands(inst: &Instruction) -> String {
    match *inst {
        Instruction::Halt | Instruction::Nop | Instruction::Ret => String::new(),
        Instruction::CondMove { ra, rb, .. } | Instruction::OpQ { ra, rb, .. } => {
            format!("{ra}, {rb}")
        }
        Instruction::Irmovq { rb, imm } => format!("${imm:#x}, {rb}"),
        Instruction::Rmmovq { ra, rb, disp } => format!("{ra}, {disp:#x}({rb})"),
        Instruction::Mrmovq { ra, rb, disp } => format!("{disp:#x}({rb}), {ra}"),
        Instruction::Jump { target, .. } | Instruction::Call { target } => format!("{target:#x}"),
        Instruction::Push { ra } | Instruction::Pop { ra } => ra.to_string(),
    }
}

/// Formats one listing line for a valid instruction.
///
/// The byte column is re-encoded from the instruction fields.
pub fn format_instruction(inst: &Instruction, address: u64) -> String {
    format!(
        "{address:016x}: {:<22}{:<8}{}",
        inst.encode().to_hex(),
        inst.mnemonic(),
        format_operands(inst)
    )
}

/// Formats one directive line of an invalid span.
pub fn format_directive(directive: &Directive) -> String {
    format!(
        "{:016x}: {:<22}{} {:#x}",
        directive.address,
        directive.hex,
        directive.kind.name(),
        directive.value
    )
}

/// Writes the listing line for `inst` to `out`.
pub fn render<W: Write + ?Sized>(out: &mut W, inst: &Instruction, address: u64) -> io::Result<()> {
    writeln!(out, "{}", format_instruction(inst, address))
}

/// Writes the directive lines for an invalid span to `out`.
pub fn render_invalid<W: Write + ?Sized>(out: &mut W, span: &InvalidSpan) -> io::Result<()> {
    for directive in span.directives() {
        writeln!(out, "{}", format_directive(&directive))?;
    }
    Ok(())
}

/// Destination for listing entries.
pub trait ListingSink {
    /// Records a valid instruction at `address`.
    fn instruction(&mut self, inst: &Instruction, address: u64) -> io::Result<()>;

    /// Records a recovered invalid span.
    fn invalid(&mut self, span: &InvalidSpan) -> io::Result<()>;
}

impl<T: ListingSink + ?Sized> ListingSink for &mut T {
    fn instruction(&mut self, inst: &Instruction, address: u64) -> io::Result<()> {
        (**self).instruction(inst, address)
    }

    fn invalid(&mut self, span: &InvalidSpan) -> io::Result<()> {
        (**self).invalid(span)
    }
}

/// Writes the plain-text listing to any `Write` sink.
#[derive(Debug)]
pub struct TextListing<W> {
    out: W,
}

impl<W: Write> TextListing<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ListingSink for TextListing<W> {
    fn instruction(&mut self, inst: &Instruction, address: u64) -> io::Result<()> {
        render(&mut self.out, inst, address)
    }

    fn invalid(&mut self, span: &InvalidSpan) -> io::Result<()> {
        render_invalid(&mut self.out, span)
    }
}
