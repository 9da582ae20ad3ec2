//! Instruction decoding: turning a 32-bit word into a typed, opcode-tagged
//! instruction, and the textual assembler that produces those words.

pub mod encoder;
mod instruction;
pub mod opcodes;

pub use instruction::DecodedInstruction;
pub use opcodes::Mnemonic;

use crate::error::DecodeError;
use crate::registers::is_valid_register;

/// The operand layout family of an opcode, fixing how bits 8..31 of the
/// instruction word are carved up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// No operands.
    NoArgs,
    /// Bits 8..31: a 24-bit unsigned immediate.
    OneImm,
    /// Bits 8..11: register. Bits 16..31: 16-bit immediate.
    OneRegOneExtImm,
    /// Bits 8..15: 8-bit imm1. Bits 16..31: 16-bit imm2.
    TwoImm,
    /// Bits 8..31: a 24-bit signed offset, sign-extended to machine width.
    OneOffset,
    /// Bits 8..11: register. Bits 12..31: 20-bit immediate.
    OneRegOneImm,
    /// Bits 8..11: reg1. Bits 12..15: reg2.
    TwoReg,
    /// Bits 8..11: reg1. Bits 12..15: reg2. Bits 16..19: reg3.
    ThreeReg,
}

/// The typed operand tuple decoded for a given [`Shape`].
///
/// Field order for [`Operands::ThreeReg`] is `(dst, src1, src2)` — both the
/// bit layout and the executor's reading of it agree on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operands {
    NoArgs,
    OneImm { imm: u32 },
    OneRegOneExtImm { reg: u32, imm: u32 },
    TwoImm { imm1: u32, imm2: u32 },
    OneOffset { offset: i64 },
    OneRegOneImm { reg: u32, imm: u32 },
    TwoReg { reg1: u32, reg2: u32 },
    ThreeReg { dst: u32, src1: u32, src2: u32 },
}

/// Sign-extend the low `bits` bits of `value` to a full 64-bit signed value.
///
/// `bits` must be in `1..=63`; used for 24-bit branch offsets at decode time
/// and for 32-bit arithmetic results at execute time.
pub const fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

fn field(word: u32, start: u32, width: u32) -> u32 {
    (word >> start) & ((1u32 << width) - 1)
}

fn check_register(index: u32) -> Result<u32, DecodeError> {
    if is_valid_register(index) {
        Ok(index)
    } else {
        Err(DecodeError::InvalidRegister(index))
    }
}

/// Decode a little-endian 32-bit instruction word into a tagged instruction.
///
/// `pc` is not consulted by decoding itself (every field is self-contained
/// in `word`) but is carried through to [`DecodedInstruction`] for callers
/// that want it alongside the decoded form.
pub fn decode(word: u32, pc: u64) -> Result<DecodedInstruction, DecodeError> {
    let opcode = (word & 0xFF) as u8;
    let mnemonic = Mnemonic::from_opcode(opcode)?;
    let shape = mnemonic.shape();

    let operands = match shape {
        Shape::NoArgs => Operands::NoArgs,
        Shape::OneImm => Operands::OneImm { imm: field(word, 8, 24) },
        Shape::OneRegOneExtImm => Operands::OneRegOneExtImm {
            reg: check_register(field(word, 8, 4))?,
            imm: field(word, 16, 16),
        },
        Shape::TwoImm => Operands::TwoImm {
            imm1: field(word, 8, 8),
            imm2: field(word, 16, 16),
        },
        Shape::OneOffset => Operands::OneOffset {
            offset: sign_extend(field(word, 8, 24) as u64, 24),
        },
        Shape::OneRegOneImm => Operands::OneRegOneImm {
            reg: check_register(field(word, 8, 4))?,
            imm: field(word, 12, 20),
        },
        Shape::TwoReg => Operands::TwoReg {
            reg1: check_register(field(word, 8, 4))?,
            reg2: check_register(field(word, 12, 4))?,
        },
        Shape::ThreeReg => Operands::ThreeReg {
            dst: check_register(field(word, 8, 4))?,
            src1: check_register(field(word, 12, 4))?,
            src2: check_register(field(word, 16, 4))?,
        },
    };

    Ok(DecodedInstruction {
        pc,
        opcode,
        mnemonic,
        shape,
        gas_cost: mnemonic.gas_cost(),
        operands,
    })
}
