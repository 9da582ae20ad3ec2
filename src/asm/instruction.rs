use super::{Mnemonic, Operands, Shape};

/// A fully decoded instruction: opcode descriptor plus its typed operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Byte offset this instruction was fetched from.
    pub pc: u64,
    /// The raw opcode byte (low 8 bits of the instruction word).
    pub opcode: u8,
    /// The mnemonic assigned to `opcode`.
    pub mnemonic: Mnemonic,
    /// The operand layout family used to decode `operands`.
    pub shape: Shape,
    /// Gas charged for executing this instruction.
    pub gas_cost: i64,
    /// The typed operand tuple.
    pub operands: Operands,
}
