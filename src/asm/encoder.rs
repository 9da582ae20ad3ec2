//! The textual assembler: turns mnemonic lines into instruction words.
//!
//! Contract: `decode(encode(line))` must reproduce the mnemonic and operands
//! the line names, for every legal line. The parser's tokenizing and
//! register/immediate syntax are this crate's own design; only the wire
//! encoding is fixed by the opcode table.

use super::{Mnemonic, Operands, Shape};
use std::str::FromStr;
use thiserror::Error;

/// A failure to assemble a line of textual assembly into an instruction
/// word.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssembleError {
    /// The line's first token did not name a known mnemonic.
    #[error("line {line}: unknown mnemonic {mnemonic:?}")]
    UnknownMnemonic { line: usize, mnemonic: String },
    /// A register operand was not of the form `rN`, `0 <= N <= 12`.
    #[error("line {line}: invalid register operand {token:?}")]
    InvalidRegister { line: usize, token: String },
    /// An immediate or offset operand did not parse as an integer, or did
    /// not fit the field width its shape allows.
    #[error("line {line}: invalid immediate operand {token:?}")]
    InvalidImmediate { line: usize, token: String },
    /// The line supplied the wrong number of operands for its mnemonic's
    /// shape.
    #[error("line {line}: expected {expected} operand(s), found {found}")]
    WrongOperandCount { line: usize, expected: usize, found: usize },
}

/// Assemble a full program: one instruction word per non-blank,
/// non-comment line, concatenated little-endian into a byte vector ready
/// to hand to [`crate::execute`].
pub fn assemble(source: &str) -> Result<Vec<u8>, AssembleError> {
    let mut bytes = Vec::new();
    for word in assemble_words(source)? {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    Ok(bytes)
}

/// Assemble a program into instruction words, without packing them into
/// bytes. Useful for tests that want to inspect individual encoded words.
pub fn assemble_words(source: &str) -> Result<Vec<u32>, AssembleError> {
    source
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                None
            } else {
                Some(assemble_line(line, index + 1))
            }
        })
        .collect()
}

fn assemble_line(line: &str, line_no: usize) -> Result<u32, AssembleError> {
    let mut tokens = line.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty());

    let mnemonic_token = tokens.next().expect("non-blank line has at least one token");
    let mnemonic = Mnemonic::from_str(mnemonic_token).map_err(|_| AssembleError::UnknownMnemonic {
        line: line_no,
        mnemonic: mnemonic_token.to_string(),
    })?;

    let operands: Vec<&str> = tokens.collect();
    encode_operands(mnemonic, &operands, line_no)
}

fn encode_operands(mnemonic: Mnemonic, operands: &[&str], line_no: usize) -> Result<u32, AssembleError> {
    let opcode = mnemonic.opcode() as u32;
    let shape = mnemonic.shape();

    let expect = |count: usize| -> Result<(), AssembleError> {
        if operands.len() != count {
            Err(AssembleError::WrongOperandCount {
                line: line_no,
                expected: count,
                found: operands.len(),
            })
        } else {
            Ok(())
        }
    };

    let word = match shape {
        Shape::NoArgs => {
            expect(0)?;
            opcode
        }
        Shape::OneImm => {
            expect(1)?;
            let imm = parse_unsigned(operands[0], 24, line_no)?;
            opcode | (imm << 8)
        }
        Shape::OneRegOneExtImm => {
            expect(2)?;
            let reg = parse_register(operands[0], line_no)?;
            let imm = parse_unsigned(operands[1], 16, line_no)?;
            opcode | (reg << 8) | (imm << 16)
        }
        Shape::TwoImm => {
            expect(2)?;
            let imm1 = parse_unsigned(operands[0], 8, line_no)?;
            let imm2 = parse_unsigned(operands[1], 16, line_no)?;
            opcode | (imm1 << 8) | (imm2 << 16)
        }
        Shape::OneOffset => {
            expect(1)?;
            let offset = parse_signed(operands[0], 24, line_no)?;
            opcode | ((offset as u32) & 0x00FF_FFFF) << 8
        }
        Shape::OneRegOneImm => {
            expect(2)?;
            let reg = parse_register(operands[0], line_no)?;
            let imm = parse_unsigned(operands[1], 20, line_no)?;
            opcode | (reg << 8) | (imm << 12)
        }
        Shape::TwoReg => {
            expect(2)?;
            let reg1 = parse_register(operands[0], line_no)?;
            let reg2 = parse_register(operands[1], line_no)?;
            opcode | (reg1 << 8) | (reg2 << 12)
        }
        Shape::ThreeReg => {
            expect(3)?;
            // Mnemonic order `dst, src1, src2` matches the encoded field
            // order one-for-one; the executor reads src1/src2 and writes
            // dst using this same order.
            let dst = parse_register(operands[0], line_no)?;
            let src1 = parse_register(operands[1], line_no)?;
            let src2 = parse_register(operands[2], line_no)?;
            opcode | (dst << 8) | (src1 << 12) | (src2 << 16)
        }
    };

    Ok(word)
}

fn parse_register(token: &str, line_no: usize) -> Result<u32, AssembleError> {
    let digits = token.strip_prefix('r').ok_or_else(|| AssembleError::InvalidRegister {
        line: line_no,
        token: token.to_string(),
    })?;
    let index: u32 = digits.parse().map_err(|_| AssembleError::InvalidRegister {
        line: line_no,
        token: token.to_string(),
    })?;
    if crate::registers::is_valid_register(index) {
        Ok(index)
    } else {
        Err(AssembleError::InvalidRegister { line: line_no, token: token.to_string() })
    }
}

fn parse_unsigned(token: &str, bits: u32, line_no: usize) -> Result<u32, AssembleError> {
    let value: i64 = parse_int(token, line_no)?;
    let max = (1i64 << bits) - 1;
    if !(0..=max).contains(&value) {
        return Err(AssembleError::InvalidImmediate { line: line_no, token: token.to_string() });
    }
    Ok(value as u32)
}

fn parse_signed(token: &str, bits: u32, line_no: usize) -> Result<i64, AssembleError> {
    let value: i64 = parse_int(token, line_no)?;
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if !(min..=max).contains(&value) {
        return Err(AssembleError::InvalidImmediate { line: line_no, token: token.to_string() });
    }
    Ok(value)
}

fn parse_int(token: &str, line_no: usize) -> Result<i64, AssembleError> {
    let parsed = if let Some(hex) = token.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else {
        token.parse::<i64>().ok()
    };
    parsed.ok_or_else(|| AssembleError::InvalidImmediate { line: line_no, token: token.to_string() })
}

/// The reverse of [`encode_operands`]'s packing, reconstructed from a
/// decoded instruction's typed operands — exposed so tests can assert the
/// round-trip contract without re-deriving bit offsets by hand.
#[cfg(test)]
pub(crate) fn reencode(mnemonic: Mnemonic, operands: &Operands) -> u32 {
    let opcode = mnemonic.opcode() as u32;
    match *operands {
        Operands::NoArgs => opcode,
        Operands::OneImm { imm } => opcode | (imm << 8),
        Operands::OneRegOneExtImm { reg, imm } => opcode | (reg << 8) | (imm << 16),
        Operands::TwoImm { imm1, imm2 } => opcode | (imm1 << 8) | (imm2 << 16),
        Operands::OneOffset { offset } => opcode | (((offset as u32) & 0x00FF_FFFF) << 8),
        Operands::OneRegOneImm { reg, imm } => opcode | (reg << 8) | (imm << 12),
        Operands::TwoReg { reg1, reg2 } => opcode | (reg1 << 8) | (reg2 << 12),
        Operands::ThreeReg { dst, src1, src2 } => opcode | (dst << 8) | (src1 << 12) | (src2 << 16),
    }
}
