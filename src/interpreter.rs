//! The instruction executor: applies bit-precise semantics to a register
//! file and paged memory, returning either a continuation or an exit.

pub mod alu;

use crate::asm::{DecodedInstruction, Mnemonic, Operands};
use crate::consts::INSTRUCTION_SIZE;
use crate::state::{ExitData, ExitReason, MachineState};

/// The result of executing one decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Execution continues; the driver advances `pc` to `next_pc` and
    /// deducts the instruction's gas cost.
    Continue { next_pc: u64 },
    /// Execution has terminated. The driver records this verbatim; `pc` is
    /// left at its current value (the terminating instruction) — the
    /// executor never advances the PC itself for terminal outcomes.
    Exit { reason: ExitReason, data: ExitData },
}

fn panic(message: impl Into<String>) -> StepOutcome {
    StepOutcome::Exit { reason: ExitReason::Panic, data: ExitData::Message(message.into()) }
}

fn page_fault(page: u64) -> StepOutcome {
    StepOutcome::Exit { reason: ExitReason::PageFault, data: ExitData::Page(page) }
}

/// Execute one already-decoded instruction against `state`.
pub fn step(decoded: &DecodedInstruction, state: &mut MachineState) -> StepOutcome {
    let fallthrough = StepOutcome::Continue { next_pc: decoded.pc + INSTRUCTION_SIZE };

    match decoded.mnemonic {
        Mnemonic::Trap => panic("trap"),
        Mnemonic::Fallthrough => fallthrough,

        Mnemonic::Ecalli => {
            let Operands::OneImm { imm } = decoded.operands else { unreachable!() };
            StepOutcome::Exit { reason: ExitReason::HostCall, data: ExitData::HostCallId(imm as u64) }
        }

        Mnemonic::Jump => {
            let Operands::OneOffset { offset } = decoded.operands else { unreachable!() };
            StepOutcome::Continue { next_pc: decoded.pc.wrapping_add(offset as u64) }
        }

        Mnemonic::JumpInd => {
            let Operands::OneRegOneExtImm { reg, imm } = decoded.operands else { unreachable!() };
            let target = state.registers()[reg].wrapping_add(imm as u64);
            let aligned = target - (target % INSTRUCTION_SIZE);
            StepOutcome::Continue { next_pc: aligned }
        }

        Mnemonic::LoadImm64 => {
            let Operands::OneRegOneExtImm { reg, imm } = decoded.operands else { unreachable!() };
            state.registers_mut()[reg] = imm as u64;
            fallthrough
        }
        Mnemonic::LoadImm => {
            let Operands::OneRegOneImm { reg, imm } = decoded.operands else { unreachable!() };
            state.registers_mut()[reg] = imm as u64;
            fallthrough
        }

        Mnemonic::StoreImmU8 => store_imm(decoded, state, 1),
        Mnemonic::StoreImmU16 => store_imm(decoded, state, 2),
        Mnemonic::StoreImmU32 => store_imm(decoded, state, 4),
        Mnemonic::StoreImmU64 => store_imm(decoded, state, 8),

        Mnemonic::LoadU8 => load(decoded, state, 1, false),
        Mnemonic::LoadI8 => load(decoded, state, 1, true),
        Mnemonic::LoadU16 => load(decoded, state, 2, false),
        Mnemonic::LoadI16 => load(decoded, state, 2, true),
        Mnemonic::LoadU32 => load(decoded, state, 4, false),
        Mnemonic::LoadI32 => load(decoded, state, 4, true),
        Mnemonic::LoadU64 => load(decoded, state, 8, false),

        Mnemonic::StoreU8 => store(decoded, state, 1),
        Mnemonic::StoreU16 => store(decoded, state, 2),
        Mnemonic::StoreU32 => store(decoded, state, 4),
        Mnemonic::StoreU64 => store(decoded, state, 8),

        Mnemonic::MoveReg => {
            let Operands::TwoReg { reg1, reg2 } = decoded.operands else { unreachable!() };
            let value = state.registers()[reg2];
            state.registers_mut()[reg1] = value;
            fallthrough
        }

        Mnemonic::Sbrk => {
            let Operands::TwoReg { reg1: dst, reg2: size_reg } = decoded.operands else { unreachable!() };
            let n = state.registers()[size_reg];
            let page_size = crate::consts::PAGE_SIZE;
            let pages_needed = (n + page_size - 1) / page_size;
            let base = state.memory.grow(pages_needed);
            state.registers_mut()[dst] = base;
            fallthrough
        }

        Mnemonic::Clz => unary_two_reg(decoded, state, alu::clz, fallthrough),
        Mnemonic::Ctz => unary_two_reg(decoded, state, alu::ctz, fallthrough),
        Mnemonic::Popcount => unary_two_reg(decoded, state, alu::popcount, fallthrough),
        Mnemonic::SignExtend8 => unary_two_reg(decoded, state, alu::sign_extend_8, fallthrough),
        Mnemonic::SignExtend16 => unary_two_reg(decoded, state, alu::sign_extend_16, fallthrough),
        Mnemonic::SignExtend32 => unary_two_reg(decoded, state, alu::sign_extend_32, fallthrough),
        Mnemonic::ByteSwap => unary_two_reg(decoded, state, alu::byte_swap, fallthrough),
        Mnemonic::BitReverse => unary_two_reg(decoded, state, alu::bit_reverse, fallthrough),
        Mnemonic::Popcount32 => unary_two_reg(decoded, state, alu::popcount32, fallthrough),
        Mnemonic::Clz32 => unary_two_reg(decoded, state, alu::clz32, fallthrough),

        Mnemonic::Add32 => binary_three_reg(decoded, state, alu::add32, fallthrough),
        Mnemonic::Sub32 => binary_three_reg(decoded, state, alu::sub32, fallthrough),
        Mnemonic::Mul32 => binary_three_reg(decoded, state, alu::mul32, fallthrough),
        Mnemonic::DivU32 => binary_three_reg(decoded, state, alu::div_u32, fallthrough),
        Mnemonic::DivS32 => binary_three_reg(decoded, state, alu::div_s32, fallthrough),
        Mnemonic::RemU32 => binary_three_reg(decoded, state, alu::rem_u32, fallthrough),
        Mnemonic::RemS32 => binary_three_reg(decoded, state, alu::rem_s32, fallthrough),
        Mnemonic::Sll32 => binary_three_reg(decoded, state, alu::sll32, fallthrough),
        Mnemonic::Srl32 => binary_three_reg(decoded, state, alu::srl32, fallthrough),
        Mnemonic::Sra32 => binary_three_reg(decoded, state, alu::sra32, fallthrough),

        Mnemonic::Add64 => binary_three_reg(decoded, state, alu::add64, fallthrough),
        Mnemonic::Sub64 => binary_three_reg(decoded, state, alu::sub64, fallthrough),
        Mnemonic::Mul64 => binary_three_reg(decoded, state, alu::mul64, fallthrough),
        Mnemonic::DivU64 => binary_three_reg(decoded, state, alu::div_u64, fallthrough),
        Mnemonic::DivS64 => binary_three_reg(decoded, state, alu::div_s64, fallthrough),
        Mnemonic::RemU64 => binary_three_reg(decoded, state, alu::rem_u64, fallthrough),
        Mnemonic::RemS64 => binary_three_reg(decoded, state, alu::rem_s64, fallthrough),
        Mnemonic::Sll64 => binary_three_reg(decoded, state, alu::sll64, fallthrough),
        Mnemonic::Srl64 => binary_three_reg(decoded, state, alu::srl64, fallthrough),
        Mnemonic::Sra64 => binary_three_reg(decoded, state, alu::sra64, fallthrough),

        Mnemonic::And => binary_three_reg(decoded, state, alu::bitand, fallthrough),
        Mnemonic::Or => binary_three_reg(decoded, state, alu::bitor, fallthrough),
        Mnemonic::Xor => binary_three_reg(decoded, state, alu::bitxor, fallthrough),
        Mnemonic::AndNot => binary_three_reg(decoded, state, alu::andnot, fallthrough),
        Mnemonic::CmpEq => binary_three_reg(decoded, state, alu::cmp_eq, fallthrough),
        Mnemonic::CmpNe => binary_three_reg(decoded, state, alu::cmp_ne, fallthrough),
        Mnemonic::CmpLtU => binary_three_reg(decoded, state, alu::cmp_lt_u, fallthrough),
        Mnemonic::CmpLtS => binary_three_reg(decoded, state, alu::cmp_lt_s, fallthrough),
        Mnemonic::CmpLeU => binary_three_reg(decoded, state, alu::cmp_le_u, fallthrough),
        Mnemonic::CmpLeS => binary_three_reg(decoded, state, alu::cmp_le_s, fallthrough),
    }
}

fn unary_two_reg(
    decoded: &DecodedInstruction,
    state: &mut MachineState,
    op: fn(u64) -> u64,
    fallthrough: StepOutcome,
) -> StepOutcome {
    let Operands::TwoReg { reg1: dst, reg2: src } = decoded.operands else { unreachable!() };
    let value = op(state.registers()[src]);
    state.registers_mut()[dst] = value;
    fallthrough
}

fn binary_three_reg(
    decoded: &DecodedInstruction,
    state: &mut MachineState,
    op: fn(u64, u64) -> u64,
    fallthrough: StepOutcome,
) -> StepOutcome {
    let Operands::ThreeReg { dst, src1, src2 } = decoded.operands else { unreachable!() };
    let value = op(state.registers()[src1], state.registers()[src2]);
    state.registers_mut()[dst] = value;
    fallthrough
}

fn store_imm(decoded: &DecodedInstruction, state: &mut MachineState, width: usize) -> StepOutcome {
    let Operands::TwoImm { imm1, imm2 } = decoded.operands else { unreachable!() };
    let address = imm1 as u64;
    let bytes = (imm2 as u64).to_le_bytes();
    match state.memory.write(address, &bytes[..width]) {
        Ok(()) => StepOutcome::Continue { next_pc: decoded.pc + INSTRUCTION_SIZE },
        Err(fault) => page_fault(fault.page),
    }
}

fn load(decoded: &DecodedInstruction, state: &mut MachineState, width: usize, signed: bool) -> StepOutcome {
    let Operands::OneRegOneImm { reg, imm } = decoded.operands else { unreachable!() };
    let address = state.registers()[reg].wrapping_add(imm as u64);
    match state.memory.read(address, width as u64) {
        Ok(bytes) => {
            let mut buf = [0u8; 8];
            buf[..width].copy_from_slice(&bytes);
            let raw = u64::from_le_bytes(buf);
            let value = if signed {
                crate::asm::sign_extend(raw, (width * 8) as u32) as u64
            } else {
                raw
            };
            state.registers_mut()[reg] = value;
            StepOutcome::Continue { next_pc: decoded.pc + INSTRUCTION_SIZE }
        }
        Err(fault) => page_fault(fault.page),
    }
}

fn store(decoded: &DecodedInstruction, state: &mut MachineState, width: usize) -> StepOutcome {
    let Operands::OneRegOneImm { reg, imm } = decoded.operands else { unreachable!() };
    let address = state.registers()[reg].wrapping_add(imm as u64);
    let bytes = state.registers()[reg].to_le_bytes();
    match state.memory.write(address, &bytes[..width]) {
        Ok(()) => StepOutcome::Continue { next_pc: decoded.pc + INSTRUCTION_SIZE },
        Err(fault) => page_fault(fault.page),
    }
}
