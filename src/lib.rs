//! A deterministic, register-based bytecode VM with gas accounting, paged
//! memory, and a host-call escape hatch.
//!
//! [`execute`] runs a program image to completion (or to its first
//! suspension point) and returns the final, fully observable
//! [`state::MachineState`]. A `host-call` exit is not a failure: the host
//! may inspect and mutate the returned state, then call [`resume`] to
//! continue the same run.

pub mod asm;
pub mod consts;
pub mod error;
pub mod interpreter;
pub mod memory;
pub mod registers;
pub mod state;

use consts::{DEFAULT_GAS_LIMIT, INSTRUCTION_SIZE};
use error::ExecError;
use memory::PagedMemory;
use registers::RegisterFile;
use state::{ExitData, ExitReason, MachineState};

/// Run `program` from a fresh machine state until it halts or suspends.
///
/// `initial_registers` seeds the register file (truncated or zero-padded
/// to 13 entries; see [`registers::RegisterFile::with_initial`]).
/// `gas_limit` defaults to [`DEFAULT_GAS_LIMIT`] when `None`.
///
/// Returns [`ExecError::EmptyProgram`] without creating any state if
/// `program` is empty.
pub fn execute(
    program: &[u8],
    initial_registers: &[u64],
    gas_limit: Option<i64>,
) -> Result<MachineState, ExecError> {
    if program.is_empty() {
        return Err(ExecError::EmptyProgram);
    }

    let mut memory = PagedMemory::new();
    memory.load_program(program);

    let mut state = MachineState {
        registers: RegisterFile::with_initial(initial_registers),
        memory,
        pc: 0,
        gas: gas_limit.unwrap_or(DEFAULT_GAS_LIMIT),
        exit_reason: ExitReason::RegularHalt,
        exit_data: ExitData::None,
    };

    run_loop(&mut state);
    Ok(state)
}

/// Continue a run previously paused by a `host-call` exit.
///
/// The caller is expected to have already mutated `state` (e.g. placed a
/// return value in a register) and, if it does not want the same `ecalli`
/// re-executed, called [`state::MachineState::advance_pc`] first.
pub fn resume(mut state: MachineState) -> MachineState {
    run_loop(&mut state);
    state
}

fn run_loop(state: &mut MachineState) {
    loop {
        if state.gas <= 0 {
            exit(state, ExitReason::OutOfGas, ExitData::None);
            return;
        }

        let word = match fetch(state) {
            Ok(word) => word,
            Err(outcome) => {
                apply(state, outcome);
                return;
            }
        };

        let decoded = match asm::decode(word, state.pc) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::debug!(pc = state.pc, error = %err, "decode failed");
                exit(state, ExitReason::Panic, ExitData::Message(err.to_string()));
                return;
            }
        };

        tracing::trace!(pc = state.pc, mnemonic = %decoded.mnemonic, "executing instruction");

        match interpreter::step(&decoded, state) {
            interpreter::StepOutcome::Continue { next_pc } => {
                state.pc = next_pc;
                state.gas -= decoded.gas_cost;
            }
            interpreter::StepOutcome::Exit { reason, data } => {
                exit(state, reason, data);
                return;
            }
        }
    }
}

/// Fetch the 4-byte little-endian instruction word at `state.pc`.
///
/// A failed fetch is reported as `panic`, not `page-fault`: jumping to
/// unmapped code panics, while dereferencing an unmapped data pointer during
/// a load or store page-faults.
fn fetch(state: &MachineState) -> Result<u32, interpreter::StepOutcome> {
    match state.memory.read(state.pc, INSTRUCTION_SIZE) {
        Ok(bytes) => {
            let array: [u8; 4] = bytes.try_into().expect("INSTRUCTION_SIZE bytes were read");
            Ok(u32::from_le_bytes(array))
        }
        Err(fault) => Err(interpreter::StepOutcome::Exit {
            reason: ExitReason::Panic,
            data: ExitData::Message(format!("instruction fetch faulted at page {}", fault.page)),
        }),
    }
}

fn apply(state: &mut MachineState, outcome: interpreter::StepOutcome) {
    match outcome {
        interpreter::StepOutcome::Exit { reason, data } => exit(state, reason, data),
        interpreter::StepOutcome::Continue { .. } => unreachable!("fetch failures only produce Exit"),
    }
}

fn exit(state: &mut MachineState, reason: ExitReason, data: ExitData) {
    tracing::debug!(pc = state.pc, gas = state.gas, %reason, "execution halted");
    state.exit_reason = reason;
    state.exit_data = data;
}
