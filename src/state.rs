//! Exit reasons and the final, host-observable machine state.

use crate::memory::PagedMemory;
use crate::registers::RegisterFile;
use std::fmt;

/// The tag half of the exit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitReason {
    /// Not signalled by any opcode in the current instruction set; reserved
    /// for a future `ret`/`halt`.
    RegularHalt,
    /// `trap`, an unimplemented opcode, a decode failure, or an
    /// unrecognized fetch failure.
    Panic,
    /// The gas counter was `<= 0` at the top of a fetch cycle.
    OutOfGas,
    /// A permission violation or unmapped access during a load or store.
    PageFault,
    /// `ecalli` surrendered control to the host.
    HostCall,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::RegularHalt => "regular-halt",
            Self::Panic => "panic",
            Self::OutOfGas => "out-of-gas",
            Self::PageFault => "page-fault",
            Self::HostCall => "host-call",
        };
        f.write_str(symbol)
    }
}

/// The descriptive payload half of the exit pair.
///
/// Carries just enough structure for a host to act without string-parsing,
/// while still rendering a human-readable description via `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitData {
    /// No payload: used by `regular-halt` and the gas/out-of-gas tag.
    None,
    /// A free-form description, used by `panic` (trap cause, decode
    /// failure, unimplemented mnemonic).
    Message(String),
    /// The page index a load/store or fetch found unmapped or
    /// under-permissioned.
    Page(u64),
    /// The immediate ID surrendered to the host by `ecalli`.
    HostCallId(u64),
}

impl fmt::Display for ExitData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, ""),
            Self::Message(message) => write!(f, "{message}"),
            Self::Page(page) => write!(f, "page {page}"),
            Self::HostCallId(id) => write!(f, "{id}"),
        }
    }
}

/// The final, fully observable machine state returned by [`crate::execute`]
/// and [`crate::resume`].
///
/// On a `host-call` exit this same type is what the host mutates before
/// calling [`crate::resume`] to continue the run.
#[derive(Debug, Clone)]
pub struct MachineState {
    pub(crate) registers: RegisterFile,
    pub(crate) memory: PagedMemory,
    pub(crate) pc: u64,
    pub(crate) gas: i64,
    pub(crate) exit_reason: ExitReason,
    pub(crate) exit_data: ExitData,
}

impl MachineState {
    /// A read-only view of the 13-entry register file.
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Mutable access to the register file — used by a host resuming after
    /// a `host-call` exit to place a return value before re-entering.
    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// A read-only view of the paged address space.
    pub fn memory(&self) -> &PagedMemory {
        &self.memory
    }

    /// The byte offset of the next instruction to fetch. On a `host-call`
    /// exit this still points at the `ecalli` instruction itself.
    pub fn pc(&self) -> u64 {
        self.pc
    }

    /// Advance past the current instruction. A host resuming after
    /// `host-call` calls this before [`crate::resume`] to avoid re-entering
    /// the same `ecalli`.
    pub fn advance_pc(&mut self) {
        self.pc += crate::consts::INSTRUCTION_SIZE;
    }

    /// Remaining gas.
    pub fn gas(&self) -> i64 {
        self.gas
    }

    /// The terminal exit reason.
    pub fn exit_reason(&self) -> ExitReason {
        self.exit_reason
    }

    /// The exit reason's descriptive payload.
    pub fn exit_data(&self) -> &ExitData {
        &self.exit_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_reason_renders_its_spec_name() {
        assert_eq!(ExitReason::PageFault.to_string(), "page-fault");
        assert_eq!(ExitReason::HostCall.to_string(), "host-call");
    }

    #[test]
    fn exit_data_message_renders_plainly() {
        assert_eq!(ExitData::Message("trap".into()).to_string(), "trap");
        assert_eq!(ExitData::Page(3).to_string(), "page 3");
        assert_eq!(ExitData::HostCallId(7).to_string(), "7");
    }
}
