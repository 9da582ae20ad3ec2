//! Error taxonomy.
//!
//! The VM has exactly one fallible, out-of-band surface: the arguments
//! passed to [`crate::execute`] before any state is constructed. Everything
//! that happens once a run is underway — panics, page faults, out-of-gas,
//! host calls — is reported in-band through [`crate::state::ExitReason`],
//! never as a [`Result::Err`].

use thiserror::Error;

/// Argument errors raised by [`crate::execute`]/[`crate::resume`] before a
/// run starts. State is not created when this is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExecError {
    /// The caller supplied a zero-length program image.
    ///
    /// A zero-length program can never be loaded into a useful page-aligned
    /// image, so it is rejected up front rather than left to page-fault (as
    /// panic, per the fetch/data asymmetry) on the first fetch.
    #[error("program image is empty")]
    EmptyProgram,
}

/// Failure to decode a 32-bit instruction word.
///
/// The driver never propagates this as a [`std::result::Result::Err`]; it
/// converts every variant into a `panic` exit carrying a description of the
/// failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The low 8 bits of the instruction word did not match any known
    /// opcode.
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    /// A decoded operand referenced a register index outside
    /// `0..REGISTER_COUNT`.
    #[error("register index {0} out of range")]
    InvalidRegister(u32),
}
