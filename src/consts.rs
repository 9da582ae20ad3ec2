//! VM parameters shared across the decoder, executor, memory, and driver.

/// Number of addressable registers in the register file.
pub const REGISTER_COUNT: usize = 13;

/// Size in bytes of a single memory page. Every page is aligned to this
/// boundary and access permissions are uniform across a page.
pub const PAGE_SIZE: u64 = 4096;

/// Size in bytes of a single instruction word.
pub const INSTRUCTION_SIZE: u64 = 4;

/// Default gas limit used when a caller does not supply one.
pub const DEFAULT_GAS_LIMIT: i64 = 1_000_000;
