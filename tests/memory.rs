//! Load/store width and permission coverage through the public
//! [`regvm::execute`] entry point: a store at a given width followed by
//! an equal-width load round-trips.
//!
//! `load_*`/`store_*` share a single register operand that serves as both
//! the address base and, for stores, the value source (shape
//! `one-reg-one-imm` only encodes one register field) — so every case
//! here seeds that register with a value that also happens to be a valid
//! writable address, via `sbrk`-grown pages sized to cover it.

use regvm::asm::encoder::assemble;
use regvm::consts::PAGE_SIZE;
use regvm::state::ExitReason;

/// Grow `pages` read-write pages (using r1/r2, left untouched afterwards),
/// then `store_mnemonic`/`load_mnemonic` r0, 0 back to back, with r0
/// preset to `value` via the initial register vector. `value` must itself
/// land inside the grown region for the store/load addresses to be valid.
fn round_trip(store_mnemonic: &str, load_mnemonic: &str, pages: u64, value: u64) -> u64 {
    let source = format!(
        "load_imm r2, {size}\nsbrk r1, r2\n{store_mnemonic} r0, 0\n{load_mnemonic} r0, 0\ntrap\n",
        size = pages * PAGE_SIZE,
    );
    let program = assemble(&source).unwrap();
    let mut registers = vec![0u64; 13];
    registers[0] = value;
    let state = regvm::execute(&program, &registers, None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::Panic);
    state.registers()[0]
}

#[test]
fn store_u8_then_load_u8_round_trips_unsigned() {
    let value = PAGE_SIZE + 0xAB; // low byte 0xAB, high bit set
    assert_eq!(round_trip("store_u8", "load_u8", 1, value), 0xAB);
}

#[test]
fn store_u8_then_load_i8_sign_extends() {
    let value = PAGE_SIZE + 0xAB;
    assert_eq!(round_trip("store_u8", "load_i8", 1, value), 0xFFFF_FFFF_FFFF_FFAB);
}

#[test]
fn store_u16_then_load_u16_round_trips_exactly() {
    let value = PAGE_SIZE + 0x0C34; // < 4096, stays within the one grown page
    assert_eq!(round_trip("store_u16", "load_u16", 1, value), value);
}

#[test]
fn store_u16_then_load_i16_sign_extends() {
    // Needs an address with bit 15 of its low 16 bits set, well past one
    // page — grow enough pages to cover it.
    let value = 0x8C34u64;
    assert_eq!(round_trip("store_u16", "load_i16", 9, value), 0xFFFF_FFFF_FFFF_8C34);
}

#[test]
fn store_u32_then_load_u32_round_trips_exactly() {
    let value = PAGE_SIZE + 0x0ABC;
    assert_eq!(round_trip("store_u32", "load_u32", 1, value), value);
}

#[test]
fn store_u64_then_load_u64_round_trips_exactly() {
    let value = PAGE_SIZE + 0x0CAB;
    assert_eq!(round_trip("store_u64", "load_u64", 1, value), value);
}

#[test]
fn store_to_a_read_only_page_page_faults() {
    // Address 0 is inside the loaded program image, mapped read-only.
    let program = assemble("store_u8 r0, 0\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::PageFault);
}

#[test]
fn load_from_an_unmapped_address_page_faults_with_the_faulting_page() {
    let mut registers = vec![0u64; 13];
    registers[0] = 10 * PAGE_SIZE;
    let program = assemble("load_u8 r0, 0\ntrap\n").unwrap();
    let state = regvm::execute(&program, &registers, None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::PageFault);
    assert_eq!(state.exit_data().to_string(), "page 10");
}

#[test]
fn store_imm_always_faults_because_its_address_space_is_the_read_only_program_image() {
    // store_imm's address operand is only an 8-bit immediate (0..255),
    // which always lands inside page 0 — the loaded program, always
    // mapped read-only. It can never succeed through the public API.
    let program = assemble("store_imm_u8 0, 1\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::PageFault);
    assert_eq!(state.exit_data().to_string(), "page 0");
}

#[test]
fn write_spanning_into_an_unmapped_page_leaves_the_mapped_bytes_untouched() {
    // r1/r2 grow exactly one writable page (page 1: 4096..8191). Starting
    // a u64 store two bytes before its end spans into the unmapped page 2.
    let source = format!(
        "load_imm r2, {size}\nsbrk r1, r2\nstore_u64 r0, 0\ntrap\n",
        size = PAGE_SIZE,
    );
    let program = assemble(&source).unwrap();
    let mut registers = vec![0u64; 13];
    let start = 2 * PAGE_SIZE - 2;
    registers[0] = start;
    let state = regvm::execute(&program, &registers, None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::PageFault);
    assert_eq!(state.memory().read(start, 2).unwrap(), vec![0, 0]);
}

#[test]
fn sbrk_rounds_the_requested_size_up_to_a_whole_page() {
    let program = assemble("load_imm r1, 1\nsbrk r0, r1\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.memory().mapped_page_count(), 2);
}

#[test]
fn sbrk_with_zero_size_grows_nothing() {
    let program = assemble("load_imm r1, 0\nsbrk r0, r1\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.memory().mapped_page_count(), 1);
    assert_eq!(state.registers()[0], regvm::consts::PAGE_SIZE);
}

#[test]
fn sbrk_grown_pages_are_read_write() {
    let program = assemble("load_imm r1, 1\nsbrk r0, r1\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.memory().page(1).unwrap().mode(), regvm::memory::AccessMode::ReadWrite);
}
