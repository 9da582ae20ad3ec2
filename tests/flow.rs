//! Control-flow coverage: `jump`, `jump_ind`, `fallthrough`, `trap`,
//! `ecalli`/resume, and the decode-failure-is-panic path.

use regvm::asm::encoder::assemble;
use regvm::consts::INSTRUCTION_SIZE;
use regvm::state::ExitReason;

#[test]
fn non_branching_instructions_advance_pc_by_one_word() {
    let program = assemble("fallthrough\nfallthrough\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.pc(), 2 * INSTRUCTION_SIZE);
}

#[test]
fn jump_adds_its_signed_offset_to_the_current_pc() {
    // jump +8 skips the next instruction (a trap) and lands on fallthrough,
    // then trap; if the skip failed to happen we'd panic at pc=4 instead.
    let program = assemble("jump 8\ntrap\nfallthrough\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::Panic);
    assert_eq!(state.pc(), 3 * INSTRUCTION_SIZE);
}

#[test]
fn jump_backwards_with_a_negative_offset() {
    // word0 jumps forward over word1 (a trap) to word2, which then jumps
    // backward by 4 to land on word1's trap — exercising a negative offset
    // without looping, since every instruction costs zero gas.
    let program = assemble("jump 8\ntrap\njump -4\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::Panic);
    assert_eq!(state.pc(), INSTRUCTION_SIZE);
}

#[test]
fn jump_ind_targets_the_register_plus_immediate_aligned_down() {
    let program = assemble("jump_ind r0, 6\ntrap\nfallthrough\ntrap\n").unwrap();
    let mut registers = vec![0u64; 13];
    registers[0] = 2; // 2 + 6 = 8, already 4-byte aligned -> word 2 (fallthrough)
    let state = regvm::execute(&program, &registers, None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::Panic);
    assert_eq!(state.pc(), 3 * INSTRUCTION_SIZE);
}

#[test]
fn jump_ind_rounds_an_unaligned_target_down_to_the_boundary() {
    let program = assemble("jump_ind r0, 7\ntrap\nfallthrough\ntrap\n").unwrap();
    let mut registers = vec![0u64; 13];
    registers[0] = 2; // 2 + 7 = 9 -> rounds down to 8, same word as above
    let state = regvm::execute(&program, &registers, None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::Panic);
    assert_eq!(state.pc(), 3 * INSTRUCTION_SIZE);
}

#[test]
fn trap_always_panics_with_a_descriptive_message() {
    let program = assemble("trap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::Panic);
    assert_eq!(state.exit_data().to_string(), "trap");
}

#[test]
fn unknown_opcode_panics_rather_than_erroring_out_of_band() {
    // Byte 7 is not assigned to any mnemonic (see the opcode table).
    let program = vec![7u8, 0, 0, 0];
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::Panic);
}

#[test]
fn fetching_unmapped_code_panics_not_page_faults() {
    // jump_ind far past the loaded image; the fetch at the new pc fails,
    // which must surface as panic, not page-fault.
    let program = assemble("jump_ind r0, 0\ntrap\n").unwrap();
    let mut registers = vec![0u64; 13];
    registers[0] = 0x1000000;
    let state = regvm::execute(&program, &registers, None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::Panic);
}

#[test]
fn ecalli_suspends_and_resume_continues_past_it_after_advance_pc() {
    let program = assemble("ecalli 9\nload_imm r0, 5\ntrap\n").unwrap();
    let mut state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::HostCall);
    assert_eq!(state.exit_data().to_string(), "9");
    assert_eq!(state.pc(), 0);

    state.advance_pc();
    let state = regvm::resume(state);
    assert_eq!(state.exit_reason(), ExitReason::Panic);
    assert_eq!(state.registers()[0], 5);
}

#[test]
fn resuming_without_advancing_pc_re_enters_the_same_ecalli() {
    let program = assemble("ecalli 9\ntrap\n").unwrap();
    let state = regvm::execute(&program, &[], None).unwrap();
    assert_eq!(state.exit_reason(), ExitReason::HostCall);

    let state = regvm::resume(state);
    assert_eq!(state.exit_reason(), ExitReason::HostCall);
    assert_eq!(state.pc(), 0);
}

#[test]
fn empty_program_is_rejected_before_any_state_is_created() {
    let result = regvm::execute(&[], &[], None);
    assert!(result.is_err());
}
