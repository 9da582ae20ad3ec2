//! Round-trip coverage for the assembler/decoder pair:
//! `decode(encode(line)) = (opcode_of(line), operands_of(line))`.

use quickcheck_macros::quickcheck;
use regvm::asm::encoder::{assemble, assemble_words};
use regvm::asm::{decode, Mnemonic, Operands};

#[test]
fn every_shape_round_trips_through_one_representative_mnemonic() {
    let cases = [
        ("trap", Mnemonic::Trap, Operands::NoArgs),
        ("ecalli 7", Mnemonic::Ecalli, Operands::OneImm { imm: 7 }),
        ("jump -1", Mnemonic::Jump, Operands::OneOffset { offset: -1 }),
        ("load_imm r5, 100", Mnemonic::LoadImm, Operands::OneRegOneImm { reg: 5, imm: 100 }),
        ("move_reg r1, r2", Mnemonic::MoveReg, Operands::TwoReg { reg1: 1, reg2: 2 }),
        (
            "add_64 r2, r0, r1",
            Mnemonic::Add64,
            Operands::ThreeReg { dst: 2, src1: 0, src2: 1 },
        ),
        (
            "jump_ind r3, 20",
            Mnemonic::JumpInd,
            Operands::OneRegOneExtImm { reg: 3, imm: 20 },
        ),
        (
            "store_imm_u16 10, 500",
            Mnemonic::StoreImmU16,
            Operands::TwoImm { imm1: 10, imm2: 500 },
        ),
    ];

    for (line, mnemonic, operands) in cases {
        let words = assemble_words(line).unwrap();
        assert_eq!(words.len(), 1, "line {line:?} should assemble to exactly one word");
        let decoded = decode(words[0], 0).unwrap();
        assert_eq!(decoded.mnemonic, mnemonic, "mnemonic mismatch for {line:?}");
        assert_eq!(decoded.operands, operands, "operand mismatch for {line:?}");
    }
}

#[test]
fn assemble_produces_little_endian_bytes() {
    let bytes = assemble("trap\n").unwrap();
    assert_eq!(bytes, vec![Mnemonic::Trap.opcode(), 0, 0, 0]);
}

#[test]
fn comments_and_blank_lines_do_not_produce_words() {
    let source = "# a full program\n\nload_imm r0, 1\n# trailing comment\ntrap\n";
    let words = assemble_words(source).unwrap();
    assert_eq!(words.len(), 2);
}

#[quickcheck]
fn three_reg_register_indices_round_trip(dst: u8, src1: u8, src2: u8) -> bool {
    let (dst, src1, src2) = (dst % 13, src1 % 13, src2 % 13);
    let line = format!("add_64 r{dst}, r{src1}, r{src2}");
    let words = assemble_words(&line).unwrap();
    let decoded = decode(words[0], 0).unwrap();
    decoded.operands == Operands::ThreeReg { dst: dst as u32, src1: src1 as u32, src2: src2 as u32 }
}

#[quickcheck]
fn one_reg_one_imm_round_trips(reg: u8, imm: u32) -> bool {
    let reg = reg % 13;
    let imm = imm % (1 << 20);
    let line = format!("load_imm r{reg}, {imm}");
    let words = assemble_words(&line).unwrap();
    let decoded = decode(words[0], 0).unwrap();
    decoded.operands == Operands::OneRegOneImm { reg: reg as u32, imm }
}
