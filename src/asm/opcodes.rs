//! The opcode table: mnemonic ⇔ opcode byte ⇔ operand shape ⇔ gas cost.
//!
//! The byte assignments below are the authoritative ones and must not
//! change: `trap`=0, `fallthrough`=1, `ecalli`=10, `load_imm_64`=20,
//! `store_imm_u8..u64`=30..33, `jump`=40, `jump_ind`=50, `load_imm`=51,
//! `load_u8/i8/u16/i16/u32/i32/u64`=52..58, `store_u8..u64`=59..62,
//! `move_reg`=100, `sbrk`=101, bit-manipulation 102..111, 32-bit arithmetic
//! 190..199, 64-bit arithmetic 200..209, bitwise/comparison 210..219.

use super::Shape;
use crate::error::DecodeError;

/// Every opcode this VM understands, with its mnemonic as the `Display`/
/// `FromStr` text form used by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum Mnemonic {
    #[strum(serialize = "trap")]
    Trap,
    #[strum(serialize = "fallthrough")]
    Fallthrough,
    #[strum(serialize = "ecalli")]
    Ecalli,
    #[strum(serialize = "load_imm_64")]
    LoadImm64,
    #[strum(serialize = "store_imm_u8")]
    StoreImmU8,
    #[strum(serialize = "store_imm_u16")]
    StoreImmU16,
    #[strum(serialize = "store_imm_u32")]
    StoreImmU32,
    #[strum(serialize = "store_imm_u64")]
    StoreImmU64,
    #[strum(serialize = "jump")]
    Jump,
    #[strum(serialize = "jump_ind")]
    JumpInd,
    #[strum(serialize = "load_imm")]
    LoadImm,
    #[strum(serialize = "load_u8")]
    LoadU8,
    #[strum(serialize = "load_i8")]
    LoadI8,
    #[strum(serialize = "load_u16")]
    LoadU16,
    #[strum(serialize = "load_i16")]
    LoadI16,
    #[strum(serialize = "load_u32")]
    LoadU32,
    #[strum(serialize = "load_i32")]
    LoadI32,
    #[strum(serialize = "load_u64")]
    LoadU64,
    #[strum(serialize = "store_u8")]
    StoreU8,
    #[strum(serialize = "store_u16")]
    StoreU16,
    #[strum(serialize = "store_u32")]
    StoreU32,
    #[strum(serialize = "store_u64")]
    StoreU64,
    #[strum(serialize = "move_reg")]
    MoveReg,
    #[strum(serialize = "sbrk")]
    Sbrk,
    #[strum(serialize = "clz")]
    Clz,
    #[strum(serialize = "ctz")]
    Ctz,
    #[strum(serialize = "popcount")]
    Popcount,
    #[strum(serialize = "sign_extend_8")]
    SignExtend8,
    #[strum(serialize = "sign_extend_16")]
    SignExtend16,
    #[strum(serialize = "sign_extend_32")]
    SignExtend32,
    #[strum(serialize = "byte_swap")]
    ByteSwap,
    #[strum(serialize = "bit_reverse")]
    BitReverse,
    #[strum(serialize = "popcount_32")]
    Popcount32,
    #[strum(serialize = "clz_32")]
    Clz32,
    #[strum(serialize = "add_32")]
    Add32,
    #[strum(serialize = "sub_32")]
    Sub32,
    #[strum(serialize = "mul_32")]
    Mul32,
    #[strum(serialize = "div_u32")]
    DivU32,
    #[strum(serialize = "div_s32")]
    DivS32,
    #[strum(serialize = "rem_u32")]
    RemU32,
    #[strum(serialize = "rem_s32")]
    RemS32,
    #[strum(serialize = "sll_32")]
    Sll32,
    #[strum(serialize = "srl_32")]
    Srl32,
    #[strum(serialize = "sra_32")]
    Sra32,
    #[strum(serialize = "add_64")]
    Add64,
    #[strum(serialize = "sub_64")]
    Sub64,
    #[strum(serialize = "mul_64")]
    Mul64,
    #[strum(serialize = "div_u64")]
    DivU64,
    #[strum(serialize = "div_s64")]
    DivS64,
    #[strum(serialize = "rem_u64")]
    RemU64,
    #[strum(serialize = "rem_s64")]
    RemS64,
    #[strum(serialize = "sll_64")]
    Sll64,
    #[strum(serialize = "srl_64")]
    Srl64,
    #[strum(serialize = "sra_64")]
    Sra64,
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "xor")]
    Xor,
    #[strum(serialize = "cmp_eq")]
    CmpEq,
    #[strum(serialize = "cmp_ne")]
    CmpNe,
    #[strum(serialize = "cmp_lt_u")]
    CmpLtU,
    #[strum(serialize = "cmp_lt_s")]
    CmpLtS,
    #[strum(serialize = "cmp_le_u")]
    CmpLeU,
    #[strum(serialize = "cmp_le_s")]
    CmpLeS,
    #[strum(serialize = "and_not")]
    AndNot,
}

impl Mnemonic {
    /// The opcode byte assigned to this mnemonic.
    pub const fn opcode(self) -> u8 {
        use Mnemonic::*;
        match self {
            Trap => 0,
            Fallthrough => 1,
            Ecalli => 10,
            LoadImm64 => 20,
            StoreImmU8 => 30,
            StoreImmU16 => 31,
            StoreImmU32 => 32,
            StoreImmU64 => 33,
            Jump => 40,
            JumpInd => 50,
            LoadImm => 51,
            LoadU8 => 52,
            LoadI8 => 53,
            LoadU16 => 54,
            LoadI16 => 55,
            LoadU32 => 56,
            LoadI32 => 57,
            LoadU64 => 58,
            StoreU8 => 59,
            StoreU16 => 60,
            StoreU32 => 61,
            StoreU64 => 62,
            MoveReg => 100,
            Sbrk => 101,
            Clz => 102,
            Ctz => 103,
            Popcount => 104,
            SignExtend8 => 105,
            SignExtend16 => 106,
            SignExtend32 => 107,
            ByteSwap => 108,
            BitReverse => 109,
            Popcount32 => 110,
            Clz32 => 111,
            Add32 => 190,
            Sub32 => 191,
            Mul32 => 192,
            DivU32 => 193,
            DivS32 => 194,
            RemU32 => 195,
            RemS32 => 196,
            Sll32 => 197,
            Srl32 => 198,
            Sra32 => 199,
            Add64 => 200,
            Sub64 => 201,
            Mul64 => 202,
            DivU64 => 203,
            DivS64 => 204,
            RemU64 => 205,
            RemS64 => 206,
            Sll64 => 207,
            Srl64 => 208,
            Sra64 => 209,
            And => 210,
            Or => 211,
            Xor => 212,
            CmpEq => 213,
            CmpNe => 214,
            CmpLtU => 215,
            CmpLtS => 216,
            CmpLeU => 217,
            CmpLeS => 218,
            AndNot => 219,
        }
    }

    /// Look up the mnemonic assigned to an opcode byte.
    pub fn from_opcode(opcode: u8) -> Result<Self, DecodeError> {
        use Mnemonic::*;
        Ok(match opcode {
            0 => Trap,
            1 => Fallthrough,
            10 => Ecalli,
            20 => LoadImm64,
            30 => StoreImmU8,
            31 => StoreImmU16,
            32 => StoreImmU32,
            33 => StoreImmU64,
            40 => Jump,
            50 => JumpInd,
            51 => LoadImm,
            52 => LoadU8,
            53 => LoadI8,
            54 => LoadU16,
            55 => LoadI16,
            56 => LoadU32,
            57 => LoadI32,
            58 => LoadU64,
            59 => StoreU8,
            60 => StoreU16,
            61 => StoreU32,
            62 => StoreU64,
            100 => MoveReg,
            101 => Sbrk,
            102 => Clz,
            103 => Ctz,
            104 => Popcount,
            105 => SignExtend8,
            106 => SignExtend16,
            107 => SignExtend32,
            108 => ByteSwap,
            109 => BitReverse,
            110 => Popcount32,
            111 => Clz32,
            190 => Add32,
            191 => Sub32,
            192 => Mul32,
            193 => DivU32,
            194 => DivS32,
            195 => RemU32,
            196 => RemS32,
            197 => Sll32,
            198 => Srl32,
            199 => Sra32,
            200 => Add64,
            201 => Sub64,
            202 => Mul64,
            203 => DivU64,
            204 => DivS64,
            205 => RemU64,
            206 => RemS64,
            207 => Sll64,
            208 => Srl64,
            209 => Sra64,
            210 => And,
            211 => Or,
            212 => Xor,
            213 => CmpEq,
            214 => CmpNe,
            215 => CmpLtU,
            216 => CmpLtS,
            217 => CmpLeU,
            218 => CmpLeS,
            219 => AndNot,
            other => return Err(DecodeError::UnknownOpcode(other)),
        })
    }

    /// The operand shape this mnemonic decodes with.
    pub const fn shape(self) -> Shape {
        use Mnemonic::*;
        match self {
            Trap | Fallthrough => Shape::NoArgs,
            Ecalli => Shape::OneImm,
            LoadImm64 | JumpInd => Shape::OneRegOneExtImm,
            StoreImmU8 | StoreImmU16 | StoreImmU32 | StoreImmU64 => Shape::TwoImm,
            Jump => Shape::OneOffset,
            LoadImm | LoadU8 | LoadI8 | LoadU16 | LoadI16 | LoadU32 | LoadI32 | LoadU64 | StoreU8 | StoreU16
            | StoreU32 | StoreU64 => Shape::OneRegOneImm,
            MoveReg | Sbrk | Clz | Ctz | Popcount | SignExtend8 | SignExtend16 | SignExtend32 | ByteSwap
            | BitReverse | Popcount32 | Clz32 => Shape::TwoReg,
            Add32 | Sub32 | Mul32 | DivU32 | DivS32 | RemU32 | RemS32 | Sll32 | Srl32 | Sra32 | Add64 | Sub64
            | Mul64 | DivU64 | DivS64 | RemU64 | RemS64 | Sll64 | Srl64 | Sra64 | And | Or | Xor | CmpEq | CmpNe
            | CmpLtU | CmpLtS | CmpLeU | CmpLeS | AndNot => Shape::ThreeReg,
        }
    }

    /// The gas cost charged for executing this instruction.
    ///
    /// Every entry is zero today, so gas only terminates execution if the
    /// caller sets a non-positive limit up front. The lookup is per-mnemonic
    /// rather than a single constant so a real cost schedule can be dropped
    /// in without touching the decoder or executor.
    pub const fn gas_cost(self) -> i64 {
        0
    }
}
