//! Built-in instruction definitions.
//!
//! These feed [`DecodeTable::from_defs`](crate::decode::DecodeTable::from_defs)
//! exactly as a generated 68000 table would. Only data-register and
//! absolute-long operand forms are covered; every other encoding decodes as
//! illegal and traps through vector 4.

use crate::cpu::Cpu68000;
use crate::decode::{InstrDef, Mnemonic};

/// Size field in bits 7-6 is byte, word or long.
fn sized(op: u16) -> bool {
    (op >> 6) & 3 != 3
}

/// MOVE size field in bits 13-12 is not zero.
fn move_sized(op: u16) -> bool {
    (op >> 12) & 3 != 0
}

/// Dn, or #imm (mode 7, register 4).
fn dn_or_immediate(op: u16) -> bool {
    matches!(op & 0x3F, 0x00..=0x07 | 0x3C)
}

/// ADDQ/SUBQ destinations: Dn at any size, An at word or long.
fn quick_target(op: u16) -> bool {
    let size = (op >> 6) & 3;
    match (op >> 3) & 7 {
        0 => size != 3,
        1 => size == 1 || size == 2,
        _ => false,
    }
}

/// Bcc condition field other than 0001 (BSR).
fn not_bsr(op: u16) -> bool {
    (op >> 8) & 0xF != 1
}

const fn def(
    pattern: &'static str,
    mnemonic: Mnemonic,
    handler: crate::table::InstrHandler,
) -> InstrDef {
    InstrDef {
        pattern,
        mnemonic,
        clev: 0,
        constraint: None,
        handler,
    }
}

const fn only(mut d: InstrDef, constraint: fn(u16) -> bool) -> InstrDef {
    d.constraint = Some(constraint);
    d
}

const fn level(mut d: InstrDef, clev: u8) -> InstrDef {
    d.clev = clev;
    d
}

/// The baseline instruction set, in override order.
pub const DEFS: &[InstrDef] = &[
    // Group 0
    def("0000000001111100", Mnemonic::OriSr, Cpu68000::op_ori_sr),
    def("0000001001111100", Mnemonic::AndiSr, Cpu68000::op_andi_sr),
    // Groups 1-3
    only(def("00ssrrr000111100", Mnemonic::Move, Cpu68000::op_move_imm), move_sized),
    only(def("00ss001111000rrr", Mnemonic::Move, Cpu68000::op_move_to_abs), move_sized),
    // Group 4
    def("0100000011000rrr", Mnemonic::MoveFromSr, Cpu68000::op_move_from_sr),
    only(def("0100011011mmmrrr", Mnemonic::MoveToSr, Cpu68000::op_move_to_sr), dn_or_immediate),
    only(def("01000010ss000rrr", Mnemonic::Clr, Cpu68000::op_clr), sized),
    only(def("01001010ss000rrr", Mnemonic::Tst, Cpu68000::op_tst), sized),
    def("0100101011111100", Mnemonic::Illg, Cpu68000::illegal_opcode),
    def("0100100001000rrr", Mnemonic::Swap, Cpu68000::op_swap),
    level(def("0100100111000rrr", Mnemonic::Extb, Cpu68000::op_extb), 2),
    def("0100rrr111111001", Mnemonic::Lea, Cpu68000::op_lea),
    def("010011100100vvvv", Mnemonic::Trap, Cpu68000::op_trap),
    def("0100111001110000", Mnemonic::Reset, Cpu68000::op_reset),
    def("0100111001110001", Mnemonic::Nop, Cpu68000::op_nop),
    def("0100111001110010", Mnemonic::Stop, Cpu68000::op_stop),
    def("0100111001110011", Mnemonic::Rte, Cpu68000::op_rte),
    def("0100111001110101", Mnemonic::Rts, Cpu68000::op_rts),
    def("0100111010111001", Mnemonic::Jsr, Cpu68000::op_jsr),
    def("0100111011111001", Mnemonic::Jmp, Cpu68000::op_jmp),
    // Group 5
    only(def("0101qqq0ssmmmrrr", Mnemonic::Addq, Cpu68000::op_addq), quick_target),
    only(def("0101qqq1ssmmmrrr", Mnemonic::Subq, Cpu68000::op_subq), quick_target),
    def("0101cccc11001rrr", Mnemonic::Dbcc, Cpu68000::op_dbcc),
    // Group 6
    only(def("0110ccccdddddddd", Mnemonic::Bcc, Cpu68000::op_bcc), not_bsr),
    def("01100001dddddddd", Mnemonic::Bsr, Cpu68000::op_bsr),
    // Group 7
    def("0111rrr0dddddddd", Mnemonic::Moveq, Cpu68000::op_moveq),
    // Groups 9, B, D
    only(def("1001rrr0ss000rrr", Mnemonic::Sub, Cpu68000::op_sub), sized),
    only(def("1011rrr0ss000rrr", Mnemonic::Cmp, Cpu68000::op_cmp), sized),
    only(def("1101rrr0ss000rrr", Mnemonic::Add, Cpu68000::op_add), sized),
];
