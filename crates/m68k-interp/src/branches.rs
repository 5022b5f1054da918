//! Branch instructions.
//!
//! Group 0x6: Bcc, BRA, BSR
//! Group 0x5 (SS=11, mode 001): DBcc

use crate::bus::M68kBus;
use crate::cpu::Cpu68000;

impl Cpu68000 {
    // ================================================================
    // Bcc / BRA / BSR  (group 0x6)
    // ================================================================
    //
    // Encoding: 0110 CCCC DDDDDDDD
    //   CCCC = condition (0000=BRA, 0001=BSR, others=Bcc)
    //   DDDDDDDD = 8-bit displacement (0 = 16-bit displacement in ext word)
    //
    // The displacement is relative to the address of the opcode plus 2.
    //
    // Timing:
    //   Bcc taken / BRA:         10
    //   Bcc not taken (8-bit):    8
    //   Bcc not taken (16-bit):  12
    //   BSR:                     18

    /// Read the displacement and return the branch target.
    fn branch_target(&mut self, bus: &mut dyn M68kBus, op: u16) -> (u32, bool) {
        let base = self.regs.pc;
        let disp8 = op as u8;
        if disp8 == 0 {
            let disp = self.fetch_word(bus) as i16;
            (base.wrapping_add_signed(i32::from(disp)), true)
        } else {
            (base.wrapping_add_signed(i32::from(disp8 as i8)), false)
        }
    }

    pub(crate) fn op_bcc(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let cond = ((op >> 8) & 0xF) as u8;
        let (target, word) = self.branch_target(bus, op);
        if self.regs.ccr.condition(cond) {
            self.jump(target);
            10
        } else if word {
            12
        } else {
            8
        }
    }

    pub(crate) fn op_bsr(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let (target, _) = self.branch_target(bus, op);
        let return_pc = self.regs.pc;
        self.push_long(bus, return_pc);
        self.jump(target);
        18
    }

    // ================================================================
    // DBcc  (group 0x5)
    // ================================================================
    //
    // Encoding: 0101 CCCC 11001 RRR, followed by a 16-bit displacement.
    //
    // If the condition holds, fall through. Otherwise decrement the low
    // word of Dn and branch unless it became -1.
    //
    // Timing:
    //   condition true:           12
    //   branch taken:             10
    //   counter expired:          14

    pub(crate) fn op_dbcc(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let cond = ((op >> 8) & 0xF) as u8;
        let reg = usize::from(op & 7);
        let base = self.regs.pc;
        let disp = self.fetch_word(bus) as i16;

        if self.regs.ccr.condition(cond) {
            return 12;
        }

        let counter = (self.regs.d[reg] as u16).wrapping_sub(1);
        self.regs.set_d_word(reg, counter);
        if counter == 0xFFFF {
            14
        } else {
            self.jump(base.wrapping_add_signed(i32::from(disp)));
            10
        }
    }
}
