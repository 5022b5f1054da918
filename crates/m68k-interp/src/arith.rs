//! Arithmetic instructions: ADDQ, SUBQ, ADD, SUB, CMP.

use crate::alu::{self, Size};
use crate::bus::M68kBus;
use crate::cpu::Cpu68000;

impl Cpu68000 {
    // ================================================================
    // ADDQ / SUBQ  (group 0x5)
    // ================================================================
    //
    // Encoding: 0101 QQQ D SS MMM RRR
    //   QQQ = immediate data (000 means 8)
    //   D   = 0 for ADDQ, 1 for SUBQ
    //
    // Timing:
    //   Dn byte/word:  4
    //   Dn long:       8
    //   An word/long:  8 (flags untouched, full 32-bit result)

    pub(crate) fn op_addq(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        self.quick(bus, op, false)
    }

    pub(crate) fn op_subq(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        self.quick(bus, op, true)
    }

    fn quick(&mut self, bus: &mut dyn M68kBus, op: u16, subtract: bool) -> i32 {
        let Some(size) = Size::from_bits(op >> 6) else {
            return self.illegal_opcode(bus, op);
        };
        let data = match (op >> 9) & 7 {
            0 => 8,
            n => u32::from(n),
        };
        let reg = usize::from(op & 7);

        if (op >> 3) & 7 == 1 {
            let an = self.regs.a[reg];
            self.regs.a[reg] = if subtract {
                an.wrapping_sub(data)
            } else {
                an.wrapping_add(data)
            };
            return 8;
        }

        let dn = self.regs.d[reg];
        let result = if subtract {
            alu::sub(data, dn, size, &mut self.regs.ccr)
        } else {
            alu::add(data, dn, size, &mut self.regs.ccr)
        };
        self.regs.d[reg] = alu::merge(dn, result, size);
        if size == Size::Long { 8 } else { 4 }
    }

    // ================================================================
    // ADD / SUB / CMP Dn,Dn  (groups 0xD, 0x9, 0xB)
    // ================================================================
    //
    // Encoding: GGGG DDD 0SS 000 SSS
    //   DDD = destination data register
    //   SSS = source data register
    //
    // Timing:
    //   ADD/SUB byte/word: 4, long: 8
    //   CMP byte/word:     4, long: 6

    pub(crate) fn op_add(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let Some(size) = Size::from_bits(op >> 6) else {
            return self.illegal_opcode(bus, op);
        };
        let (dst, src) = Self::dn_pair(op);
        let d = self.regs.d[dst];
        let result = alu::add(self.regs.d[src], d, size, &mut self.regs.ccr);
        self.regs.d[dst] = alu::merge(d, result, size);
        if size == Size::Long { 8 } else { 4 }
    }

    pub(crate) fn op_sub(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let Some(size) = Size::from_bits(op >> 6) else {
            return self.illegal_opcode(bus, op);
        };
        let (dst, src) = Self::dn_pair(op);
        let d = self.regs.d[dst];
        let result = alu::sub(self.regs.d[src], d, size, &mut self.regs.ccr);
        self.regs.d[dst] = alu::merge(d, result, size);
        if size == Size::Long { 8 } else { 4 }
    }

    pub(crate) fn op_cmp(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let Some(size) = Size::from_bits(op >> 6) else {
            return self.illegal_opcode(bus, op);
        };
        let (dst, src) = Self::dn_pair(op);
        alu::cmp(self.regs.d[src], self.regs.d[dst], size, &mut self.regs.ccr);
        if size == Size::Long { 6 } else { 4 }
    }

    fn dn_pair(op: u16) -> (usize, usize) {
        (usize::from((op >> 9) & 7), usize::from(op & 7))
    }
}
