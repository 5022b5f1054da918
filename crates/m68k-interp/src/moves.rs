//! Data movement: MOVEQ, MOVE #imm,Dn, MOVE Dn,(xxx).L.

use crate::alu::{self, Size};
use crate::bus::M68kBus;
use crate::cpu::Cpu68000;

impl Cpu68000 {
    /// MOVEQ #d8,Dn: sign-extend to 32 bits. 4 cycles.
    pub(crate) fn op_moveq(&mut self, _bus: &mut dyn M68kBus, op: u16) -> i32 {
        let value = op as u8 as i8 as i32 as u32;
        self.regs.d[usize::from((op >> 9) & 7)] = value;
        self.regs.ccr.set_logic(value, 32);
        4
    }

    // ================================================================
    // MOVE  (groups 0x1, 0x2, 0x3)
    // ================================================================
    //
    // Encoding: 00SS DDD MMM mmm sss
    //   SS = size (01=byte, 11=word, 10=long)
    //   DDD MMM = destination register, mode (note the reversed order)
    //   mmm sss = source mode, register
    //
    // Timing:
    //   #imm,Dn:       byte/word 8,  long 12
    //   Dn,(xxx).L:    byte/word 16, long 20

    pub(crate) fn op_move_imm(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let Some(size) = Size::from_move_bits(op >> 12) else {
            return self.illegal_opcode(bus, op);
        };
        let value = match size {
            Size::Byte => u32::from(self.fetch_word(bus) & 0xFF),
            Size::Word => u32::from(self.fetch_word(bus)),
            Size::Long => self.fetch_long(bus),
        };
        let reg = usize::from((op >> 9) & 7);
        self.regs.d[reg] = alu::merge(self.regs.d[reg], value, size);
        self.regs.ccr.set_logic(value, size.bits());
        if size == Size::Long { 12 } else { 8 }
    }

    pub(crate) fn op_move_to_abs(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let Some(size) = Size::from_move_bits(op >> 12) else {
            return self.illegal_opcode(bus, op);
        };
        let value = self.regs.d[usize::from(op & 7)];
        let addr = self.fetch_long(bus);
        match size {
            Size::Byte => bus.write_byte(addr, value as u8),
            Size::Word => bus.write_word(addr, value as u16),
            Size::Long => bus.write_long(addr, value),
        }
        self.regs.ccr.set_logic(value, size.bits());
        if size == Size::Long { 20 } else { 16 }
    }
}
