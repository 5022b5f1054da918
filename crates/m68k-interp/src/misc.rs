//! Group 0x4 miscellaneous instructions.

use crate::alu::{self, Size};
use crate::bus::M68kBus;
use crate::cpu::Cpu68000;
use crate::exceptions::{EXCEPTION_CYCLES, VECTOR_TRAP_BASE};

impl Cpu68000 {
    pub(crate) fn op_nop(&mut self, _bus: &mut dyn M68kBus, _op: u16) -> i32 {
        4
    }

    /// RESET: pulse the external reset line. Privileged.
    pub(crate) fn op_reset(&mut self, bus: &mut dyn M68kBus, _op: u16) -> i32 {
        if let Some(cycles) = self.require_supervisor(bus) {
            return cycles;
        }
        bus.reset();
        132
    }

    /// STOP #imm: load SR and halt until an interrupt or reset. Privileged.
    pub(crate) fn op_stop(&mut self, bus: &mut dyn M68kBus, _op: u16) -> i32 {
        if let Some(cycles) = self.require_supervisor(bus) {
            return cycles;
        }
        let sr = self.fetch_word(bus);
        self.regs.set_sr(sr);
        self.regs.stopped = true;
        #[cfg(feature = "log")]
        slog::debug!(self.logger, "STOP #{:#06X} at {:#010X}", sr, self.regs.ppc);
        4
    }

    /// TRAP #n: vector 32+n, stacking the address of the next instruction.
    pub(crate) fn op_trap(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let vector = VECTOR_TRAP_BASE + (op & 0xF) as u8;
        let pc = self.regs.pc;
        self.exception(bus, vector, pc);
        EXCEPTION_CYCLES
    }

    // ================================================================
    // Flow control: JMP, JSR (absolute long), RTS, RTE
    // ================================================================
    //
    // Timing:
    //   JMP (xxx).L:  12
    //   JSR (xxx).L:  20
    //   RTS:          16
    //   RTE:          20

    pub(crate) fn op_jmp(&mut self, bus: &mut dyn M68kBus, _op: u16) -> i32 {
        let target = self.fetch_long(bus);
        self.jump(target);
        12
    }

    pub(crate) fn op_jsr(&mut self, bus: &mut dyn M68kBus, _op: u16) -> i32 {
        let target = self.fetch_long(bus);
        let return_pc = self.regs.pc;
        self.push_long(bus, return_pc);
        self.jump(target);
        20
    }

    pub(crate) fn op_rts(&mut self, bus: &mut dyn M68kBus, _op: u16) -> i32 {
        let target = self.pop_long(bus);
        self.jump(target);
        16
    }

    /// RTE: pop SR then PC. Privileged. Restoring a user-mode SR switches
    /// back to the user stack.
    pub(crate) fn op_rte(&mut self, bus: &mut dyn M68kBus, _op: u16) -> i32 {
        if let Some(cycles) = self.require_supervisor(bus) {
            return cycles;
        }
        let sr = self.pop_word(bus);
        let pc = self.pop_long(bus);
        self.regs.set_sr(sr);
        self.jump(pc);
        20
    }

    /// LEA (xxx).L,An
    pub(crate) fn op_lea(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let reg = usize::from((op >> 9) & 7);
        self.regs.a[reg] = self.fetch_long(bus);
        12
    }

    // ================================================================
    // Single-operand data register: CLR, TST, SWAP, EXTB
    // ================================================================

    pub(crate) fn op_clr(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let Some(size) = Size::from_bits(op >> 6) else {
            return self.illegal_opcode(bus, op);
        };
        let reg = usize::from(op & 7);
        self.regs.d[reg] = alu::merge(self.regs.d[reg], 0, size);
        self.regs.ccr.set_logic(0, size.bits());
        if size == Size::Long { 6 } else { 4 }
    }

    pub(crate) fn op_tst(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        let Some(size) = Size::from_bits(op >> 6) else {
            return self.illegal_opcode(bus, op);
        };
        let value = self.regs.d[usize::from(op & 7)];
        self.regs.ccr.set_logic(value, size.bits());
        4
    }

    pub(crate) fn op_swap(&mut self, _bus: &mut dyn M68kBus, op: u16) -> i32 {
        let reg = usize::from(op & 7);
        let value = self.regs.d[reg].rotate_left(16);
        self.regs.d[reg] = value;
        self.regs.ccr.set_logic(value, 32);
        4
    }

    /// EXTB.L Dn (68020 and later).
    pub(crate) fn op_extb(&mut self, _bus: &mut dyn M68kBus, op: u16) -> i32 {
        let reg = usize::from(op & 7);
        let value = self.regs.d[reg] as u8 as i8 as i32 as u32;
        self.regs.d[reg] = value;
        self.regs.ccr.set_logic(value, 32);
        4
    }

    // ================================================================
    // MOVE from SR / MOVE to SR
    // ================================================================
    //
    // MOVE from SR is unprivileged on the 68000.
    //
    // Timing:
    //   MOVE SR,Dn:     6
    //   MOVE Dn,SR:    12
    //   MOVE #imm,SR:  16

    pub(crate) fn op_move_from_sr(&mut self, _bus: &mut dyn M68kBus, op: u16) -> i32 {
        let sr = self.regs.sr();
        self.regs.set_d_word(usize::from(op & 7), sr);
        6
    }

    pub(crate) fn op_move_to_sr(&mut self, bus: &mut dyn M68kBus, op: u16) -> i32 {
        if let Some(cycles) = self.require_supervisor(bus) {
            return cycles;
        }
        if (op >> 3) & 7 == 0 {
            let sr = self.regs.d[usize::from(op & 7)] as u16;
            self.regs.set_sr(sr);
            12
        } else {
            let sr = self.fetch_word(bus);
            self.regs.set_sr(sr);
            16
        }
    }
}
