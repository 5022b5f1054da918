//! Immediate-to-SR instructions: ORI to SR, ANDI to SR.
//!
//! Both are privileged and take 20 cycles. The result is unpacked at once,
//! so clearing S here switches to the user stack.

use crate::bus::M68kBus;
use crate::cpu::Cpu68000;

impl Cpu68000 {
    pub(crate) fn op_ori_sr(&mut self, bus: &mut dyn M68kBus, _op: u16) -> i32 {
        if let Some(cycles) = self.require_supervisor(bus) {
            return cycles;
        }
        let imm = self.fetch_word(bus);
        let sr = self.regs.sr() | imm;
        self.regs.set_sr(sr);
        20
    }

    pub(crate) fn op_andi_sr(&mut self, bus: &mut dyn M68kBus, _op: u16) -> i32 {
        if let Some(cycles) = self.require_supervisor(bus) {
            return cycles;
        }
        let imm = self.fetch_word(bus);
        let sr = self.regs.sr() & imm;
        self.regs.set_sr(sr);
        20
    }
}
