//! Exception processing and interrupt arbitration.
//!
//! Every exception modelled here builds the short 68000 frame on the
//! supervisor stack:
//!
//! ```text
//! SP+2: PC (long)
//! SP+0: SR (word, as it was before the exception)
//! ```
//!
//! Interrupts additionally raise the mask to the serviced level and charge
//! their service time to the interrupt accumulator instead of the handler
//! that happened to be running.

use crate::bus::{IntAck, M68kBus};
use crate::cpu::Cpu68000;

pub const VECTOR_ILLEGAL_INSTRUCTION: u8 = 4;
pub const VECTOR_PRIVILEGE_VIOLATION: u8 = 8;
pub const VECTOR_LINE_A: u8 = 10;
pub const VECTOR_LINE_F: u8 = 11;
/// Substituted when an interrupt's own vector slot holds zero.
pub const VECTOR_UNINITIALIZED_INTERRUPT: u32 = 15;
/// No device answered the acknowledge cycle.
pub const VECTOR_SPURIOUS_INTERRUPT: u32 = 24;
/// Level 1 autovector; level n uses `VECTOR_AUTOVECTOR_BASE + n`.
pub const VECTOR_AUTOVECTOR_BASE: u32 = 24;
/// TRAP #0; TRAP #n uses `VECTOR_TRAP_BASE + n`.
pub const VECTOR_TRAP_BASE: u8 = 32;

/// Cost of dispatching an illegal or unimplemented opcode.
pub const ILLEGAL_OPCODE_CYCLES: i32 = 4;
/// Interrupt service overhead, charged to the interrupt accumulator.
pub const INTERRUPT_CYCLES: i32 = 56;
/// Privilege violation and TRAP processing.
pub const EXCEPTION_CYCLES: i32 = 34;

impl Cpu68000 {
    /// Enter supervisor mode for an exception. Returns the SR to stack.
    fn begin_exception(&mut self) -> u16 {
        let sr = self.regs.sr();
        self.regs.set_supervisor(true);
        self.regs.t = false;
        sr
    }

    fn push_frame(&mut self, bus: &mut dyn M68kBus, pc: u32, sr: u16) {
        self.push_long(bus, pc);
        self.push_word(bus, sr);
    }

    /// Take a software exception through `vector`, stacking `return_pc`.
    pub(crate) fn exception(&mut self, bus: &mut dyn M68kBus, vector: u8, return_pc: u32) {
        let sr = self.begin_exception();
        self.push_frame(bus, return_pc, sr);
        let target = bus.read_long(u32::from(vector) * 4);
        self.jump(target);
    }

    /// Handler installed in every slot with no instruction behind it.
    ///
    /// Line-A and line-F opcodes trap through their emulator vectors;
    /// everything else is an illegal instruction. The stacked PC is the
    /// offending opcode's own address.
    pub(crate) fn illegal_opcode(&mut self, bus: &mut dyn M68kBus, opcode: u16) -> i32 {
        let vector = match opcode >> 12 {
            0xF => VECTOR_LINE_F,
            0xA => VECTOR_LINE_A,
            _ => VECTOR_ILLEGAL_INSTRUCTION,
        };
        #[cfg(feature = "log")]
        {
            if vector == VECTOR_ILLEGAL_INSTRUCTION {
                slog::warn!(
                    self.logger,
                    "Illegal opcode {:#06X} at {:#010X}",
                    opcode,
                    self.regs.ppc
                );
            } else {
                slog::debug!(
                    self.logger,
                    "Line {:X} trap {:#06X} at {:#010X}",
                    opcode >> 12,
                    opcode,
                    self.regs.ppc
                );
            }
        }
        let pc = self.regs.ppc;
        self.exception(bus, vector, pc);
        ILLEGAL_OPCODE_CYCLES
    }

    /// Bail out of a privileged instruction executed in user mode.
    ///
    /// Returns the cycles to report if the instruction must not proceed.
    pub(crate) fn require_supervisor(&mut self, bus: &mut dyn M68kBus) -> Option<i32> {
        if self.regs.s {
            return None;
        }
        let pc = self.regs.ppc;
        self.exception(bus, VECTOR_PRIVILEGE_VIOLATION, pc);
        Some(EXCEPTION_CYCLES)
    }

    /// Resolve an interrupt request against the current mask.
    ///
    /// Level 7 is non-maskable, but only triggers on the edge: a request
    /// for 7 while the previous request was already 7 is subject to the
    /// mask like any other level.
    pub(crate) fn resolve_irq(&mut self, bus: &mut dyn M68kBus, level: u8) {
        let level = level & 7;
        let old = self.regs.int_level;
        self.regs.int_level = level;
        if old != 7 && level == 7 {
            self.interrupt_exception(bus, 7);
        } else if level > self.regs.intmask {
            self.interrupt_exception(bus, level);
        }
    }

    /// Service an interrupt at `level`.
    pub(crate) fn interrupt_exception(&mut self, bus: &mut dyn M68kBus, level: u8) {
        self.regs.stopped = false;

        let vector = match bus.interrupt_ack(level) {
            IntAck::Autovector => VECTOR_AUTOVECTOR_BASE + u32::from(level),
            IntAck::Spurious => VECTOR_SPURIOUS_INTERRUPT,
            IntAck::Vector(n) if n > 255 => {
                #[cfg(feature = "log")]
                slog::warn!(
                    self.logger,
                    "Interrupt acknowledge returned vector {:#X}, ignored",
                    n
                );
                return;
            }
            IntAck::Vector(n) => n,
        };

        let sr = self.begin_exception();
        self.regs.intmask = level;

        let mut target = bus.read_long(vector * 4);
        if target == 0 {
            target = bus.read_long(VECTOR_UNINITIALIZED_INTERRUPT * 4);
        }

        let pc = self.regs.pc;
        self.push_frame(bus, pc, sr);
        self.jump(target);

        self.regs.interrupt_cycles += INTERRUPT_CYCLES;
    }
}
