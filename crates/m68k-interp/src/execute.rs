//! Cycle-budgeted execution loop.
//!
//! `execute` runs whole instructions until the quantum's budget is spent.
//! At every instruction boundary, in order:
//!
//! 1. a debugger halt request ends the quantum early
//! 2. a latched interrupt request is resolved against the mask
//! 3. the bus's instruction hook runs
//! 4. the next opcode is fetched and dispatched
//!
//! Budgets are in host cycles; the loop counts scaled cycles (see
//! [`ClockMultiplier`](crate::ClockMultiplier)). The last instruction may
//! overshoot, leaving the remaining counter negative.

use std::sync::Arc;

use emu_core::Ticks;

use crate::bus::M68kBus;
use crate::config::CoreConfig;
use crate::cpu::Cpu68000;
use crate::registers::{Register, SpecialFlags};

impl Cpu68000 {
    /// Run for about `cycles` host cycles. Returns the host cycles consumed.
    ///
    /// A stopped core clears its cycle counters and reports the whole
    /// budget as consumed without running anything.
    pub fn execute(&mut self, bus: &mut dyn M68kBus, cycles: i32) -> i32 {
        if self.regs.stopped {
            self.adjusted_cycles = 0;
            self.regs.remaining_cycles = 0;
            self.regs.interrupt_cycles = 0;
            self.executed_cycles = 0;
            // Idle time still passes.
            self.total_cycles += Ticks::from_signed(i64::from(self.clock.scale(cycles)));
            return cycles;
        }

        let table = Arc::clone(self.table());

        self.adjusted_cycles = self.clock.scale(cycles);
        // Service time of interrupts taken since the last quantum.
        self.regs.remaining_cycles = self.adjusted_cycles - self.regs.interrupt_cycles;
        self.regs.interrupt_cycles = 0;

        loop {
            if self.regs.spcflags.contains(SpecialFlags::DEBUGGER) {
                let ran = self.adjusted_cycles - self.regs.remaining_cycles;
                self.regs.remaining_cycles = 0;
                self.regs.interrupt_cycles = 0;
                self.finish_quantum(ran);
                return self.clock.descale(ran);
            }

            if let Some(level) = self.pending_irq.take() {
                self.resolve_irq(bus, level);
            }

            bus.instruction_hook(&mut Boundary { cpu: self });

            let opcode = self.fetch_opcode(bus);
            let handler = table.handler(opcode);
            self.regs.remaining_cycles -= handler(self, bus, opcode);

            // STOP idles the rest of the quantum.
            if self.regs.stopped {
                self.regs.remaining_cycles = self.regs.remaining_cycles.min(0);
            }
            if self.regs.remaining_cycles <= 0 {
                break;
            }
        }

        let ran = self.adjusted_cycles - self.regs.remaining_cycles;
        self.regs.remaining_cycles -= self.regs.interrupt_cycles;
        self.regs.interrupt_cycles = 0;
        self.finish_quantum(ran);
        self.clock.descale(ran)
    }

    /// Run one video frame of host cycles at `config`'s region rate.
    ///
    /// Returns the host cycles consumed. Falls short of the frame only when a
    /// debugger halt ends a quantum early.
    pub fn run_frame(&mut self, bus: &mut dyn M68kBus, config: &CoreConfig) -> i32 {
        let frame = i32::try_from(config.cycles_per_frame().get()).unwrap_or(i32::MAX);
        let mut ran = 0;
        while ran < frame {
            ran += self.execute(bus, frame - ran);
            if self.is_halted() {
                break;
            }
        }
        ran
    }

    fn finish_quantum(&mut self, ran: i32) {
        self.executed_cycles = ran;
        self.total_cycles += Ticks::from_signed(i64::from(ran));
    }

    /// Drive the IRQ line to `level` (0 releases it).
    ///
    /// A stopped core resolves the request at once so the interrupt can
    /// wake it. Otherwise the level is latched and resolved at the next
    /// instruction boundary.
    pub fn raise_irq(&mut self, bus: &mut dyn M68kBus, level: u8) {
        if self.regs.stopped {
            self.resolve_irq(bus, level);
        } else {
            self.pending_irq = Some(level & 7);
        }
    }

    /// Host cycles consumed by the last quantum.
    #[must_use]
    pub fn cycles_run(&self) -> i32 {
        self.clock.descale(self.executed_cycles)
    }

    /// Host cycles left in the quantum. Negative after an overshoot or
    /// when interrupt service time was charged to the next quantum.
    #[must_use]
    pub fn cycles_remaining(&self) -> i32 {
        self.clock.descale(self.regs.remaining_cycles)
    }

    /// Replace the remaining budget with `cycles` host cycles.
    pub fn modify_timeslice(&mut self, cycles: i32) {
        let new = self.clock.scale(cycles);
        self.adjusted_cycles += new - self.regs.remaining_cycles;
        self.regs.remaining_cycles = new;
    }

    /// Stop after the current instruction.
    pub fn end_timeslice(&mut self) {
        self.adjusted_cycles -= self.regs.remaining_cycles;
        self.regs.remaining_cycles = 0;
    }
}

/// The core as seen from an instruction boundary.
///
/// Handed to [`M68kBus::instruction_hook`]. Everything a tracer or scheduler
/// needs mid-quantum is here; re-entering `execute` is not.
pub struct Boundary<'a> {
    cpu: &'a mut Cpu68000,
}

impl Boundary<'_> {
    /// Address of the instruction about to be fetched.
    #[must_use]
    pub fn pc(&self) -> u32 {
        self.cpu.regs.pc
    }

    #[must_use]
    pub fn register(&self, reg: Register) -> u32 {
        self.cpu.get(reg)
    }

    /// Latch an IRQ level, resolved at the next boundary.
    pub fn set_irq(&mut self, level: u8) {
        self.cpu.pending_irq = Some(level & 7);
    }

    /// Halt at the next boundary.
    pub fn debug_halt(&mut self) {
        self.cpu.debug_halt();
    }

    pub fn end_timeslice(&mut self) {
        self.cpu.end_timeslice();
    }

    pub fn modify_timeslice(&mut self, cycles: i32) {
        self.cpu.modify_timeslice(cycles);
    }

    /// Host cycles consumed so far in this quantum.
    #[must_use]
    pub fn cycles_run(&self) -> i32 {
        let cpu = &*self.cpu;
        cpu.clock.descale(cpu.adjusted_cycles - cpu.regs.remaining_cycles)
    }

    #[must_use]
    pub fn cycles_remaining(&self) -> i32 {
        self.cpu.cycles_remaining()
    }
}
