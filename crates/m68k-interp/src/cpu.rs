//! The 68000 core: register file, dispatch table and cycle bookkeeping.

use std::fmt;
use std::sync::{Arc, OnceLock};

use emu_core::{Observable, Ticks, Value};

use crate::bus::M68kBus;
use crate::clock::ClockMultiplier;
use crate::config::CoreConfig;
use crate::registers::{Register, Registers, SpecialFlags};
use crate::table::DispatchTable;

/// Table-driven 68000 interpreter.
pub struct Cpu68000 {
    pub regs: Registers,
    /// Built on first reset, execute or validity query unless injected.
    table: OnceLock<Arc<DispatchTable>>,
    pub(crate) clock: ClockMultiplier,
    /// Interrupt level latched at a boundary, resolved before the next fetch.
    pub(crate) pending_irq: Option<u8>,
    /// Scaled budget of the current (or last) quantum.
    pub(crate) adjusted_cycles: i32,
    /// Scaled cycles consumed by the last quantum.
    pub(crate) executed_cycles: i32,
    pub(crate) total_cycles: Ticks,
    #[cfg(feature = "log")]
    pub(crate) logger: slog::Logger,
}

impl Default for Cpu68000 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Cpu68000 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cpu68000")
            .field("regs", &self.regs)
            .field("table_built", &self.table.get().is_some())
            .field("clock", &self.clock)
            .field("pending_irq", &self.pending_irq)
            .field("total_cycles", &self.total_cycles)
            .finish_non_exhaustive()
    }
}

impl Cpu68000 {
    /// A core in reset state with no table built yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            table: OnceLock::new(),
            clock: ClockMultiplier::ONE,
            pending_irq: None,
            adjusted_cycles: 0,
            executed_cycles: 0,
            total_cycles: Ticks::ZERO,
            #[cfg(feature = "log")]
            logger: slog::Logger::root(slog::Discard, slog::o!()),
        }
    }

    /// A core sharing an already-built dispatch table.
    #[must_use]
    pub fn with_table(table: Arc<DispatchTable>) -> Self {
        let cpu = Self::new();
        let _ = cpu.table.set(table);
        cpu
    }

    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        let mut cpu = Self::new();
        cpu.clock = config.multiplier();
        cpu
    }

    #[cfg(feature = "log")]
    #[must_use]
    pub fn with_logger(mut self, logger: slog::Logger) -> Self {
        self.logger = logger;
        self
    }

    /// The dispatch table, building the baseline table on first use.
    pub fn table(&self) -> &Arc<DispatchTable> {
        self.table.get_or_init(|| {
            let table = DispatchTable::baseline();
            #[cfg(feature = "log")]
            slog::info!(
                self.logger,
                "68000 dispatch table built: {} handlers, {} valid opcodes",
                table.handler_count(),
                table.valid_opcode_count()
            );
            Arc::new(table)
        })
    }

    /// Assert the reset line: enter supervisor mode at mask 7 and load SSP
    /// and PC from vectors 0 and 1.
    pub fn pulse_reset(&mut self, bus: &mut dyn M68kBus) {
        self.table();

        self.regs.spcflags = SpecialFlags::empty();
        self.regs.stopped = false;
        self.regs.remaining_cycles = 0;
        self.regs.interrupt_cycles = 0;
        self.pending_irq = None;
        self.regs.intmask = 7;
        // Reset does not bank the old A7.
        self.regs.s = true;
        self.regs.t = false;
        self.regs.a[7] = bus.read_long(0);
        self.regs.pc = bus.read_long(4);
        self.refill_prefetch();

        #[cfg(feature = "log")]
        slog::info!(
            self.logger,
            "68000 reset: SSP={:#010X} PC={:#010X}",
            self.regs.a[7],
            self.regs.pc
        );
    }

    #[must_use]
    pub fn get(&self, reg: Register) -> u32 {
        self.regs.get(reg)
    }

    pub fn set(&mut self, reg: Register, value: u32) {
        self.regs.set(reg, value);
    }

    /// Read a register by numeric index. Unknown indices read as 0.
    #[must_use]
    pub fn get_by_index(&self, index: u32) -> u32 {
        Register::from_index(index).map_or(0, |reg| self.get(reg))
    }

    /// Write a register by numeric index. Unknown indices are ignored.
    pub fn set_by_index(&mut self, index: u32, value: u32) {
        if let Some(reg) = Register::from_index(index) {
            self.set(reg, value);
        }
    }

    /// True if `opcode` dispatches to a real handler on this core.
    pub fn is_valid_instruction(&self, opcode: u16) -> bool {
        self.table().is_valid(opcode)
    }

    pub fn set_clock_multiplier(&mut self, mult: i32) {
        self.clock = ClockMultiplier::new(mult);
    }

    #[must_use]
    pub fn clock_multiplier(&self) -> i32 {
        self.clock.get()
    }

    /// Stop at the next instruction boundary.
    pub fn debug_halt(&mut self) {
        self.regs.spcflags.insert(SpecialFlags::DEBUGGER);
    }

    pub fn debug_resume(&mut self) {
        self.regs.spcflags.remove(SpecialFlags::DEBUGGER);
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.regs.spcflags.contains(SpecialFlags::DEBUGGER)
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.regs.stopped
    }

    /// Scaled cycles executed since construction.
    #[must_use]
    pub fn total_cycles(&self) -> Ticks {
        self.total_cycles
    }

    // === Instruction stream ===

    /// Fetch the opcode at PC into IR.
    pub(crate) fn fetch_opcode(&mut self, bus: &mut dyn M68kBus) -> u16 {
        let pc = self.regs.pc;
        let opcode = bus.read_word(pc);
        self.regs.ppc = pc;
        self.regs.ir = opcode;
        self.regs.pref_addr = pc;
        self.regs.pref_data = u32::from(opcode);
        self.regs.pc = pc.wrapping_add(2);
        opcode
    }

    /// Fetch an extension word.
    pub(crate) fn fetch_word(&mut self, bus: &mut dyn M68kBus) -> u16 {
        let pc = self.regs.pc;
        let word = bus.read_word(pc);
        self.regs.pref_addr = pc;
        self.regs.pref_data = u32::from(word);
        self.regs.pc = pc.wrapping_add(2);
        word
    }

    pub(crate) fn fetch_long(&mut self, bus: &mut dyn M68kBus) -> u32 {
        let hi = self.fetch_word(bus);
        let lo = self.fetch_word(bus);
        u32::from(hi) << 16 | u32::from(lo)
    }

    /// Point the prefetch at the new PC after a jump, exception or reset.
    pub(crate) fn refill_prefetch(&mut self) {
        self.regs.pref_addr = self.regs.pc;
    }

    pub(crate) fn jump(&mut self, target: u32) {
        self.regs.pc = target;
        self.refill_prefetch();
    }

    // === Stack ===

    pub(crate) fn push_long(&mut self, bus: &mut dyn M68kBus, value: u32) {
        self.regs.a[7] = self.regs.a[7].wrapping_sub(4);
        bus.write_long(self.regs.a[7], value);
    }

    pub(crate) fn push_word(&mut self, bus: &mut dyn M68kBus, value: u16) {
        self.regs.a[7] = self.regs.a[7].wrapping_sub(2);
        bus.write_word(self.regs.a[7], value);
    }

    pub(crate) fn pop_long(&mut self, bus: &mut dyn M68kBus) -> u32 {
        let value = bus.read_long(self.regs.a[7]);
        self.regs.a[7] = self.regs.a[7].wrapping_add(4);
        value
    }

    pub(crate) fn pop_word(&mut self, bus: &mut dyn M68kBus) -> u16 {
        let value = bus.read_word(self.regs.a[7]);
        self.regs.a[7] = self.regs.a[7].wrapping_add(2);
        value
    }
}

#[rustfmt::skip]
const QUERY_PATHS: &[&str] = &[
    "d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7",
    "a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7",
    "pc", "sr", "ccr", "sp", "usp", "ssp", "ppc", "ir",
    "flags.x", "flags.n", "flags.z", "flags.v", "flags.c", "flags.s", "flags.t",
    "int_mask", "int_level", "stopped", "debug_halt",
    "cycles", "cycles_remaining", "clock_mult",
];

impl Observable for Cpu68000 {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(reg) = Register::from_name(path) {
            return Some(if reg == Register::Sr {
                Value::U16(self.regs.sr())
            } else if reg == Register::Ir {
                Value::U16(self.regs.ir)
            } else {
                Value::U32(self.get(reg))
            });
        }
        let ccr = self.regs.ccr;
        Some(match path {
            "ccr" => Value::U8(ccr.bits() as u8),
            "ssp" => self.regs.supervisor_sp().into(),
            "flags.x" => ccr.x.into(),
            "flags.n" => ccr.n.into(),
            "flags.z" => ccr.z.into(),
            "flags.v" => ccr.v.into(),
            "flags.c" => ccr.c.into(),
            "flags.s" => self.regs.s.into(),
            "flags.t" => self.regs.t.into(),
            "int_mask" => self.regs.intmask.into(),
            "int_level" => self.regs.int_level.into(),
            "stopped" => self.regs.stopped.into(),
            "debug_halt" => self.is_halted().into(),
            "cycles" => self.total_cycles.get().into(),
            "cycles_remaining" => self.cycles_remaining().into(),
            "clock_mult" => self.clock.get().into(),
            _ => return None,
        })
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}
