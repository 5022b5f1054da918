//! Shared harness for the integration tests.

#![allow(dead_code)]

use m68k_interp::{Boundary, Cpu68000, IntAck, M68kBus};

pub const RESET_SSP: u32 = 0x0001_0000;
pub const RESET_PC: u32 = 0x0000_1000;

/// Flat memory bus - full 16MB address space (24-bit).
pub struct TestBus {
    data: Vec<u8>,
    pub ack: IntAck,
    pub acks: Vec<u8>,
    pub trace: Vec<u32>,
    pub resets: u32,
    /// Scripted boundary actions, keyed by PC. Each fires once.
    pub at_pc: Vec<(u32, Action)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Irq(u8),
    Halt,
    EndTimeslice,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            data: vec![0; 0x100_0000],
            ack: IntAck::Autovector,
            acks: Vec::new(),
            trace: Vec::new(),
            resets: 0,
            at_pc: Vec::new(),
        }
    }

    pub fn load_words(&mut self, addr: u32, words: &[u16]) {
        for (i, &word) in words.iter().enumerate() {
            self.write_word(addr + 2 * i as u32, word);
        }
    }

    pub fn set_vector(&mut self, vector: u32, handler: u32) {
        self.write_long(vector * 4, handler);
    }

    pub fn peek_word(&self, addr: u32) -> u16 {
        let a = (addr & 0xFF_FFFF) as usize;
        u16::from(self.data[a]) << 8 | u16::from(self.data[a + 1])
    }

    pub fn peek_long(&self, addr: u32) -> u32 {
        u32::from(self.peek_word(addr)) << 16 | u32::from(self.peek_word(addr + 2))
    }
}

impl M68kBus for TestBus {
    fn read_byte(&mut self, addr: u32) -> u8 {
        self.data[(addr & 0xFF_FFFF) as usize]
    }

    fn read_word(&mut self, addr: u32) -> u16 {
        self.peek_word(addr)
    }

    fn write_byte(&mut self, addr: u32, value: u8) {
        self.data[(addr & 0xFF_FFFF) as usize] = value;
    }

    fn write_word(&mut self, addr: u32, value: u16) {
        let a = (addr & 0xFF_FFFF) as usize;
        self.data[a] = (value >> 8) as u8;
        self.data[a + 1] = value as u8;
    }

    fn interrupt_ack(&mut self, level: u8) -> IntAck {
        self.acks.push(level);
        self.ack
    }

    fn instruction_hook(&mut self, boundary: &mut Boundary<'_>) {
        let pc = boundary.pc();
        self.trace.push(pc);
        if let Some(i) = self.at_pc.iter().position(|&(at, _)| at == pc) {
            match self.at_pc.remove(i).1 {
                Action::Irq(level) => boundary.set_irq(level),
                Action::Halt => boundary.debug_halt(),
                Action::EndTimeslice => boundary.end_timeslice(),
            }
        }
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

/// A reset core with `program` loaded at the reset PC.
pub fn boot(program: &[u16]) -> (Cpu68000, TestBus) {
    let mut bus = TestBus::new();
    bus.write_long(0, RESET_SSP);
    bus.write_long(4, RESET_PC);
    bus.load_words(RESET_PC, program);
    let mut cpu = Cpu68000::new();
    cpu.pulse_reset(&mut bus);
    (cpu, bus)
}

/// Run exactly one instruction.
pub fn step(cpu: &mut Cpu68000, bus: &mut TestBus) -> i32 {
    cpu.execute(bus, 1)
}
