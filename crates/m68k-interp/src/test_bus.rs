//! Flat-RAM bus for unit tests.

use crate::bus::{IntAck, M68kBus};
use crate::execute::Boundary;

/// 16 MiB of flat RAM (the full 24-bit address space).
pub struct TestBus {
    pub mem: Vec<u8>,
    /// Acknowledge result returned for every level.
    pub ack: IntAck,
    /// Levels acknowledged, in order.
    pub acks: Vec<u8>,
    /// PC at every instruction boundary, in order.
    pub boundaries: Vec<u32>,
    /// Request a debugger halt when the boundary PC equals this address.
    pub halt_at: Option<u32>,
    /// Latch this IRQ level when the boundary PC equals the address.
    pub irq_at: Option<(u32, u8)>,
    /// End the timeslice when the boundary PC equals this address.
    pub end_at: Option<u32>,
    pub resets: u32,
}

const ADDR_MASK: u32 = 0x00FF_FFFF;

impl TestBus {
    pub fn new() -> Self {
        Self {
            mem: vec![0; 0x0100_0000],
            ack: IntAck::Autovector,
            acks: Vec::new(),
            boundaries: Vec::new(),
            halt_at: None,
            irq_at: None,
            end_at: None,
            resets: 0,
        }
    }

    /// Reset vectors: SSP at 0, PC at 4.
    pub fn with_reset(ssp: u32, pc: u32) -> Self {
        let mut bus = Self::new();
        bus.write_long(0, ssp);
        bus.write_long(4, pc);
        bus
    }

    /// Place opcode words at `addr`.
    pub fn load_words(&mut self, addr: u32, words: &[u16]) {
        for (i, &w) in words.iter().enumerate() {
            self.write_word(addr + 2 * i as u32, w);
        }
    }
}

impl M68kBus for TestBus {
    fn read_byte(&mut self, addr: u32) -> u8 {
        self.mem[(addr & ADDR_MASK) as usize]
    }

    fn read_word(&mut self, addr: u32) -> u16 {
        let hi = self.read_byte(addr);
        let lo = self.read_byte(addr.wrapping_add(1));
        u16::from(hi) << 8 | u16::from(lo)
    }

    fn write_byte(&mut self, addr: u32, value: u8) {
        self.mem[(addr & ADDR_MASK) as usize] = value;
    }

    fn write_word(&mut self, addr: u32, value: u16) {
        self.write_byte(addr, (value >> 8) as u8);
        self.write_byte(addr.wrapping_add(1), value as u8);
    }

    fn interrupt_ack(&mut self, level: u8) -> IntAck {
        self.acks.push(level);
        self.ack
    }

    fn instruction_hook(&mut self, boundary: &mut Boundary<'_>) {
        let pc = boundary.pc();
        self.boundaries.push(pc);
        if self.halt_at == Some(pc) {
            boundary.debug_halt();
        }
        if let Some((at, level)) = self.irq_at {
            if at == pc {
                boundary.set_irq(level);
                self.irq_at = None;
            }
        }
        if self.end_at == Some(pc) {
            boundary.end_timeslice();
        }
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}
