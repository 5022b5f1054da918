//! 68000 register file.
//!
//! - D0-D7: 8 data registers (32-bit)
//! - A0-A7: 8 address registers (32-bit, A7 is the active stack pointer)
//! - USP/SSP: the stack pointer not currently in A7 is parked here
//! - PC: program counter
//! - SR: kept decomposed (see [`crate::flags`])
//!
//! Alongside the architectural state the file carries the core's run state:
//! the stopped flag, special flags, cycle counters and the latched interrupt
//! level.

use bitflags::bitflags;

use crate::flags::{pack_sr, unpack_sr, Ccr};

bitflags! {
    /// Requests checked by the execute loop at every instruction boundary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpecialFlags: u32 {
        /// A debugger asked the core to stop at the next boundary.
        const DEBUGGER = 0x0000_0001;
    }
}

/// Register identifiers accepted by `Cpu68000::get` / `Cpu68000::set`.
///
/// Discriminants follow the conventional numbering used by front ends that
/// address registers by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    D0,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    /// Program counter.
    Pc,
    /// Status register (packed on read, unpacked on write).
    Sr,
    /// The current stack pointer (alias of A7).
    Sp,
    /// User stack pointer.
    Usp,
    /// Address of the last prefetch.
    PrefAddr,
    /// Data of the last prefetch.
    PrefData,
    /// PC of the instruction last fetched.
    Ppc,
    /// Instruction register: the opcode last fetched.
    Ir,
}

impl Register {
    const ALL: [Register; 24] = [
        Register::D0,
        Register::D1,
        Register::D2,
        Register::D3,
        Register::D4,
        Register::D5,
        Register::D6,
        Register::D7,
        Register::A0,
        Register::A1,
        Register::A2,
        Register::A3,
        Register::A4,
        Register::A5,
        Register::A6,
        Register::A7,
        Register::Pc,
        Register::Sr,
        Register::Sp,
        Register::Usp,
        Register::PrefAddr,
        Register::PrefData,
        Register::Ppc,
        Register::Ir,
    ];

    /// Look up a register by its conventional index. `None` if out of range.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Look up a register by lowercase name (`d0`, `a7`, `sp`, `sr`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "d0" => Register::D0,
            "d1" => Register::D1,
            "d2" => Register::D2,
            "d3" => Register::D3,
            "d4" => Register::D4,
            "d5" => Register::D5,
            "d6" => Register::D6,
            "d7" => Register::D7,
            "a0" => Register::A0,
            "a1" => Register::A1,
            "a2" => Register::A2,
            "a3" => Register::A3,
            "a4" => Register::A4,
            "a5" => Register::A5,
            "a6" => Register::A6,
            "a7" => Register::A7,
            "pc" => Register::Pc,
            "sr" => Register::Sr,
            "sp" => Register::Sp,
            "usp" => Register::Usp,
            "pref_addr" => Register::PrefAddr,
            "pref_data" => Register::PrefData,
            "ppc" => Register::Ppc,
            "ir" => Register::Ir,
            _ => return None,
        })
    }
}

/// 68000 register file plus run state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
    /// Data registers D0-D7.
    pub d: [u32; 8],
    /// Address registers A0-A7. A7 is the active stack pointer.
    pub a: [u32; 8],
    /// User stack pointer while in supervisor mode.
    pub usp: u32,
    /// Supervisor stack pointer while in user mode.
    pub ssp: u32,
    /// Program counter.
    pub pc: u32,
    pub ccr: Ccr,
    /// Interrupt priority mask (0-7).
    pub intmask: u8,
    /// Supervisor mode.
    pub s: bool,
    /// Trace mode.
    pub t: bool,

    /// Halted by STOP until an interrupt or reset.
    pub stopped: bool,
    pub spcflags: SpecialFlags,
    /// Cycles left in the current quantum (scaled units).
    pub remaining_cycles: i32,
    /// Interrupt service overhead not yet charged to a quantum.
    pub interrupt_cycles: i32,
    /// Level of the last resolved interrupt request.
    pub int_level: u8,

    /// PC of the instruction last fetched.
    pub ppc: u32,
    /// Opcode last fetched.
    pub ir: u16,
    pub pref_addr: u32,
    pub pref_data: u32,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Create registers in reset state.
    ///
    /// After reset: supervisor mode, interrupt mask level 7.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            d: [0; 8],
            a: [0; 8],
            usp: 0,
            ssp: 0,
            pc: 0,
            ccr: Ccr {
                x: false,
                n: false,
                z: false,
                v: false,
                c: false,
            },
            intmask: 7,
            s: true,
            t: false,
            stopped: false,
            spcflags: SpecialFlags::empty(),
            remaining_cycles: 0,
            interrupt_cycles: 0,
            int_level: 0,
            ppc: 0,
            ir: 0,
            pref_addr: 0,
            pref_data: 0,
        }
    }

    /// Pack the current status fields into an SR word.
    #[must_use]
    pub const fn sr(&self) -> u16 {
        pack_sr(self.ccr, self.intmask, self.s, self.t)
    }

    /// Unpack an SR word into the status fields.
    ///
    /// A change of the S bit swaps A7 with the parked stack pointer.
    pub fn set_sr(&mut self, sr: u16) {
        let (ccr, intmask, s, t) = unpack_sr(sr);
        self.ccr = ccr;
        self.intmask = intmask;
        self.t = t;
        self.set_supervisor(s);
    }

    /// Switch privilege level, exchanging stack pointers on a change.
    pub fn set_supervisor(&mut self, supervisor: bool) {
        if supervisor == self.s {
            return;
        }
        if supervisor {
            self.usp = self.a[7];
            self.a[7] = self.ssp;
        } else {
            self.ssp = self.a[7];
            self.a[7] = self.usp;
        }
        self.s = supervisor;
    }

    /// The user stack pointer, wherever it currently lives.
    #[must_use]
    pub const fn user_sp(&self) -> u32 {
        if self.s { self.usp } else { self.a[7] }
    }

    /// Set the user stack pointer, wherever it currently lives.
    pub fn set_user_sp(&mut self, value: u32) {
        if self.s {
            self.usp = value;
        } else {
            self.a[7] = value;
        }
    }

    /// The supervisor stack pointer, wherever it currently lives.
    #[must_use]
    pub const fn supervisor_sp(&self) -> u32 {
        if self.s { self.a[7] } else { self.ssp }
    }

    /// Set the low byte of a data register.
    pub fn set_d_byte(&mut self, r: usize, value: u8) {
        self.d[r] = (self.d[r] & 0xFFFF_FF00) | u32::from(value);
    }

    /// Set the low word of a data register.
    pub fn set_d_word(&mut self, r: usize, value: u16) {
        self.d[r] = (self.d[r] & 0xFFFF_0000) | u32::from(value);
    }

    /// Read a register by identifier.
    #[must_use]
    pub fn get(&self, reg: Register) -> u32 {
        match reg {
            Register::Pc => self.pc,
            Register::Sr => u32::from(self.sr()),
            Register::Sp => self.a[7],
            Register::Usp => self.user_sp(),
            Register::PrefAddr => self.pref_addr,
            Register::PrefData => self.pref_data,
            Register::Ppc => self.ppc,
            Register::Ir => u32::from(self.ir),
            r if (r as u8) < 8 => self.d[r as usize],
            r => self.a[r as usize - 8],
        }
    }

    /// Write a register by identifier.
    ///
    /// Writing SR takes effect immediately (mask, privilege, stack swap).
    /// The prefetch, PPC and IR registers are read-only; writes are ignored.
    pub fn set(&mut self, reg: Register, value: u32) {
        match reg {
            Register::Pc => self.pc = value,
            Register::Sr => self.set_sr(value as u16),
            Register::Sp => self.a[7] = value,
            Register::Usp => self.set_user_sp(value),
            Register::PrefAddr | Register::PrefData | Register::Ppc | Register::Ir => {}
            r if (r as u8) < 8 => self.d[r as usize] = value,
            r => self.a[r as usize - 8] = value,
        }
    }
}
