//! Table-driven Motorola 68000 interpreter.
//!
//! Every opcode dispatches through a 65536-entry table of instruction
//! handlers built once from a decode table. The core runs in cycle-budgeted
//! quanta, resolves the console's IRQ line at instruction boundaries and
//! vectors interrupts and exceptions through the standard 3-word frame.
//!
//! ```no_run
//! use m68k_interp::{CoreConfig, Cpu68000, M68kBus, Region};
//!
//! fn run(bus: &mut dyn M68kBus) {
//!     let config = CoreConfig {
//!         region: Region::Pal,
//!         clock_multiplier: 1,
//!     };
//!     let mut cpu = Cpu68000::from_config(&config);
//!     cpu.pulse_reset(bus);
//!     loop {
//!         cpu.run_frame(bus, &config);
//!     }
//! }
//! ```

mod alu;
mod arith;
mod branches;
pub mod bus;
pub mod clock;
pub mod config;
pub mod cpu;
pub mod decode;
pub mod exceptions;
pub mod execute;
pub mod flags;
mod immediates;
pub mod isa;
mod misc;
mod moves;
pub mod registers;
pub mod table;

#[cfg(test)]
mod test_bus;

pub use bus::{IntAck, M68kBus};
pub use clock::ClockMultiplier;
pub use config::{CoreConfig, Region};
pub use cpu::Cpu68000;
pub use decode::{DecodeEntry, DecodeTable, InstrDef, Mnemonic, Pattern};
pub use execute::Boundary;
pub use flags::Ccr;
pub use registers::{Register, Registers, SpecialFlags};
pub use table::{DispatchTable, HandlerId, InstrHandler, OpDescriptor, TableError};
