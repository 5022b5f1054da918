//! Core types shared by emulated chips.
//!
//! Chips count time in [`Ticks`] of some [`MasterClock`], and expose their
//! internal state through [`Observable`] for debuggers and tests.

mod clock;
mod observable;
mod ticks;

pub use clock::MasterClock;
pub use observable::{Observable, Value};
pub use ticks::Ticks;
