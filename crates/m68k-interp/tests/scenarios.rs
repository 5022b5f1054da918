//! Data-driven program scenarios from `tests/data/*.json`.
//!
//! Each file describes a program loaded at the reset PC, optional extra code
//! blocks and vectors, scripted IRQs, a host-cycle budget and the expected
//! machine state afterwards. Numbers may be JSON integers or `"0x..."` strings.

mod common;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use common::{boot, Action, TestBus};
use m68k_interp::{Cpu68000, Register};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(try_from = "HexRepr")]
struct Hex(u32);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HexRepr {
    Num(u32),
    Str(String),
}

impl TryFrom<HexRepr> for Hex {
    type Error = String;

    fn try_from(repr: HexRepr) -> Result<Self, Self::Error> {
        match repr {
            HexRepr::Num(n) => Ok(Hex(n)),
            HexRepr::Str(s) => {
                let digits = s
                    .strip_prefix("0x")
                    .ok_or_else(|| format!("expected 0x prefix: {s}"))?;
                u32::from_str_radix(digits, 16)
                    .map(Hex)
                    .map_err(|e| format!("{s}: {e}"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Block {
    addr: Hex,
    words: Vec<Hex>,
}

#[derive(Debug, Deserialize)]
struct Irq {
    at_pc: Hex,
    level: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    name: String,
    program: Vec<Hex>,
    #[serde(default)]
    code: Vec<Block>,
    /// `(vector number, handler address)`
    #[serde(default)]
    vectors: Vec<(u32, Hex)>,
    /// Register writes applied after reset.
    #[serde(default)]
    regs: BTreeMap<String, Hex>,
    #[serde(default)]
    irqs: Vec<Irq>,
    #[serde(default = "one")]
    multiplier: i32,
    budget: i32,
    expect: Expect,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Expect {
    cycles: Option<i32>,
    remaining: Option<i32>,
    stopped: Option<bool>,
    #[serde(default)]
    regs: BTreeMap<String, Hex>,
    /// `(address, long)`
    #[serde(default)]
    memory: Vec<(Hex, Hex)>,
    acks: Option<Vec<u8>>,
}

fn one() -> i32 {
    1
}

fn words(hex: &[Hex]) -> Vec<u16> {
    hex.iter().map(|h| h.0 as u16).collect()
}

fn register(scenario: &str, name: &str) -> Register {
    Register::from_name(name).unwrap_or_else(|| panic!("{scenario}: unknown register {name}"))
}

fn setup(scenario: &Scenario) -> (Cpu68000, TestBus) {
    let (mut cpu, mut bus) = boot(&words(&scenario.program));
    for block in &scenario.code {
        bus.load_words(block.addr.0, &words(&block.words));
    }
    for &(vector, handler) in &scenario.vectors {
        bus.set_vector(vector, handler.0);
    }
    for (name, value) in &scenario.regs {
        cpu.set(register(&scenario.name, name), value.0);
    }
    for irq in &scenario.irqs {
        bus.at_pc.push((irq.at_pc.0, Action::Irq(irq.level)));
    }
    cpu.set_clock_multiplier(scenario.multiplier);
    (cpu, bus)
}

fn check(scenario: &Scenario, cpu: &Cpu68000, bus: &TestBus, cycles: i32) {
    let name = &scenario.name;
    let expect = &scenario.expect;
    if let Some(want) = expect.cycles {
        assert_eq!(cycles, want, "{name}: cycles");
    }
    if let Some(want) = expect.remaining {
        assert_eq!(cpu.cycles_remaining(), want, "{name}: remaining");
    }
    if let Some(want) = expect.stopped {
        assert_eq!(cpu.is_stopped(), want, "{name}: stopped");
    }
    for (reg, want) in &expect.regs {
        let got = cpu.get(register(name, reg));
        assert_eq!(got, want.0, "{name}: {reg} = {got:#010X}, want {:#010X}", want.0);
    }
    for &(addr, want) in &expect.memory {
        let got = bus.peek_long(addr.0);
        assert_eq!(got, want.0, "{name}: ({:#X}) = {got:#010X}", addr.0);
    }
    if let Some(want) = &expect.acks {
        assert_eq!(&bus.acks, want, "{name}: acks");
    }
}

fn run_file(path: &Path) {
    let text = fs::read_to_string(path).unwrap();
    let scenario: Scenario = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    let (mut cpu, mut bus) = setup(&scenario);
    let cycles = cpu.execute(&mut bus, scenario.budget);
    check(&scenario, &cpu, &bus, cycles);
}

#[test]
fn json_scenarios() {
    let pattern = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/*.json");
    let mut count = 0;
    for entry in glob::glob(pattern).unwrap() {
        run_file(&entry.unwrap());
        count += 1;
    }
    assert!(count > 0, "no scenarios under tests/data");
}
