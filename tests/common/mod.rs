//! Hack assembler and CPU used to execute generated assembly in tests.

use std::collections::HashMap;

use vmtranslate::{translate_units, SourceUnit, TranslateOptions};

const RAM_WORDS: usize = 1 << 16;
const FIRST_VARIABLE: u16 = 16;

#[derive(Clone, Debug)]
enum Op {
    Load(u16),
    Compute {
        comp: String,
        dest_a: bool,
        dest_d: bool,
        dest_m: bool,
        jump: Option<String>,
    },
}

pub struct HackMachine {
    pub ram: Vec<i16>,
    pub pc: usize,
    pub a: i16,
    pub d: i16,
    rom: Vec<Op>,
    symbols: HashMap<String, u16>,
    labels: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Stop {
    /// PC ran past the last instruction.
    End,
    /// `@here / 0;JMP` style loop: the program parked itself.
    Halted,
    StepLimit,
}

impl HackMachine {
    /// Assemble Hack source. Panics on malformed input or duplicate labels.
    pub fn assemble(asm: &str) -> Self {
        let mut symbols: HashMap<String, u16> = HashMap::new();
        for (name, addr) in [("SP", 0), ("LCL", 1), ("ARG", 2), ("THIS", 3), ("THAT", 4)] {
            symbols.insert(name.to_string(), addr);
        }
        for r in 0..16u16 {
            symbols.insert(format!("R{}", r), r);
        }
        symbols.insert("SCREEN".to_string(), 16384);
        symbols.insert("KBD".to_string(), 24576);

        let code: Vec<&str> = asm
            .lines()
            .map(|l| l.split("//").next().unwrap_or("").trim())
            .filter(|l| !l.is_empty())
            .collect();

        let mut labels = Vec::new();
        let mut address = 0u16;
        for line in &code {
            if let Some(name) = line.strip_prefix('(').and_then(|l| l.strip_suffix(')')) {
                assert!(
                    !symbols.contains_key(name),
                    "label ({}) defined more than once",
                    name
                );
                symbols.insert(name.to_string(), address);
                labels.push(name.to_string());
            } else {
                address += 1;
            }
        }

        let mut next_variable = FIRST_VARIABLE;
        let mut rom = Vec::new();
        for line in &code {
            if line.starts_with('(') {
                continue;
            }
            if let Some(value) = line.strip_prefix('@') {
                let addr = if let Ok(n) = value.parse::<u16>() {
                    n
                } else if let Some(&known) = symbols.get(value) {
                    known
                } else {
                    let fresh = next_variable;
                    symbols.insert(value.to_string(), fresh);
                    next_variable += 1;
                    fresh
                };
                rom.push(Op::Load(addr));
                continue;
            }
            let (dest, rest) = match line.split_once('=') {
                Some((dest, rest)) => (dest, rest),
                None => ("", *line),
            };
            let (comp, jump) = match rest.split_once(';') {
                Some((comp, jump)) => (comp, Some(jump.to_string())),
                None => (rest, None),
            };
            rom.push(Op::Compute {
                comp: comp.to_string(),
                dest_a: dest.contains('A'),
                dest_d: dest.contains('D'),
                dest_m: dest.contains('M'),
                jump,
            });
        }

        Self {
            ram: vec![0; RAM_WORDS],
            pc: 0,
            a: 0,
            d: 0,
            rom,
            symbols,
            labels,
        }
    }

    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn run(&mut self, max_steps: usize) -> Stop {
        for _ in 0..max_steps {
            if self.pc >= self.rom.len() {
                return Stop::End;
            }
            if self.step() {
                return Stop::Halted;
            }
        }
        Stop::StepLimit
    }

    /// Execute one instruction. Returns true when it jumps to the `@`
    /// right before it, i.e. the program spins in place.
    fn step(&mut self) -> bool {
        match self.rom[self.pc].clone() {
            Op::Load(value) => {
                self.a = value as i16;
                self.pc += 1;
                false
            }
            Op::Compute {
                comp,
                dest_a,
                dest_d,
                dest_m,
                jump,
            } => {
                let addr = self.a as u16 as usize;
                let out = eval(&comp, self.a, self.d, self.ram[addr]);
                let target = self.a as u16 as usize;
                if dest_m {
                    self.ram[addr] = out;
                }
                if dest_a {
                    self.a = out;
                }
                if dest_d {
                    self.d = out;
                }
                let taken = match jump.as_deref() {
                    None => false,
                    Some("JGT") => out > 0,
                    Some("JEQ") => out == 0,
                    Some("JGE") => out >= 0,
                    Some("JLT") => out < 0,
                    Some("JNE") => out != 0,
                    Some("JLE") => out <= 0,
                    Some("JMP") => true,
                    Some(other) => panic!("unknown jump {}", other),
                };
                if taken {
                    let spins = target + 1 == self.pc;
                    self.pc = target;
                    spins
                } else {
                    self.pc += 1;
                    false
                }
            }
        }
    }
}

fn eval(comp: &str, a: i16, d: i16, m: i16) -> i16 {
    match comp {
        "0" => 0,
        "1" => 1,
        "-1" => -1,
        "D" => d,
        "A" => a,
        "M" => m,
        "!D" => !d,
        "!A" => !a,
        "!M" => !m,
        "-D" => d.wrapping_neg(),
        "-A" => a.wrapping_neg(),
        "-M" => m.wrapping_neg(),
        "D+1" => d.wrapping_add(1),
        "A+1" => a.wrapping_add(1),
        "M+1" => m.wrapping_add(1),
        "D-1" => d.wrapping_sub(1),
        "A-1" => a.wrapping_sub(1),
        "M-1" => m.wrapping_sub(1),
        "D+A" | "A+D" => d.wrapping_add(a),
        "D+M" | "M+D" => d.wrapping_add(m),
        "D-A" => d.wrapping_sub(a),
        "D-M" => d.wrapping_sub(m),
        "A-D" => a.wrapping_sub(d),
        "M-D" => m.wrapping_sub(d),
        "D&A" | "A&D" => d & a,
        "D&M" | "M&D" => d & m,
        "D|A" | "A|D" => d | a,
        "D|M" | "M|D" => d | m,
        other => panic!("unknown computation {}", other),
    }
}

/// Translate units and load the result into a fresh machine.
pub fn load(units: &[(&str, &str)], options: &TranslateOptions) -> HackMachine {
    let units: Vec<SourceUnit> = units
        .iter()
        .map(|(name, source)| SourceUnit::new(name, source))
        .collect();
    let asm = translate_units(&units, options).unwrap_or_else(|e| panic!("translation failed: {}", e));
    HackMachine::assemble(&asm)
}

/// Run a bootstrapped program until it parks in its final loop.
pub fn run_program(units: &[(&str, &str)]) -> HackMachine {
    let mut machine = load(units, &TranslateOptions::default());
    let stop = machine.run(2_000_000);
    assert_eq!(stop, Stop::Halted, "program should park in a final loop");
    machine
}

/// Run a fragment without bootstrap: SP = 256 and the given segment bases,
/// until the PC runs off the end.
pub fn run_fragment(source: &str, setup: &[(usize, i16)]) -> HackMachine {
    let mut machine = load(&[("Test", source)], &TranslateOptions::without_bootstrap());
    machine.ram[0] = 256;
    for &(addr, value) in setup {
        machine.ram[addr] = value;
    }
    let stop = machine.run(100_000);
    assert_eq!(stop, Stop::End, "fragment should run to completion");
    machine
}
