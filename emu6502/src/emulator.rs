use std::collections::HashSet;
use std::path::Path;

use log::trace;

use crate::asm::{AsmError, Assembler};
use crate::cpu::{Cpu, StatusFlag};
use crate::memory::{ImageError, Memory};
use crate::opcodes::INSTRUCTIONS;
use crate::ticker::Ticker;

/// Owns the whole machine: register file, the 64 KiB image, the pacing
/// ticker, and the debugger's breakpoint set. One value per process; the
/// step loop is synchronous and single threaded.
pub struct Emulator {
    pub cpu: Cpu,
    pub memory: Memory,
    pub ticker: Ticker,
    pub breakpoints: HashSet<u16>,
}

impl Emulator {
    pub fn new(ticker: Ticker) -> Emulator {
        Emulator {
            cpu: Cpu::new(),
            memory: Memory::new(),
            ticker,
            breakpoints: HashSet::new(),
        }
    }

    /// Re-initialize ahead of an assembly: zero memory and drop breakpoints.
    pub fn prepare(&mut self) {
        self.memory.clear();
        self.breakpoints.clear();
    }

    /// Reset run-time registers and status bits to defaults.
    pub fn reset(&mut self, entry: u16) {
        self.cpu.reset(entry);
    }

    /// True once a BRK has retired.
    pub fn halted(&self) -> bool {
        self.cpu.flag(StatusFlag::Break)
    }

    /// Interpret and execute a single instruction, then pace it.
    ///
    /// Panics if the program counter points at an unmapped opcode. That is a
    /// programming error, not a runtime condition: 6502 execution itself has
    /// no faults.
    pub fn step(&mut self) {
        let pc = self.cpu.pc;
        let opcode = self.memory.read_u8(pc);
        let descriptor = &INSTRUCTIONS[opcode as usize];
        let execute = match descriptor.execute {
            Some(execute) => execute,
            None => panic!("unmapped opcode ${opcode:02x} dispatched at ${pc:04x}"),
        };

        trace!(
            "PC={:04x} OPCODE={:02x} ({}) SP={:02x} A={:02x} X={:02x} Y={:02x} P={:02x}",
            pc,
            opcode,
            descriptor.symbol,
            self.cpu.sp,
            self.cpu.a,
            self.cpu.x,
            self.cpu.y,
            self.cpu.p
        );

        self.cpu.pc = pc.wrapping_add(1);
        execute(&mut self.cpu, &mut self.memory, descriptor.mode);
        self.ticker.wait(descriptor.cycles);
    }

    /// Run the object code found at the given address until BRK.
    pub fn run(&mut self, entry: u16) {
        self.reset(entry);
        while !self.halted() {
            self.step();
        }
    }

    /// Assemble a source file into memory. Implicitly prepares the machine.
    pub fn assemble(&mut self, path: &Path) -> Result<(), AsmError> {
        self.prepare();
        Assembler::new().assemble_file(path, &mut self.memory)
    }

    /// Assemble in-memory source text. Implicitly prepares the machine.
    pub fn assemble_source(&mut self, source: &str) -> Result<(), AsmError> {
        self.prepare();
        Assembler::new().assemble(source, &mut self.memory)
    }

    /// Load an object file. Memory is overwritten; breakpoints survive.
    pub fn load(&mut self, path: &Path) -> Result<(), ImageError> {
        self.memory.load(path)
    }

    /// Save the memory image as an object file.
    pub fn save(&self, path: &Path) -> Result<(), ImageError> {
        self.memory.save(path)
    }
}
