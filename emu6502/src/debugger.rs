//! The interactive debugger: a command loop over the emulator that
//! single-steps, continues to breakpoints, and inspects machine state.

use std::io::{self, BufRead, Write};

use log::{trace, LevelFilter};

use crate::emulator::Emulator;
use crate::inspect;
use crate::util::parse_hex;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Exit,
    Print,
    Flags,
    Registers,
    Stack,
    Step,
    Continue,
    Break,
    Clear,
    Run,
    Trace,
    List,
    Assert,
    Help,
}

/// Known commands and their single-letter abbreviations, searched in order.
/// `STACK` appears before `ASSERT`, so the shared `A` abbreviation resolves
/// to the stack dump and `assert` is reachable by full name only.
const COMMANDS: &[(&str, &str, Action)] = &[
    ("EXIT", "X", Action::Exit),
    ("QUIT", "Q", Action::Exit),
    ("PRINT", "P", Action::Print),
    ("FLAGS", "F", Action::Flags),
    ("REGISTERS", "E", Action::Registers),
    ("STACK", "A", Action::Stack),
    ("STEP", "S", Action::Step),
    ("BREAK", "B", Action::Break),
    ("CLEAR", "C", Action::Clear),
    ("GO", "G", Action::Continue),
    ("RUN", "R", Action::Run),
    ("TRACE", "T", Action::Trace),
    ("LIST", "L", Action::List),
    ("ASSERT", "A", Action::Assert),
    ("HELP", "H", Action::Help),
];

fn find_action(command: &str) -> Option<Action> {
    COMMANDS
        .iter()
        .find(|(full, abbrev, _)| *full == command || *abbrev == command)
        .map(|(_, _, action)| *action)
}

/// What the command loop should do after handling one input line.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    /// Prompt for another command.
    Read,
    /// Switch to continuous stepping until BRK or a breakpoint.
    Continue,
    /// Leave the debugger.
    Exit,
}

pub struct Debugger<'a> {
    emulator: &'a mut Emulator,
    entry: u16,
    tracing: bool,
}

impl<'a> Debugger<'a> {
    pub fn new(emulator: &'a mut Emulator, entry: u16, tracing: bool) -> Debugger<'a> {
        Debugger {
            emulator,
            entry,
            tracing,
        }
    }

    /// The interactive loop: read commands from stdin until exit or EOF,
    /// interleaving steps with breakpoint checks while continuing.
    pub fn run(&mut self) -> io::Result<()> {
        self.emulator.reset(self.entry);

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        let mut reading = true;

        while !self.emulator.halted() {
            if reading {
                print!("> ");
                io::stdout().flush()?;
                let line = match lines.next() {
                    Some(line) => line?,
                    None => return Ok(()),
                };
                match self.dispatch(&line) {
                    Flow::Read => {}
                    Flow::Continue => reading = false,
                    Flow::Exit => return Ok(()),
                }
            } else {
                self.emulator.step();
                if self.emulator.breakpoints.contains(&self.emulator.cpu.pc) {
                    reading = true;
                }
            }
        }

        Ok(())
    }

    /// Interpret one command line. Unknown commands print a diagnostic and
    /// return to the prompt.
    fn dispatch(&mut self, line: &str) -> Flow {
        let line = line.to_uppercase();
        let mut tokens = line.split_whitespace();
        let command = match tokens.next() {
            Some(command) => command,
            None => return Flow::Read,
        };
        let param1 = tokens.next();
        let param2 = tokens.next();

        trace!("debugger command: CMD={command} PARAM1={param1:?} PARAM2={param2:?}");

        let action = match find_action(command) {
            Some(action) => action,
            None => {
                eprintln!("Unknown command: {command}");
                return Flow::Read;
            }
        };

        match action {
            Action::Exit => return Flow::Exit,
            Action::Print => {
                let first = param1.and_then(parse_hex).unwrap_or(self.emulator.cpu.pc);
                let last = param2.and_then(parse_hex).unwrap_or(first);
                inspect::dump_memory(&self.emulator.memory, first, last);
            }
            Action::Flags => inspect::dump_flags(&self.emulator.cpu),
            Action::Registers => inspect::dump_registers(&self.emulator.cpu),
            Action::Stack => inspect::dump_stack(&self.emulator.cpu, &self.emulator.memory),
            Action::Step => self.emulator.step(),
            Action::Continue => return Flow::Continue,
            Action::Break => match param1.and_then(parse_hex) {
                Some(address) => {
                    self.emulator.breakpoints.insert(address);
                }
                None => {
                    // With no argument, list the active breakpoints.
                    let mut addresses: Vec<u16> =
                        self.emulator.breakpoints.iter().copied().collect();
                    addresses.sort_unstable();
                    for address in addresses {
                        println!("{address:04x}");
                    }
                }
            },
            Action::Clear => {
                if let Some(address) = param1.and_then(parse_hex) {
                    self.emulator.breakpoints.remove(&address);
                }
            }
            Action::Run => {
                let address = param1.and_then(parse_hex).unwrap_or(self.entry);
                self.emulator.reset(address);
                return Flow::Continue;
            }
            Action::Trace => {
                self.tracing = !self.tracing;
                log::set_max_level(if self.tracing {
                    LevelFilter::Trace
                } else {
                    LevelFilter::Warn
                });
            }
            Action::List => {
                let first = param1.and_then(parse_hex).unwrap_or(self.emulator.cpu.pc);
                let last = param2.and_then(parse_hex).unwrap_or(first);
                inspect::list(&self.emulator.memory, first, last);
            }
            Action::Assert => {
                if let (Some(address), Some(value)) =
                    (param1.and_then(parse_hex), param2.and_then(parse_hex))
                {
                    let holds = inspect::assert_mem(&self.emulator.memory, address, value as u8);
                    eprintln!("{}", if holds { "true" } else { "false" });
                }
            }
            Action::Help => print_help(),
        }

        Flow::Read
    }
}

fn print_help() {
    println!("Valid commands:");
    println!("\trun (or r) [<address>]");
    println!("\tstep (or s)");
    println!("\tgo (or g)");
    println!("\tprint (or p) <first> <last>");
    println!("\tregisters (or e)");
    println!("\tflags (or f)");
    println!("\tstack (or a)");
    println!("\tbreak (or b) [<address>]");
    println!("\tclear (or c) <address>");
    println!("\ttrace (or t)");
    println!("\tlist (or l) <first> <last>");
    println!("\tassert <address> <value>");
    println!("\texit (or x)");
    println!("\tquit (or q)");
    println!("\thelp (or h)");
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ticker::Ticker;

    fn debugger_emulator(source: &str) -> Emulator {
        let mut emulator = Emulator::new(Ticker::disabled());
        emulator.assemble_source(source).expect("program should assemble");
        emulator.reset(0x4000);
        emulator
    }

    #[test]
    fn full_forms_and_abbreviations_resolve_alike() {
        assert_eq!(find_action("REGISTERS"), Some(Action::Registers));
        assert_eq!(find_action("E"), Some(Action::Registers));
        assert_eq!(find_action("GO"), Some(Action::Continue));
        assert_eq!(find_action("G"), Some(Action::Continue));
        assert_eq!(find_action("BOGUS"), None);
    }

    #[test]
    fn the_a_abbreviation_is_the_stack_dump() {
        assert_eq!(find_action("A"), Some(Action::Stack));
        assert_eq!(find_action("ASSERT"), Some(Action::Assert));
    }

    #[test]
    fn step_executes_one_instruction() {
        let mut emulator = debugger_emulator("$4000 INX INX BRK");
        let mut debugger = Debugger::new(&mut emulator, 0x4000, false);
        assert_eq!(debugger.dispatch("s"), Flow::Read);
        assert_eq!(debugger.emulator.cpu.x, 1);
        assert_eq!(debugger.dispatch("step"), Flow::Read);
        assert_eq!(debugger.emulator.cpu.x, 2);
    }

    #[test]
    fn breakpoints_can_be_set_listed_and_cleared() {
        let mut emulator = debugger_emulator("$4000 INX BRK");
        let mut debugger = Debugger::new(&mut emulator, 0x4000, false);
        debugger.dispatch("b 4001");
        debugger.dispatch("break 4005");
        assert!(debugger.emulator.breakpoints.contains(&0x4001));
        assert!(debugger.emulator.breakpoints.contains(&0x4005));
        debugger.dispatch("c 4001");
        assert!(!debugger.emulator.breakpoints.contains(&0x4001));
        assert_eq!(debugger.emulator.breakpoints.len(), 1);
    }

    #[test]
    fn go_switches_to_continuous_stepping() {
        let mut emulator = debugger_emulator("$4000 INX BRK");
        let mut debugger = Debugger::new(&mut emulator, 0x4000, false);
        assert_eq!(debugger.dispatch("g"), Flow::Continue);
    }

    #[test]
    fn run_resets_to_the_given_address() {
        let mut emulator = debugger_emulator("$4000 INX INX BRK");
        let mut debugger = Debugger::new(&mut emulator, 0x4000, false);
        debugger.dispatch("s");
        assert_eq!(debugger.dispatch("r 4001"), Flow::Continue);
        assert_eq!(debugger.emulator.cpu.pc, 0x4001);
        assert_eq!(debugger.emulator.cpu.x, 0);
    }

    #[test]
    fn run_without_an_argument_uses_the_entry_address() {
        let mut emulator = debugger_emulator("$4000 INX BRK");
        let mut debugger = Debugger::new(&mut emulator, 0x4000, false);
        debugger.dispatch("s");
        debugger.dispatch("r");
        assert_eq!(debugger.emulator.cpu.pc, 0x4000);
    }

    #[test]
    fn exit_and_quit_leave_the_loop() {
        let mut emulator = debugger_emulator("$4000 BRK");
        let mut debugger = Debugger::new(&mut emulator, 0x4000, false);
        assert_eq!(debugger.dispatch("x"), Flow::Exit);
        assert_eq!(debugger.dispatch("quit"), Flow::Exit);
    }

    #[test]
    fn unknown_commands_return_to_the_prompt() {
        let mut emulator = debugger_emulator("$4000 BRK");
        let mut debugger = Debugger::new(&mut emulator, 0x4000, false);
        assert_eq!(debugger.dispatch("frobnicate"), Flow::Read);
        assert_eq!(debugger.dispatch(""), Flow::Read);
    }
}
