//! The line-oriented assembler. One forward pass classifies each
//! whitespace-separated token by its leading character and emits bytes at the
//! current origin; a resolution pass then patches label references into
//! absolute addresses or signed branch offsets.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use log::trace;
use thiserror::Error;

use crate::memory::Memory;
use crate::opcodes::{lookup, Mode, INSTRUCTIONS};

#[derive(Error, Debug)]
pub enum AsmError {
    #[error("line {line}: wrong number of digits in hex value, ->{token}<-")]
    MalformedHex { line: usize, token: String },
    #[error("line {line}: unexpected decimal value, ->{token}<-")]
    MalformedDecimal { line: usize, token: String },
    #[error("line {line}: decimal value out of range, ->{token}<-")]
    DecimalOutOfRange { line: usize, token: String },
    #[error("unresolved branch to label {0}")]
    UnresolvedLabel(String),
    #[error("offset from ${from:04x} to ${to:04x} out of range")]
    OffsetOutOfRange { from: u16, to: u16 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AsmError {
    /// Process exit code for this failure; I/O errors surface the OS errno.
    pub fn exit_code(&self) -> i32 {
        match self {
            AsmError::MalformedHex { .. } => 2,
            AsmError::MalformedDecimal { .. } => 3,
            AsmError::DecimalOutOfRange { .. } => 4,
            AsmError::UnresolvedLabel(_) => 5,
            AsmError::OffsetOutOfRange { .. } => 6,
            AsmError::Io(err) => err.raw_os_error().unwrap_or(1),
        }
    }
}

/// Symbol state for one assembly run. A fresh `Assembler` per source file
/// keeps the tables empty at the start of every run.
pub struct Assembler {
    /// Label definitions: name to the origin it was defined at.
    labels: HashMap<String, u16>,
    /// Unresolved references: patch address to label name, ordered so the
    /// resolution pass walks the image front to back.
    branches: BTreeMap<u16, String>,
}

impl Assembler {
    pub fn new() -> Assembler {
        Assembler {
            labels: HashMap::new(),
            branches: BTreeMap::new(),
        }
    }

    pub fn assemble_file(&mut self, path: &Path, memory: &mut Memory) -> Result<(), AsmError> {
        let source = fs::read_to_string(path)?;
        self.assemble(&source, memory)
    }

    /// Assemble the whole source into memory, then resolve every pending
    /// label reference. On success no pending references remain.
    pub fn assemble(&mut self, source: &str, memory: &mut Memory) -> Result<(), AsmError> {
        let mut ip: u16 = 0;
        for (index, line) in source.lines().enumerate() {
            let line = line.to_uppercase();
            trace!("assembler read line: {line}");
            self.assemble_line(index + 1, &line, &mut ip, memory)?;
        }
        self.resolve(memory)
    }

    fn assemble_line(
        &mut self,
        lineno: usize,
        line: &str,
        ip: &mut u16,
        memory: &mut Memory,
    ) -> Result<(), AsmError> {
        let mut tokens = line.split_whitespace();
        let mut tokeno = 0;

        while let Some(token) = tokens.next() {
            tokeno += 1;
            trace!("assembler got token (#{tokeno}): {token}");

            if token.starts_with(';') {
                // A comment consumes the rest of the line.
                break;
            } else if let Some(digits) = token.strip_prefix('$') {
                let value = parse_hex(lineno, token, digits, 4)?;
                if tokeno == 1 {
                    // A hex literal leading the line sets the origin.
                    *ip = value;
                } else if value > 0xFF && prior_opcode(memory, *ip).mode == Mode::Relative {
                    // A 16-bit literal after a branch is a target address;
                    // store the computed offset the way the resolver would.
                    memory.set_u8(*ip, calc_offset(ip.wrapping_add(1), value)?);
                    *ip = ip.wrapping_add(1);
                } else {
                    emit_hex(memory, ip, value);
                }
            } else if let Some(rest) = token.strip_prefix('#') {
                if let Some(digits) = rest.strip_prefix('$') {
                    let value = parse_hex(lineno, token, digits, 2)?;
                    memory.set_u8(*ip, value as u8);
                    *ip = ip.wrapping_add(1);
                } else {
                    let value = parse_decimal(lineno, token, rest)?;
                    memory.set_u8(*ip, value);
                    *ip = ip.wrapping_add(1);
                }
            } else if token == ".DATA" {
                // The data directive emits every remaining hex token.
                for data in tokens.by_ref() {
                    if data.starts_with(';') {
                        break;
                    }
                    let value = parse_hex(lineno, data, data, 4)?;
                    emit_hex(memory, ip, value);
                }
                break;
            } else if let Some(opcode) = lookup(token) {
                memory.set_u8(*ip, opcode);
                *ip = ip.wrapping_add(1);
            } else if tokeno == 1 {
                // First token on the line and not a mnemonic or literal: a
                // label definition. Tolerate the trailing-colon spelling.
                let name = token.strip_suffix(':').unwrap_or(token);
                trace!("assembler recording label: {name} at {ip:04x}");
                self.labels.insert(name.to_string(), *ip);
            } else {
                // A label reference for a branch or jump, patched later.
                trace!("assembler adding branch to: {token} at {ip:04x}");
                self.branches.insert(*ip, token.to_string());
                // Jumps take an absolute word, branches a single offset byte.
                let skip = if prior_opcode(memory, *ip).symbol.starts_with('J') {
                    2
                } else {
                    1
                };
                *ip = ip.wrapping_add(skip);
            }
        }

        Ok(())
    }

    /// Patch every recorded reference now that all labels are known.
    fn resolve(&mut self, memory: &mut Memory) -> Result<(), AsmError> {
        trace!("resolving {} branches", self.branches.len());
        for (patch_addr, label) in std::mem::take(&mut self.branches) {
            let target = *self
                .labels
                .get(&label)
                .ok_or_else(|| AsmError::UnresolvedLabel(label.clone()))?;
            trace!("resolved label {label} to {target:04x}");
            if prior_opcode(memory, patch_addr).symbol.starts_with('J') {
                memory.set_u16(patch_addr, target);
            } else {
                memory.set_u8(patch_addr, calc_offset(patch_addr.wrapping_add(1), target)?);
            }
        }
        Ok(())
    }
}

/// The descriptor of the opcode byte emitted just before `ip`, used to tell
/// jump operands (absolute word) from branch operands (relative byte).
fn prior_opcode(memory: &Memory, ip: u16) -> &'static crate::opcodes::Opcode {
    &INSTRUCTIONS[memory.read_u8(ip.wrapping_sub(1)) as usize]
}

/// The signed byte offset between a branch operand and its target, as stored
/// in the instruction stream. Distances outside [-128, 127] are fatal.
fn calc_offset(from: u16, to: u16) -> Result<u8, AsmError> {
    let delta = to.wrapping_sub(from) as i16;
    if !(-128..=127).contains(&delta) {
        return Err(AsmError::OffsetOutOfRange { from, to });
    }
    Ok(delta as u8)
}

/// Store a hex operand: the low byte always, the high byte only for values
/// beyond one byte (little endian).
fn emit_hex(memory: &mut Memory, ip: &mut u16, value: u16) {
    memory.set_u8(*ip, (value & 0xFF) as u8);
    *ip = ip.wrapping_add(1);
    if value > 0xFF {
        memory.set_u8(*ip, (value >> 8) as u8);
        *ip = ip.wrapping_add(1);
    }
}

fn parse_hex(lineno: usize, token: &str, digits: &str, max_digits: usize) -> Result<u16, AsmError> {
    if digits.is_empty() || digits.len() > max_digits {
        return Err(AsmError::MalformedHex {
            line: lineno,
            token: token.to_string(),
        });
    }
    u16::from_str_radix(digits, 16).map_err(|_| AsmError::MalformedHex {
        line: lineno,
        token: token.to_string(),
    })
}

fn parse_decimal(lineno: usize, token: &str, digits: &str) -> Result<u8, AsmError> {
    if digits.is_empty() || digits.len() > 3 {
        return Err(AsmError::DecimalOutOfRange {
            line: lineno,
            token: token.to_string(),
        });
    }
    let value: u16 = digits.parse().map_err(|_| AsmError::MalformedDecimal {
        line: lineno,
        token: token.to_string(),
    })?;
    if value > 0xFF {
        return Err(AsmError::DecimalOutOfRange {
            line: lineno,
            token: token.to_string(),
        });
    }
    Ok(value as u8)
}
