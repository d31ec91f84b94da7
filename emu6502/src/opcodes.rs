use crate::cpu::opcodes_jump::*;
use crate::cpu::opcodes_logical::*;
use crate::cpu::opcodes_move::*;
use crate::cpu::Cpu;
use crate::memory::Memory;

/// The thirteen 6502 addressing modes. Every executor resolves its operand
/// through exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Absolute,         // abs
    AbsoluteIndexedX, // abx
    AbsoluteIndexedY, // aby
    Accumulator,      // acc
    Immediate,        // imm
    Implied,          // imp
    Indirect,         // ind
    IndirectX,        // izx
    IndirectY,        // izy
    Relative,         // rel
    ZeroPage,         // zp
    ZeroPageX,        // zpx
    ZeroPageY,        // zpy
}

pub type Executor = fn(&mut Cpu, &mut Memory, Mode);

/// One entry in the dispatch table. `symbol` doubles as the assembler
/// mnemonic: the addressing mode is part of the name (`LDAI` is LDA
/// immediate, `LDAZX` is LDA zero page indexed by X), so a source token maps
/// to exactly one opcode byte.
pub struct Opcode {
    pub symbol: &'static str,
    pub mode: Mode,
    pub bytes: u8,
    pub cycles: u8,
    pub desc: &'static str,
    pub execute: Option<Executor>,
}

const UNMAPPED: Opcode = Opcode {
    symbol: "",
    mode: Mode::Implied,
    bytes: 0,
    cycles: 0,
    desc: "",
    execute: None,
};

macro_rules! mode_to_type {
    (abs) => {
        Mode::Absolute
    };
    (abx) => {
        Mode::AbsoluteIndexedX
    };
    (aby) => {
        Mode::AbsoluteIndexedY
    };
    (acc) => {
        Mode::Accumulator
    };
    (imm) => {
        Mode::Immediate
    };
    (imp) => {
        Mode::Implied
    };
    (ind) => {
        Mode::Indirect
    };
    (izx) => {
        Mode::IndirectX
    };
    (izy) => {
        Mode::IndirectY
    };
    (rel) => {
        Mode::Relative
    };
    (zp) => {
        Mode::ZeroPage
    };
    (zpx) => {
        Mode::ZeroPageX
    };
    (zpy) => {
        Mode::ZeroPageY
    };
}

/// Usage:
/// instruction_set!([
///   { 0x00, BRK, imp, 1, 7, brk, "Set break" },
/// ]);
///
/// Builds the 256-entry dispatch table at compile time, one line per opcode.
/// Entries that never appear keep a null executor and are illegal to
/// dispatch.
macro_rules! instruction_set {
    (
        [
            $({
                $byte:expr,
                $symbol:ident,
                $mode:ident,
                $bytes:expr,
                $cycles:expr,
                $execute:expr,
                $desc:expr
            }),* $(,)?
        ]
    ) => {
        pub static INSTRUCTIONS: [Opcode; 256] = {
            let mut table = [UNMAPPED; 256];
            $(
                table[$byte as usize] = Opcode {
                    symbol: stringify!($symbol),
                    mode: mode_to_type!($mode),
                    bytes: $bytes,
                    cycles: $cycles,
                    desc: $desc,
                    execute: Some($execute),
                };
            )*
            table
        };
    };
}

#[rustfmt::skip]
instruction_set!([
    { 0x00, BRK,   imp, 1, 7, brk, "Set break" },
    { 0x01, ORAIX, izx, 2, 6, ora, "Logical OR accumulator using indirect address, X" },
    { 0x05, ORAZ,  zp,  2, 3, ora, "Logical OR accumulator with zero page memory" },
    { 0x06, ASLZ,  zp,  2, 5, asl, "Arithmetic shift left zero page address" },
    { 0x08, PHP,   imp, 1, 3, php, "Push processor status on stack" },
    { 0x09, ORAI,  imm, 2, 2, ora, "Logical OR accumulator with immediate value" },
    { 0x0A, ASL,   acc, 1, 2, asl, "Arithmetic shift left" },
    { 0x0D, ORAA,  abs, 3, 4, ora, "Logical OR accumulator with absolute memory address" },
    { 0x0E, ASLA,  abs, 3, 6, asl, "Arithmetic shift left absolute address" },
    { 0x10, BPL,   rel, 2, 2, bpl, "Branch to relative address on sign bit clear" },
    { 0x11, ORAIY, izy, 2, 5, ora, "Logical OR accumulator using indirect address, Y" },
    { 0x15, ORAZX, zpx, 2, 4, ora, "Logical OR accumulator with zero page, X" },
    { 0x16, ASLZX, zpx, 2, 6, asl, "Arithmetic shift left zero page address, X" },
    { 0x18, CLC,   imp, 1, 2, clc, "Clear carry bit" },
    { 0x19, ORAY,  aby, 3, 4, ora, "Logical OR accumulator with absolute address, Y" },
    { 0x1D, ORAX,  abx, 3, 4, ora, "Logical OR accumulator with absolute address, X" },
    { 0x1E, ASLX,  abx, 3, 7, asl, "Arithmetic shift left absolute address, X" },
    { 0x20, JSR,   abs, 3, 6, jsr, "Jump to subroutine" },
    { 0x21, ANDIX, izx, 2, 6, and, "AND from indirect address, X" },
    { 0x24, BITZ,  zp,  2, 3, bit, "Test accumulator with zero page address" },
    { 0x25, ANDZ,  zp,  2, 3, and, "AND from zero page memory address" },
    { 0x26, ROLZ,  zp,  2, 5, rol, "Rotate zero page memory one bit left" },
    { 0x28, PLP,   imp, 1, 4, plp, "Pull processor status from stack" },
    { 0x29, ANDI,  imm, 2, 2, and, "AND with immediate value" },
    { 0x2A, ROL,   acc, 1, 2, rol, "Rotate accumulator one bit left" },
    { 0x2C, BITA,  abs, 3, 4, bit, "Test accumulator with absolute address" },
    { 0x2D, ANDA,  abs, 3, 4, and, "AND from absolute memory address" },
    { 0x2E, ROLA,  abs, 3, 6, rol, "Rotate absolute memory value left" },
    { 0x30, BMI,   rel, 2, 2, bmi, "Branch to relative address on sign bit set" },
    { 0x31, ANDIY, izy, 2, 5, and, "AND from indirect address, Y" },
    { 0x35, ANDZX, zpx, 2, 4, and, "AND from zero page, X" },
    { 0x36, ROLZX, zpx, 2, 6, rol, "Rotate zero page indexed memory left" },
    { 0x38, SEC,   imp, 1, 2, sec, "Set carry bit" },
    { 0x39, ANDY,  aby, 3, 4, and, "AND from absolute address, Y" },
    { 0x3D, ANDX,  abx, 3, 4, and, "AND from absolute address, X" },
    { 0x3E, ROLX,  abx, 3, 7, rol, "Rotate absolute memory value indexed by X to the left" },
    { 0x40, RTI,   imp, 1, 6, rti, "Return from interrupt, restoring status bits" },
    { 0x41, EORIX, izx, 2, 6, eor, "Exclusive OR using indirect address, X" },
    { 0x45, EORZ,  zp,  2, 3, eor, "Exclusive OR accumulator with zero page memory" },
    { 0x46, LSRZ,  zp,  2, 5, lsr, "Logical shift right zero page memory" },
    { 0x48, PHA,   imp, 1, 3, pha, "Push accumulator onto stack" },
    { 0x49, EORI,  imm, 2, 2, eor, "Exclusive OR accumulator with immediate value" },
    { 0x4A, LSR,   acc, 1, 2, lsr, "Logical shift right accumulator" },
    { 0x4C, JMP,   abs, 3, 3, jmp, "Jump to absolute address" },
    { 0x4D, EORA,  abs, 3, 4, eor, "Exclusive OR accumulator with absolute memory" },
    { 0x4E, LSRA,  abs, 3, 6, lsr, "Logical shift right absolute memory address" },
    { 0x50, BVC,   rel, 2, 2, bvc, "Branch to relative address on overflow clear" },
    { 0x51, EORIY, izy, 2, 5, eor, "Exclusive OR using indirect address, Y" },
    { 0x55, EORZX, zpx, 2, 4, eor, "Exclusive OR memory location at zero page address plus X" },
    { 0x56, LSRZX, zpx, 2, 6, lsr, "Logical shift right zero page, X" },
    { 0x58, CLI,   imp, 1, 2, cli, "Clear interrupt bit" },
    { 0x59, EORY,  aby, 3, 4, eor, "Exclusive OR the accumulator with the absolute address plus Y" },
    { 0x5D, EORX,  abx, 3, 4, eor, "Exclusive OR the accumulator with the absolute address plus X" },
    { 0x5E, LSRX,  abx, 3, 7, lsr, "Logical shift right absolute address, X" },
    { 0x60, RTS,   imp, 1, 6, rts, "Return from subroutine" },
    { 0x61, ADCIX, izx, 2, 6, adc, "Add with carry from indirect address, X" },
    { 0x65, ADCZ,  zp,  2, 3, adc, "Add with carry from zero page address" },
    { 0x66, RORZ,  zp,  2, 5, ror, "Rotate zero page memory value right" },
    { 0x68, PLA,   imp, 1, 4, pla, "Pull accumulator from stack" },
    { 0x69, ADCI,  imm, 2, 2, adc, "Add with carry immediate" },
    { 0x6A, ROR,   acc, 1, 2, ror, "Rotate accumulator right" },
    { 0x6C, JMPI,  ind, 3, 5, jmp, "Jump to indirect address" },
    { 0x6D, ADCA,  abs, 3, 4, adc, "Add with carry from absolute address" },
    { 0x6E, RORA,  abs, 3, 6, ror, "Rotate absolute memory address value right" },
    { 0x70, BVS,   rel, 2, 2, bvs, "Branch to relative address on overflow set" },
    { 0x71, ADCIY, izy, 2, 5, adc, "Add with carry from indirect address, Y" },
    { 0x75, ADCZX, zpx, 2, 4, adc, "Add with carry from zero page indexed" },
    { 0x76, RORZX, zpx, 2, 6, ror, "Rotate zero page indexed memory address value right" },
    { 0x78, SEI,   imp, 1, 2, sei, "Set interrupt bit" },
    { 0x79, ADCY,  aby, 3, 4, adc, "Add with carry from absolute, Y" },
    { 0x7D, ADCX,  abx, 3, 4, adc, "Add with carry from absolute, X" },
    { 0x7E, RORX,  abx, 3, 7, ror, "Rotate absolute memory value indexed by X to the right" },
    { 0x81, STAIX, izx, 2, 6, sta, "Store accumulator to indirect address, X" },
    { 0x84, STYZ,  zp,  2, 3, sty, "Store Y to zero page memory address" },
    { 0x85, STAZ,  zp,  2, 3, sta, "Store accumulator to zero page memory" },
    { 0x86, STXZ,  zp,  2, 3, stx, "Store X to zero page memory" },
    { 0x88, DEY,   imp, 1, 2, dey, "Decrement Y register" },
    { 0x8A, TXA,   imp, 1, 2, txa, "Transfer X to accumulator" },
    { 0x8C, STYA,  abs, 3, 4, sty, "Store Y to absolute memory address" },
    { 0x8D, STAA,  abs, 3, 4, sta, "Store accumulator to absolute memory address" },
    { 0x8E, STXA,  abs, 3, 4, stx, "Store X to absolute memory address" },
    { 0x90, BCC,   rel, 2, 2, bcc, "Branch to relative address on carry clear" },
    { 0x91, STAIY, izy, 2, 6, sta, "Store accumulator to indirect address, Y" },
    { 0x94, STYZX, zpx, 2, 4, sty, "Store Y to zero page memory address indexed by X" },
    { 0x95, STAZX, zpx, 2, 4, sta, "Store accumulator to zero page, X" },
    { 0x96, STXZY, zpy, 2, 4, stx, "Store X to memory indexed by zero page address plus Y" },
    { 0x98, TYA,   imp, 1, 2, tya, "Transfer Y to accumulator" },
    { 0x99, STAY,  aby, 3, 5, sta, "Store accumulator to absolute address, Y" },
    { 0x9A, TXS,   imp, 1, 2, txs, "Transfer X to stack pointer" },
    { 0x9D, STAX,  abx, 3, 5, sta, "Store accumulator to absolute address, X" },
    { 0xA0, LDYI,  imm, 2, 2, ldy, "Load Y from immediate" },
    { 0xA1, LDAIX, izx, 2, 6, lda, "Load accumulator from indirect address, X" },
    { 0xA2, LDXI,  imm, 2, 2, ldx, "Load X from immediate" },
    { 0xA4, LDYZ,  zp,  2, 3, ldy, "Load Y from zero page" },
    { 0xA5, LDAZ,  zp,  2, 3, lda, "Load accumulator from zero page memory" },
    { 0xA6, LDXZ,  zp,  2, 3, ldx, "Load X from zero page" },
    { 0xA8, TAY,   imp, 1, 2, tay, "Transfer accumulator to Y" },
    { 0xA9, LDAI,  imm, 2, 2, lda, "Load accumulator with immediate value" },
    { 0xAA, TAX,   imp, 1, 2, tax, "Transfer accumulator to X" },
    { 0xAC, LDYA,  abs, 3, 4, ldy, "Load Y from absolute address" },
    { 0xAD, LDAA,  abs, 3, 4, lda, "Load accumulator from absolute address memory" },
    { 0xAE, LDXA,  abs, 3, 4, ldx, "Load X from absolute address" },
    { 0xB0, BCS,   rel, 2, 2, bcs, "Branch to relative address on carry set" },
    { 0xB1, LDAIY, izy, 2, 5, lda, "Load accumulator from indirect address, Y" },
    { 0xB4, LDYZX, zpx, 2, 4, ldy, "Load Y from zero page, X" },
    { 0xB5, LDAZX, zpx, 2, 4, lda, "Load accumulator from zero page, X" },
    { 0xB6, LDXZY, zpy, 2, 4, ldx, "Load X from zero page, Y" },
    { 0xB8, CLV,   imp, 1, 2, clv, "Clear overflow bit" },
    { 0xB9, LDAY,  aby, 3, 4, lda, "Load accumulator from absolute address, Y" },
    { 0xBA, TSX,   imp, 1, 2, tsx, "Transfer stack pointer to X" },
    { 0xBC, LDYX,  abx, 3, 4, ldy, "Load Y from absolute address, X" },
    { 0xBD, LDAX,  abx, 3, 4, lda, "Load accumulator from absolute address, X" },
    { 0xBE, LDXY,  aby, 3, 4, ldx, "Load X from absolute address, Y" },
    { 0xC0, CPYI,  imm, 2, 2, cpy, "Compare Y with immediate value" },
    { 0xC1, CMPIX, izx, 2, 6, cmp, "Compare memory using indirect address, X" },
    { 0xC4, CPYZ,  zp,  2, 3, cpy, "Compare Y with zero page memory" },
    { 0xC5, CMPZ,  zp,  2, 3, cmp, "Compare zero page memory" },
    { 0xC6, DECZ,  zp,  2, 5, dec, "Decrement zero page memory address" },
    { 0xC8, INY,   imp, 1, 2, iny, "Increment Y register" },
    { 0xC9, CMPI,  imm, 2, 2, cmp, "Compare immediate value" },
    { 0xCA, DEX,   imp, 1, 2, dex, "Decrement X register" },
    { 0xCC, CPYA,  abs, 3, 4, cpy, "Compare Y with absolute address memory" },
    { 0xCD, CMPA,  abs, 3, 4, cmp, "Compare memory using absolute address" },
    { 0xCE, DECA,  abs, 3, 6, dec, "Decrement memory value at absolute address" },
    { 0xD0, BNE,   rel, 2, 2, bne, "Branch to relative address on zero bit clear" },
    { 0xD1, CMPIY, izy, 2, 5, cmp, "Compare memory using indirect address, Y" },
    { 0xD5, CMPZX, zpx, 2, 4, cmp, "Compare memory using zero page, X addressing mode" },
    { 0xD6, DECZX, zpx, 2, 6, dec, "Decrement memory using zero page, X addressing" },
    { 0xD8, CLD,   imp, 1, 2, cld, "Clear decimal bit" },
    { 0xD9, CMPY,  aby, 3, 4, cmp, "Compare memory using absolute, Y addressing mode" },
    { 0xDD, CMPX,  abx, 3, 4, cmp, "Compare memory using absolute, X addressing mode" },
    { 0xDE, DECX,  abx, 3, 7, dec, "Decrement memory value at absolute address, X" },
    { 0xE0, CPXI,  imm, 2, 2, cpx, "Compare X with immediate value" },
    { 0xE1, SBCIX, izx, 2, 6, sbc, "Subtract with carry from indirect address, X" },
    { 0xE4, CPXZ,  zp,  2, 3, cpx, "Compare X with zero page value" },
    { 0xE5, SBCZ,  zp,  2, 3, sbc, "Subtract memory from accumulator with carry, zero page" },
    { 0xE6, INCZ,  zp,  2, 5, inc, "Increment zero page memory address" },
    { 0xE8, INX,   imp, 1, 2, inx, "Increment X register" },
    { 0xE9, SBCI,  imm, 2, 2, sbc, "Subtract immediate value from accumulator with carry" },
    { 0xEA, NOP,   imp, 1, 2, nop, "No operation" },
    { 0xEC, CPXA,  abs, 3, 4, cpx, "Compare X with absolute address memory" },
    { 0xED, SBCA,  abs, 3, 4, sbc, "Subtract absolute memory from accumulator with carry" },
    { 0xEE, INCA,  abs, 3, 6, inc, "Increment memory value at absolute address" },
    { 0xF0, BEQ,   rel, 2, 2, beq, "Branch to relative address on zero bit set" },
    { 0xF1, SBCIY, izy, 2, 5, sbc, "Subtract with carry from indirect address, Y" },
    { 0xF5, SBCZX, zpx, 2, 4, sbc, "Subtract with carry from zero page, X" },
    { 0xF6, INCZX, zpx, 2, 6, inc, "Increment memory at zero page plus X" },
    { 0xF8, SED,   imp, 1, 2, sed, "Set decimal bit" },
    { 0xF9, SBCY,  aby, 3, 4, sbc, "Subtract with carry from absolute, Y" },
    { 0xFD, SBCX,  abx, 3, 4, sbc, "Subtract with carry from absolute, X" },
    { 0xFE, INCX,  abx, 3, 7, inc, "Increment memory at address found by adding absolute address to X" },
]);

/// Find the opcode byte for an assembler symbol, if the symbol names a
/// mapped instruction.
pub fn lookup(symbol: &str) -> Option<u8> {
    INSTRUCTIONS
        .iter()
        .position(|opcode| opcode.execute.is_some() && opcode.symbol == symbol)
        .map(|index| index as u8)
}
