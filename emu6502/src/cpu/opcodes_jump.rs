//! Branch, jump, flag and break executors.

use crate::cpu::{Cpu, StatusFlag};
use crate::memory::Memory;
use crate::opcodes::Mode;

/// Relative branches resolve to `PC + 2 + signed(operand)`. When the
/// condition fails only the operand byte is consumed.
fn branch(cpu: &mut Cpu, memory: &Memory, mode: Mode, taken: bool) {
    let target = cpu.operand_address(memory, mode);
    if taken {
        cpu.pc = target;
    }
}

/// Branch if plus
/// Function: branch on N=0
pub fn bpl(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    branch(cpu, memory, mode, !cpu.flag(StatusFlag::Negative));
}

/// Branch if minus
/// Function: branch on N=1
pub fn bmi(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    branch(cpu, memory, mode, cpu.flag(StatusFlag::Negative));
}

/// Branch if overflow clear
/// Function: branch on V=0
pub fn bvc(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    branch(cpu, memory, mode, !cpu.flag(StatusFlag::Overflow));
}

/// Branch if overflow set
/// Function: branch on V=1
pub fn bvs(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    branch(cpu, memory, mode, cpu.flag(StatusFlag::Overflow));
}

/// Branch if carry clear
/// Function: branch on C=0
pub fn bcc(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    branch(cpu, memory, mode, !cpu.flag(StatusFlag::Carry));
}

/// Branch if carry set
/// Function: branch on C=1
pub fn bcs(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    branch(cpu, memory, mode, cpu.flag(StatusFlag::Carry));
}

/// Branch if not equal
/// Function: branch on Z=0
pub fn bne(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    branch(cpu, memory, mode, !cpu.flag(StatusFlag::Zero));
}

/// Branch if equal
/// Function: branch on Z=1
pub fn beq(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    branch(cpu, memory, mode, cpu.flag(StatusFlag::Zero));
}

/// Set the break flag. The run loop treats B=1 as its halt condition; the
/// hardware's push-and-vector sequence through $FFFE is not modeled.
/// Function: B:=1
/// Flags: B
pub fn brk(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Break, true);
}

/// Return from interrupt: restore P, then PC, with no +1 adjustment.
/// Function: P,PC:=+(S)
/// Flags: N V B D I Z C
pub fn rti(cpu: &mut Cpu, memory: &mut Memory, _mode: Mode) {
    cpu.p = cpu.pull(memory);
    let low = cpu.pull(memory);
    let high = cpu.pull(memory);
    cpu.pc = u16::from_le_bytes([low, high]);
}

/// Jump to subroutine. The pushed return address is the final byte of the
/// JSR itself; RTS supplies the missing +1.
/// Function: (S)-:=PC PC:={adr}
pub fn jsr(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let target = cpu.operand_address(memory, mode);
    let ret = cpu.pc.wrapping_sub(1);
    cpu.push(memory, (ret >> 8) as u8);
    cpu.push(memory, ret as u8);
    cpu.pc = target;
}

/// Return from subroutine
/// Function: PC:=+(S)+1
pub fn rts(cpu: &mut Cpu, memory: &mut Memory, _mode: Mode) {
    let low = cpu.pull(memory);
    let high = cpu.pull(memory);
    cpu.pc = u16::from_le_bytes([low, high]).wrapping_add(1);
}

/// Jump
/// Function: PC:={adr}
pub fn jmp(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    cpu.pc = cpu.operand_address(memory, mode);
}

/// Bit test
/// Function: N:=b7 V:=b6 Z:=A&{adr}
/// Flags: N V Z
pub fn bit(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    cpu.set_flag(StatusFlag::Negative, operand & 0b1000_0000 != 0);
    cpu.set_flag(StatusFlag::Overflow, operand & 0b0100_0000 != 0);
    cpu.set_flag(StatusFlag::Zero, cpu.a & operand == 0);
}

/// Clear carry flag
/// Function: C:=0
pub fn clc(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Carry, false);
}

/// Set carry flag
/// Function: C:=1
pub fn sec(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Carry, true);
}

/// Clear decimal flag
/// Function: D:=0
pub fn cld(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Decimal, false);
}

/// Set decimal flag
/// Function: D:=1
pub fn sed(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Decimal, true);
}

/// Clear interrupt disable
/// Function: I:=0
pub fn cli(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::InterruptDisable, false);
}

/// Set interrupt disable
/// Function: I:=1
pub fn sei(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::InterruptDisable, true);
}

/// Clear overflow flag
/// Function: V:=0
pub fn clv(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.set_flag(StatusFlag::Overflow, false);
}

/// No operation
pub fn nop(_cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {}
