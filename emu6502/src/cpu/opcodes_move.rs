//! Load, store, transfer and stack executors.

use crate::cpu::Cpu;
use crate::memory::Memory;
use crate::opcodes::Mode;

/// Load the value into register A
/// Function: A:={adr}
/// Flags: N Z
pub fn lda(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    cpu.a = operand;
    cpu.update_zero_and_negative(cpu.a);
}

/// Store register A at address
/// Function: {adr}:=A
pub fn sta(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let address = cpu.operand_address(memory, mode);
    memory.set_u8(address, cpu.a);
}

/// Load register X with the value
/// Function: X:={adr}
/// Flags: N Z
pub fn ldx(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    cpu.x = operand;
    cpu.update_zero_and_negative(cpu.x);
}

/// Store register X at address
/// Function: {adr}:=X
pub fn stx(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let address = cpu.operand_address(memory, mode);
    memory.set_u8(address, cpu.x);
}

/// Load register Y with the value
/// Function: Y:={adr}
/// Flags: N Z
pub fn ldy(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    cpu.y = operand;
    cpu.update_zero_and_negative(cpu.y);
}

/// Store register Y at address
/// Function: {adr}:=Y
pub fn sty(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let address = cpu.operand_address(memory, mode);
    memory.set_u8(address, cpu.y);
}

/// Transfer A to X
/// Function: X:=A
/// Flags: N Z
pub fn tax(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.x = cpu.a;
    cpu.update_zero_and_negative(cpu.x);
}

/// Transfer X to A
/// Function: A:=X
/// Flags: N Z
pub fn txa(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.a = cpu.x;
    cpu.update_zero_and_negative(cpu.a);
}

/// Transfer A to Y
/// Function: Y:=A
/// Flags: N Z
pub fn tay(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.y = cpu.a;
    cpu.update_zero_and_negative(cpu.y);
}

/// Transfer Y to A
/// Function: A:=Y
/// Flags: N Z
pub fn tya(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.a = cpu.y;
    cpu.update_zero_and_negative(cpu.a);
}

/// Transfer S to X
/// Function: X:=S
/// Flags: N Z
pub fn tsx(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.x = cpu.sp;
    cpu.update_zero_and_negative(cpu.x);
}

/// Transfer X to S. Unlike the other transfers this sets no flags.
/// Function: S:=X
pub fn txs(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.sp = cpu.x;
}

/// Pull A
/// Function: A:=+(S)
/// Flags: N Z
pub fn pla(cpu: &mut Cpu, memory: &mut Memory, _mode: Mode) {
    cpu.a = cpu.pull(memory);
    cpu.update_zero_and_negative(cpu.a);
}

/// Push A to the stack
/// Function: (S)-:=A
pub fn pha(cpu: &mut Cpu, memory: &mut Memory, _mode: Mode) {
    cpu.push(memory, cpu.a);
}

/// Pull the status register from the stack
/// Function: P:=+(S)
/// Flags: N V B D I Z C
pub fn plp(cpu: &mut Cpu, memory: &mut Memory, _mode: Mode) {
    cpu.p = cpu.pull(memory);
}

/// Push the status register to the stack
/// Function: (S)-:=P
pub fn php(cpu: &mut Cpu, memory: &mut Memory, _mode: Mode) {
    cpu.push(memory, cpu.p);
}
