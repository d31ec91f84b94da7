//! Arithmetic, logic, shift/rotate and compare executors.

use crate::cpu::{Cpu, StatusFlag};
use crate::memory::Memory;
use crate::opcodes::Mode;

/// Apply the logical "or" operator on the accumulator.
/// Function: A:=A or {adr}
/// Flags: N Z
pub fn ora(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    cpu.a |= operand;
    cpu.update_zero_and_negative(cpu.a);
}

/// Apply the logical "and" operator on the accumulator.
/// Function: A:=A&{adr}
/// Flags: N Z
pub fn and(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    cpu.a &= operand;
    cpu.update_zero_and_negative(cpu.a);
}

/// Logical Exclusive OR
/// Function: A:=A exor {adr}
/// Flags: N Z
pub fn eor(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    cpu.a ^= operand;
    cpu.update_zero_and_negative(cpu.a);
}

/// The shared 9-bit add behind ADC and SBC. The operand has already been
/// complemented for a subtraction, which also makes the overflow test below
/// use the true addend in both cases.
fn add_impl(cpu: &mut Cpu, operand: u8) {
    let sum = cpu.carry() as u16 + cpu.a as u16 + operand as u16;
    let result = sum as u8;

    cpu.set_flag(StatusFlag::Carry, sum > 0xFF);
    // Signed overflow: the accumulator and the operand agree on the sign bit
    // but the result does not.
    cpu.set_flag(
        StatusFlag::Overflow,
        (cpu.a ^ result) & (operand ^ result) & 0x80 != 0,
    );
    cpu.a = result;
    cpu.update_zero_and_negative(result);
}

/// Add with Carry
/// Function: A:=A+{adr}+C
/// Flags: N V Z C
pub fn adc(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    add_impl(cpu, operand);
}

/// Subtract with Carry
/// Function: A:=A-{adr}-(1-C)
/// Flags: N V Z C
pub fn sbc(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    // The hardware subtracts by adding the one's complement; the carry bit
    // supplies the missing +1, and stays set while no borrow occurs.
    add_impl(cpu, !operand);
}

fn compare(cpu: &mut Cpu, register: u8, operand: u8) {
    cpu.update_zero_and_negative(register.wrapping_sub(operand));
    cpu.set_flag(StatusFlag::Carry, register >= operand);
}

/// Compare A with source
/// Function: A-{adr}
/// Flags: N Z C
pub fn cmp(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    compare(cpu, cpu.a, operand);
}

/// Compare X with source
/// Function: X-{adr}
/// Flags: N Z C
pub fn cpx(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    compare(cpu, cpu.x, operand);
}

/// Compare Y with source
/// Function: Y-{adr}
/// Flags: N Z C
pub fn cpy(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (_, operand) = cpu.operand(memory, mode);
    compare(cpu, cpu.y, operand);
}

/// Decrement at an address
/// Function: {adr}:={adr}-1
/// Flags: N Z
pub fn dec(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (address, operand) = cpu.operand(memory, mode);
    let result = operand.wrapping_sub(1);
    cpu.update_zero_and_negative(result);
    memory.set_u8(address, result);
}

/// Decrement X
/// Function: X:=X-1
/// Flags: N Z
pub fn dex(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.update_zero_and_negative(cpu.x);
}

/// Decrement Y
/// Function: Y:=Y-1
/// Flags: N Z
pub fn dey(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.update_zero_and_negative(cpu.y);
}

/// Increment at an address
/// Function: {adr}:={adr}+1
/// Flags: N Z
pub fn inc(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    let (address, operand) = cpu.operand(memory, mode);
    let result = operand.wrapping_add(1);
    cpu.update_zero_and_negative(result);
    memory.set_u8(address, result);
}

/// Increment X
/// Function: X:=X+1
/// Flags: N Z
pub fn inx(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.update_zero_and_negative(cpu.x);
}

/// Increment Y
/// Function: Y:=Y+1
/// Flags: N Z
pub fn iny(cpu: &mut Cpu, _memory: &mut Memory, _mode: Mode) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.update_zero_and_negative(cpu.y);
}

/// Shifts and rotates work on either the accumulator or a memory location,
/// depending on the mode. The callback computes the result and sets the
/// carry from the shifted-out bit; Z and N come from the result.
fn modify(cpu: &mut Cpu, memory: &mut Memory, mode: Mode, op: impl Fn(&mut Cpu, u8) -> u8) {
    match mode {
        Mode::Accumulator => {
            let operand = cpu.a;
            let result = op(cpu, operand);
            cpu.a = result;
            cpu.update_zero_and_negative(result);
        }
        _ => {
            let (address, operand) = cpu.operand(memory, mode);
            let result = op(cpu, operand);
            memory.set_u8(address, result);
            cpu.update_zero_and_negative(result);
        }
    }
}

/// Arithmetic shift left
/// Function: {adr}:={adr}*2
/// Flags: N Z C
pub fn asl(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    modify(cpu, memory, mode, |cpu, operand| {
        cpu.set_flag(StatusFlag::Carry, operand & 0x80 != 0);
        operand << 1
    });
}

/// Rotate left
/// Function: {adr}:={adr}*2+C
/// Flags: N Z C
pub fn rol(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    modify(cpu, memory, mode, |cpu, operand| {
        let carry_in = cpu.carry();
        cpu.set_flag(StatusFlag::Carry, operand & 0x80 != 0);
        (operand << 1) | carry_in
    });
}

/// Logical shift right
/// Function: {adr}:={adr}/2
/// Flags: N Z C
pub fn lsr(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    modify(cpu, memory, mode, |cpu, operand| {
        cpu.set_flag(StatusFlag::Carry, operand & 0x01 != 0);
        operand >> 1
    });
}

/// Rotate right
/// Function: {adr}:={adr}/2+C*128
/// Flags: N Z C
pub fn ror(cpu: &mut Cpu, memory: &mut Memory, mode: Mode) {
    modify(cpu, memory, mode, |cpu, operand| {
        let carry_in = cpu.carry();
        cpu.set_flag(StatusFlag::Carry, operand & 0x01 != 0);
        (operand >> 1) | (carry_in << 7)
    });
}
