use agc_core::core::Register;
use agc_core::cpu::agc::Flag;
use agc_core::cpu::agc::word::{MINUS_ZERO, from_signed};
mod common;
use common::*;

const X: u16 = 0o100;

// =============================================================================
// TC / TCF / RETURN / XXALQ / XLQ
// =============================================================================

#[test]
fn test_tc_saves_q_and_return_comes_back() {
    let mut program = [0u16; 11];
    program[0] = tc(ORIGIN + 10);
    program[10] = RETURN;
    let mut t = TestAgc::with_program(&program);

    t.run(1);
    assert_eq!(t.pc(), 10);
    assert_eq!(t.get(Register::Q), ORIGIN << 1);

    assert_eq!(t.step(), Ok(2));
    assert_eq!(t.pc(), 1);
}

#[test]
fn test_tcf_leaves_q() {
    let mut t = TestAgc::with_program(&[tcf(ORIGIN + 7)]);
    t.set(Register::Q, 0x0042);
    assert_eq!(t.step(), Ok(1));
    assert_eq!(t.pc(), 7);
    assert_eq!(t.get(Register::Q), 0x0042);
}

#[test]
fn test_tcf_to_itself_idles() {
    let mut t = TestAgc::with_program(&[tcf(ORIGIN)]);
    t.run(50);
    assert_eq!(t.pc(), 0);
    assert_eq!(t.cpu.mct, 50);
}

#[test]
fn test_xxalq_executes_a() {
    let mut t = TestAgc::with_program(&[XXALQ]);
    t.run(1);
    assert_eq!(t.get(Register::Z), Register::A.addr());
    assert_eq!(t.get(Register::Q), ORIGIN << 1);
}

#[test]
fn test_xlq_executes_l() {
    let mut t = TestAgc::with_program(&[XLQ]);
    t.run(1);
    assert_eq!(t.get(Register::Z), Register::L.addr());
    assert_eq!(t.get(Register::Q), ORIGIN << 1);
}

// =============================================================================
// CCS
// =============================================================================

fn ccs_with(value: u16) -> TestAgc {
    let mut t = TestAgc::with_program(&[ccs(X)]);
    t.poke(X, value);
    assert_eq!(t.step(), Ok(2));
    t
}

#[test]
fn test_ccs_positive() {
    let t = ccs_with(from_signed(5));
    assert_eq!(t.get(Register::A), from_signed(4));
    assert_eq!(t.pc(), 1);
}

#[test]
fn test_ccs_plus_zero() {
    let t = ccs_with(0);
    assert_eq!(t.get(Register::A), 0);
    assert_eq!(t.pc(), 2);
}

#[test]
fn test_ccs_negative() {
    let t = ccs_with(from_signed(-5));
    assert_eq!(t.get(Register::A), from_signed(4));
    assert_eq!(t.pc(), 3);
}

#[test]
fn test_ccs_minus_zero() {
    let t = ccs_with(MINUS_ZERO);
    assert_eq!(t.get(Register::A), 0);
    assert_eq!(t.pc(), 4);
}

#[test]
fn test_ccs_one_diminishes_to_zero() {
    let t = ccs_with(from_signed(1));
    assert_eq!(t.get(Register::A), 0);
    assert_eq!(t.pc(), 1);
}

// =============================================================================
// BZF / BZMF
// =============================================================================

fn branch_with(word: u16, a: u16) -> u16 {
    let mut t = TestAgc::with_program(&[EXTEND, word]);
    t.set(Register::A, a);
    t.run(2);
    t.pc()
}

#[test]
fn test_bzf() {
    let target = ORIGIN + 20;
    assert_eq!(branch_with(bzf(target), 0), 20);
    assert_eq!(branch_with(bzf(target), MINUS_ZERO), 20);
    assert_eq!(branch_with(bzf(target), from_signed(1)), 2);
    assert_eq!(branch_with(bzf(target), from_signed(-1)), 2);
}

#[test]
fn test_bzmf() {
    let target = ORIGIN + 20;
    assert_eq!(branch_with(bzmf(target), 0), 20);
    assert_eq!(branch_with(bzmf(target), MINUS_ZERO), 20);
    assert_eq!(branch_with(bzmf(target), from_signed(-9)), 20);
    assert_eq!(branch_with(bzmf(target), from_signed(9)), 2);
}

// =============================================================================
// INDEX
// =============================================================================

#[test]
fn test_index_biases_next_address() {
    let mut t = TestAgc::with_program(&[index(X), ca(X + 10)]);
    t.poke(X, from_signed(3));
    t.poke(X + 13, 0x0BAD);

    t.run(1);
    assert!(t.cpu.flag(Flag::Index));
    t.run(1);
    assert_eq!(t.get(Register::A), 0x0BAD);
    assert_eq!(t.cpu.last_instruction().unwrap().addr, ((X + 10) << 1) + 6);
    assert!(!t.cpu.flag(Flag::Index));
}

#[test]
fn test_index_applies_once() {
    let mut t = TestAgc::with_program(&[index(X), ca(X + 1), ca(X + 1)]);
    t.poke(X, from_signed(1));
    t.poke(X + 1, 0x0011);
    t.poke(X + 2, 0x0022);
    t.run(2);
    assert_eq!(t.get(Register::A), 0x0022);
    t.run(1);
    assert_eq!(t.get(Register::A), 0x0011);
}

#[test]
fn test_extended_index_keeps_extended_mode() {
    let mut t = TestAgc::with_program(&[EXTEND, index(X), dca(X + 2)]);
    t.poke(X, from_signed(2));
    t.poke(X + 4, 0x0044);
    t.poke(X + 5, 0x0055);
    t.run(2);
    assert!(t.cpu.flag(Flag::Extended));
    assert!(t.cpu.flag(Flag::Index));
    t.run(1);
    assert_eq!(t.get(Register::A), 0x0044);
    assert_eq!(t.get(Register::L), 0x0055);
    assert!(!t.cpu.flag(Flag::Extended));
}

// =============================================================================
// Editing registers and the epilogue
// =============================================================================

#[test]
fn test_editing_registers_shift_every_cycle() {
    let mut t = TestAgc::with_program(&[tcf(ORIGIN)]);
    t.set(Register::Cyr, 0x0003);
    t.set(Register::Sr, 0x0008);
    t.set(Register::Cyl, 0x8002);
    t.set(Register::Zr, 0x1234);
    t.run(1);
    assert_eq!(t.get(Register::Cyr), 0x0001 | (1 << 14));
    assert_eq!(t.get(Register::Sr), 0x0004);
    assert_eq!(t.get(Register::Cyl), 0x0006);
    assert_eq!(t.get(Register::Zr), 0);
}

#[test]
fn test_alt_halts() {
    let mut t = TestAgc::with_program(&[EXTEND, ALT]);
    t.run(1);
    assert_eq!(t.step(), Err(agc_core::core::Fault::Halt));
}
