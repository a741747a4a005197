use agc_core::core::machine::Machine;
use agc_core::core::{Bus, Fault, Register};
use agc_core::cpu::agc::{BIOS, KEYRUPT1_HANDLER, T4RUPT_HANDLER};
use agc_core::device::Key;
use agc_core::device::keypad::{KEY_CHANNEL, PRO_BIT, PRO_CHANNEL};
use agc_machines::agc::PRO_BUTTON;
use agc_machines::{AgcSystem, BootImage};

fn step_n(sys: &mut AgcSystem, n: usize) {
    for i in 0..n {
        if let Err(fault) = sys.step() {
            panic!("step {i} faulted: {fault}");
        }
    }
}

// =================================================================
// Machine Trait Tests
// =================================================================

#[test]
fn test_input_map_has_all_keys() {
    let sys = AgcSystem::new();
    let map = sys.input_map();
    assert_eq!(map.len(), 19); // 18 keypad keys + PRO
    for button in map {
        assert!(!button.name.is_empty());
    }
    assert!(map.iter().any(|b| b.id == PRO_BUTTON && b.name == "PRO"));
}

#[test]
fn test_boot_state() {
    let sys = AgcSystem::new();
    assert_eq!(sys.memory().register(Register::Z), BIOS << 1);
    assert_eq!(sys.memory().register(Register::Time4), 0xFFFE);
    assert_eq!(sys.cycles(), 0);
    assert_eq!(sys.status().register(0), "00");
}

#[test]
fn test_vector_table_installed() {
    let sys = AgcSystem::new();
    assert_eq!(sys.memory().rom(2048), 2);
    assert_eq!(sys.memory().rom(2048 + 3), BIOS << 1);
    assert_eq!(sys.memory().rom(2048 + 16 + 3), T4RUPT_HANDLER << 1);
    assert_eq!(sys.memory().rom(2048 + 20 + 3), KEYRUPT1_HANDLER << 1);
}

#[test]
fn test_idle_loop_holds_z() {
    let mut sys = AgcSystem::new();
    step_n(&mut sys, 100);
    assert_eq!(sys.memory().register(Register::Z), BIOS << 1);
    assert_eq!(sys.cycles(), 100);
}

// =================================================================
// Keypad
// =================================================================

#[test]
fn test_key_press_runs_keyrupt1() {
    let mut sys = AgcSystem::new();
    sys.set_input(Key::Five.code(), true);
    assert_eq!(sys.memory().channel(KEY_CHANNEL), 5 << 1);

    step_n(&mut sys, 1);
    assert_eq!(sys.memory().register(Register::Z), KEYRUPT1_HANDLER << 1);

    step_n(&mut sys, 4);
    assert_eq!(sys.memory().register(Register::Z), BIOS << 1);
    assert_eq!(sys.memory().register(Register::Brupt), 5 << 1);
    assert!(!sys.snapshot().mask);
}

#[test]
fn test_key_release_is_ignored() {
    let mut sys = AgcSystem::new();
    sys.set_input(Key::Five.code(), false);
    assert_eq!(sys.memory().channel(KEY_CHANNEL), 0);
    assert!(!sys.snapshot().interrupt);
}

#[test]
fn test_unknown_button_is_ignored() {
    let mut sys = AgcSystem::new();
    sys.set_input(77, true);
    assert!(!sys.snapshot().interrupt);
}

#[test]
fn test_rset_reboots() {
    let mut sys = AgcSystem::new();
    step_n(&mut sys, 10);
    sys.press_key(Key::Reset);
    step_n(&mut sys, 4);
    assert_eq!(sys.step(), Err(Fault::Restart));

    sys.reset();
    assert_eq!(sys.memory().register(Register::Brupt), 0);
    assert_eq!(sys.memory().register(Register::Z), BIOS << 1);
    assert_eq!(sys.cycles(), 0);
    step_n(&mut sys, 5);
}

#[test]
fn test_pro_is_a_level() {
    let mut sys = AgcSystem::new();
    sys.set_input(PRO_BUTTON, true);
    assert_eq!(sys.memory().channel(PRO_CHANNEL) & PRO_BIT, PRO_BIT);
    assert!(!sys.snapshot().interrupt);
    sys.set_input(PRO_BUTTON, false);
    assert_eq!(sys.memory().channel(PRO_CHANNEL) & PRO_BIT, 0);
}

// =================================================================
// Timer
// =================================================================

#[test]
fn test_t4rupt_after_time4_wraps() {
    let mut sys = AgcSystem::new();
    step_n(&mut sys, 833);
    assert_eq!(sys.memory().register(Register::Time4), 0);
    assert_eq!(sys.memory().register(Register::Z), T4RUPT_HANDLER << 1);

    step_n(&mut sys, 1);
    assert_eq!(sys.memory().register(Register::Z), BIOS << 1);
}

// =================================================================
// Display
// =================================================================

#[test]
fn test_display_path_decodes_1_and_5() {
    let mut sys = AgcSystem::new();
    let word = (11 << 11) | (0b00011 << 5) | 0b11110;
    sys.memory_mut().io_write(8 << 1, word << 1).unwrap();
    assert_eq!(sys.status().register(0), "15");
}

#[test]
fn test_display_is_shared() {
    let mut sys = AgcSystem::new();
    let display = sys.display();
    let word = (11 << 11) | (0b11001 << 5) | 0b11011;
    sys.memory_mut().io_write(8 << 1, word << 1).unwrap();
    assert_eq!(display.lock().unwrap().status().register(0), "23");
}

#[test]
fn test_reboot_clears_display() {
    let mut sys = AgcSystem::new();
    let word = (11 << 11) | (0b00011 << 5) | 0b11110;
    sys.memory_mut().io_write(8 << 1, word << 1).unwrap();
    sys.reset();
    assert_eq!(sys.status().register(0), "00");
}

// =================================================================
// Boot images
// =================================================================

#[test]
fn test_program_image_runs_from_its_own_code() {
    // CA 0o100 / TS 0o101 / TCF BIOS, placed over the idle loop.
    let mut program = vec![0u16; BIOS as usize + 3];
    program[BIOS as usize] = 0x6000 | (0o100 << 1);
    program[BIOS as usize + 1] = 0xB000 | (0o101 << 1);
    program[BIOS as usize + 2] = 0x2000 | (BIOS << 1);
    let image = BootImage::from_words(program).unwrap();
    let mut sys = AgcSystem::with_image(image);

    sys.memory_mut().write(0o100 << 1, 0x0246).unwrap();
    step_n(&mut sys, 3);
    assert_eq!(sys.read(0o101 << 1), Ok(0x0246));
    assert_eq!(sys.memory().register(Register::Z), BIOS << 1);
}

#[test]
fn test_vector_table_overrides_program_image() {
    // A full-size image of CA words: it covers the resident code but not
    // the vector table.
    let image = BootImage::from_words(vec![0x6000; 0x1000]).unwrap();
    let sys = AgcSystem::with_image(image);
    assert_eq!(sys.memory().rom(BIOS as usize), 0x6000);
    assert_eq!(sys.memory().rom(KEYRUPT1_HANDLER as usize), 0x6000);
    assert_eq!(sys.memory().rom(2048), 2);
    assert_eq!(sys.memory().rom(2048 + 3), BIOS << 1);
    assert_eq!(sys.memory().rom(2048 + 20 + 3), KEYRUPT1_HANDLER << 1);
}
