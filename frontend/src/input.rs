use std::collections::HashMap;

use agc_core::core::machine::InputButton;

/// What a wire key does to the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    pub button: u8,
    pub pressed: bool,
    pub name: &'static str,
}

/// A key event on its way from the server thread to the CPU thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    pub button: u8,
    pub pressed: bool,
}

impl From<Binding> for InputEvent {
    fn from(binding: Binding) -> Self {
        Self {
            button: binding.button,
            pressed: binding.pressed,
        }
    }
}

/// Maps the one-character key names used in `/button/<c>` to machine
/// buttons.
pub struct KeyMap {
    map: HashMap<char, Binding>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn bind(&mut self, key: char, binding: Binding) {
        self.map.insert(key, binding);
    }

    pub fn get(&self, key: char) -> Option<Binding> {
        self.map.get(&key).copied()
    }
}

/// Build the web DSKY key map for a machine's input buttons, matched by
/// the legend printed on each key.
pub fn default_key_map(buttons: &[InputButton]) -> KeyMap {
    let mut km = KeyMap::new();

    for button in buttons {
        let keys: &[(char, bool)] = match button.name {
            "0" => &[('0', true)],
            "1" => &[('1', true)],
            "2" => &[('2', true)],
            "3" => &[('3', true)],
            "4" => &[('4', true)],
            "5" => &[('5', true)],
            "6" => &[('6', true)],
            "7" => &[('7', true)],
            "8" => &[('8', true)],
            "9" => &[('9', true)],
            "+" => &[('a', true)],
            "-" => &[('s', true)],
            "VERB" => &[('v', true)],
            "NOUN" => &[('n', true)],
            "CLR" => &[('c', true)],
            "KEY REL" => &[('k', true)],
            "ENTR" => &[('e', true)],
            "RSET" => &[('r', true)],

            // Held key: separate press and release
            "PRO" => &[('p', true), ('z', false)],

            _ => &[],
        };

        for &(key, pressed) in keys {
            km.bind(
                key,
                Binding {
                    button: button.id,
                    pressed,
                    name: button.name,
                },
            );
        }
    }

    km
}
