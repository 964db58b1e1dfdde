use minifb::Key;

pub const KEY_COUNT: usize = 16;

/// Snapshot of the 16 logical keys, written by the input side only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn set_key(&mut self, n: u8, pressed: bool) {
        self.keys[(n & 0xF) as usize] = pressed;
    }

    pub fn press(&mut self, n: u8) {
        self.set_key(n, true);
    }

    pub fn release(&mut self, n: u8) {
        self.set_key(n, false);
    }

    // only the low nibble names a key
    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys[(n & 0xF) as usize]
    }

    /// Lowest-numbered key currently held.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|k| *k).map(|i| i as u8)
    }

    /// Replaces the snapshot with the physical keys currently held.
    pub fn update_from_keys(&mut self, held: &[Key]) {
        self.reset();
        for key in held {
            if let Some(n) = key_to_num(*key) {
                self.press(n);
            }
        }
    }
}

// 1 2 3 C      1 2 3 4
// 4 5 6 D  <-  Q W E R
// 7 8 9 E      A S D F
// A 0 B F      Z X C V
pub fn key_to_num(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}
