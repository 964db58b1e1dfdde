use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::{
    display::{FrameBuffer, HIRES_HEIGHT, HIRES_WIDTH},
    keyboard::Keypad,
};

const OFF: u32 = 0x000000;

fn from_u16_rgb(r: u16, g: u16, b: u16) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

/// Presentation and input side of the driver. Reads the framebuffer, writes
/// the keypad, never touches anything else.
pub struct Screen {
    window: Window,
    pixel_buffer: Vec<u32>,
    on: u32,
}

impl Screen {
    pub fn new(scale: Scale) -> Result<Self, minifb::Error> {
        // sized for the largest mode, smaller framebuffers are stretched
        let mut window = Window::new(
            "chip8vm - ESC to exit",
            HIRES_WIDTH,
            HIRES_HEIGHT,
            WindowOptions {
                scale,
                resize: true,
                ..WindowOptions::default()
            },
        )?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            window,
            pixel_buffer: vec![],
            on: from_u16_rgb(0, 127, 255),
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
    }

    pub fn poll_keys(&self, keypad: &mut Keypad) {
        keypad.update_from_keys(&self.window.get_keys());
    }

    pub fn present(&mut self, fb: &FrameBuffer) -> Result<(), minifb::Error> {
        let lit = self.on;
        self.pixel_buffer.clear();
        self.pixel_buffer
            .extend(fb.pixels().iter().map(|on| if *on { lit } else { OFF }));
        self.window
            .update_with_buffer(&self.pixel_buffer, fb.width(), fb.height())
    }
}

/// Nearest window scale minifb supports.
pub fn scale_from_factor(factor: u8) -> Scale {
    match factor {
        0..=1 => Scale::X1,
        2..=3 => Scale::X2,
        4..=7 => Scale::X4,
        8..=15 => Scale::X8,
        16..=31 => Scale::X16,
        _ => Scale::X32,
    }
}
