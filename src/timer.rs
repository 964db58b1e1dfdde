// Delay & Sound timer: count down at 60 times / s until 0
// the driver owns the cadence, `tick` is one 1/60 s step

pub const TIMER_HZ: u32 = 60;

#[derive(Debug, Default, Clone, Copy)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    /// Decrements a running timer. True exactly on the step that reaches 0.
    pub fn tick(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        self.count == 0
    }
}

#[derive(Debug, Default)]
pub struct Timers {
    pub delay: Timer,
    pub sound: Timer,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true on the tone-off edge.
    pub fn tick(&mut self) -> bool {
        self.delay.tick();
        self.sound.tick()
    }

    /// Loads the sound timer. True on the tone-on edge: it was silent and
    /// now counts down.
    pub fn start_tone(&mut self, count: u8) -> bool {
        let was_on = self.tone_on();
        self.sound.set(count);
        !was_on && self.tone_on()
    }

    pub fn tone_on(&self) -> bool {
        self.sound.count > 0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
