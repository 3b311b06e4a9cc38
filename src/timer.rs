/// Count-down used to pause between sensor polls in small slices,
/// so the stop button is noticed without waiting out the whole interval.
pub struct CountDownTimer {
    target_ms: u32,
}

pub const STOP_POLL_STEP: u32 = 10; // 10ms ideally
pub const SENSOR_DELAY: u32 = 2000; // 2000ms ideally

impl CountDownTimer {
    pub fn new(target_ms: u32) -> CountDownTimer {
        Self { target_ms }
    }

    /// Advances the timer by at most `step_ms`
    /// returns the amount of time actually consumed, which is what the caller should sleep
    pub fn tick(&mut self, step_ms: u32) -> u32 {
        let step = step_ms.min(self.target_ms);
        self.target_ms -= step;
        step
    }

    pub fn set_time(&mut self, ms: u32) {
        self.target_ms = ms;
    }

    pub fn remaining(&self) -> u32 {
        self.target_ms
    }

    pub fn is_finished(&self) -> bool {
        self.target_ms == 0
    }
}
